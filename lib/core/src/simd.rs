// Inner-product kernels used by the section indices.
// Stored vectors are unit length, so the inner product is the cosine similarity.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

// Below this length the scalar loop wins over the SIMD setup cost.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const MIN_SIMD_DIM: usize = 16;

/// Inner product of two equal-length slices.
///
/// Returns `0.0` when the lengths differ.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if a.len() >= MIN_SIMD_DIM
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { inner_product_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if a.len() >= MIN_SIMD_DIM && std::arch::is_aarch64_feature_detected!("neon") {
            return unsafe { inner_product_neon(a, b) };
        }
    }

    inner_product_scalar(a, b)
}

/// Euclidean length of `v`.
#[inline]
pub fn norm(v: &[f32]) -> f32 {
    inner_product(v, v).sqrt()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn inner_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let lanes = len - len % 8;
    let mut acc = _mm256_setzero_ps();

    let mut i = 0;
    while i < lanes {
        let va = _mm256_loadu_ps(a.as_ptr().add(i));
        let vb = _mm256_loadu_ps(b.as_ptr().add(i));
        acc = _mm256_fmadd_ps(va, vb, acc);
        i += 8;
    }

    let high = _mm256_extractf128_ps(acc, 1);
    let low = _mm256_castps256_ps128(acc);
    let mut quad = _mm_add_ps(high, low);
    quad = _mm_hadd_ps(quad, quad);
    quad = _mm_hadd_ps(quad, quad);

    let tail: f32 = a[lanes..].iter().zip(&b[lanes..]).map(|(x, y)| x * y).sum();
    _mm_cvtss_f32(quad) + tail
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn inner_product_neon(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let lanes = len - len % 4;
    let mut acc = vdupq_n_f32(0.0);

    let mut i = 0;
    while i < lanes {
        let va = vld1q_f32(a.as_ptr().add(i));
        let vb = vld1q_f32(b.as_ptr().add(i));
        acc = vfmaq_f32(acc, va, vb);
        i += 4;
    }

    let tail: f32 = a[lanes..].iter().zip(&b[lanes..]).map(|(x, y)| x * y).sum();
    vaddvq_f32(acc) + tail
}

/// Two accumulators keep the dependency chain short on the fallback path.
#[inline]
fn inner_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;

    let pairs_a = a.chunks_exact(2);
    let pairs_b = b.chunks_exact(2);
    let rest: f32 = pairs_a
        .remainder()
        .iter()
        .zip(pairs_b.remainder())
        .map(|(x, y)| x * y)
        .sum();

    for (x, y) in pairs_a.zip(pairs_b) {
        even += x[0] * y[0];
        odd += x[1] * y[1];
    }

    even + odd + rest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_matches_naive_across_lengths() {
        for len in [0usize, 1, 3, 8, 15, 16, 17, 33, 384] {
            let a: Vec<f32> = (0..len).map(|i| (i as f32 * 0.37).sin()).collect();
            let b: Vec<f32> = (0..len).map(|i| (i as f32 * 0.11).cos()).collect();
            let diff = (inner_product(&a, &b) - naive(&a, &b)).abs();
            assert!(diff < 1e-3, "len {} diff {}", len, diff);
        }
    }

    #[test]
    fn test_length_mismatch_is_zero() {
        assert_eq!(inner_product(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_norm() {
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm(&[]), 0.0);
    }
}
