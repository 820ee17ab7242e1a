use crate::{Error, Result, Section, SectionEntry, Vector};
use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Identifier handed out by [`SectionIndex::add`]. Ids are never reused.
pub type EntryId = u64;

/// A single nearest-neighbor match
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub id: EntryId,
    /// Raw inner product of the unit query and the unit stored vector
    pub similarity: f32,
    pub entry: &'a SectionEntry,
}

/// Ordering key for the top-k heap: higher similarity first, then lower id.
type RankKey = (OrderedFloat<f32>, Reverse<EntryId>);

/// Exact inner-product index over the vectors of one profile section.
///
/// Vectors live in one row-major buffer; row `i` belongs to id `i`, so the
/// id space is contiguous and assigned in insertion order. Superseded rows
/// are tombstoned with [`retire`](Self::retire) instead of being removed.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    section: Section,
    dim: usize,
    data: Vec<f32>,
    id_to_meta: AHashMap<EntryId, SectionEntry>,
    retired: AHashSet<EntryId>,
    next_id: EntryId,
}

impl SectionIndex {
    pub fn new(section: Section, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(format!(
                "{} index dimension must be positive",
                section
            )));
        }

        Ok(Self {
            section,
            dim,
            data: Vec::new(),
            id_to_meta: AHashMap::new(),
            retired: AHashSet::new(),
            next_id: 0,
        })
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries, retired ones included
    pub fn count(&self) -> usize {
        self.id_to_meta.len()
    }

    /// Number of entries that can still be returned by [`search`](Self::search)
    pub fn live_count(&self) -> usize {
        self.count() - self.retired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// The id the next added vector will receive
    pub fn next_id(&self) -> EntryId {
        self.next_id
    }

    pub fn get(&self, id: EntryId) -> Option<&SectionEntry> {
        self.id_to_meta.get(&id)
    }

    pub fn is_retired(&self, id: EntryId) -> bool {
        self.retired.contains(&id)
    }

    /// Append vectors with their metadata, returning how many were stored.
    ///
    /// The batch is validated up front, so a bad vector leaves the index untouched.
    pub fn add(&mut self, vectors: Vec<Vector>, metadatas: Vec<SectionEntry>) -> Result<usize> {
        if vectors.len() != metadatas.len() {
            return Err(Error::LengthMismatch {
                vectors: vectors.len(),
                metadatas: metadatas.len(),
            });
        }
        if vectors.is_empty() {
            return Ok(0);
        }
        if let Some(bad) = vectors.iter().find(|v| v.dim() != self.dim) {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: bad.dim(),
            });
        }

        let added = vectors.len();
        self.data.reserve(added * self.dim);
        for (vector, meta) in vectors.into_iter().zip(metadatas) {
            let id = self.next_id;
            self.data.extend_from_slice(vector.normalized().as_slice());
            self.id_to_meta.insert(id, meta);
            self.next_id += 1;
        }

        Ok(added)
    }

    /// Tombstone entries so searches skip them. Unknown ids are ignored.
    pub fn retire<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = EntryId>,
    {
        let mut retired = 0;
        for id in ids {
            if id < self.next_id && self.retired.insert(id) {
                retired += 1;
            }
        }
        retired
    }

    /// Up to `top_k` live entries ordered by descending similarity.
    ///
    /// Similarities are not clamped here. Ties resolve to the older entry.
    pub fn search(&self, query: &Vector, top_k: usize) -> Result<Vec<SearchHit<'_>>> {
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let query = query.clone().normalized();
        let mut heap: BinaryHeap<Reverse<RankKey>> = BinaryHeap::with_capacity(top_k + 1);

        for (row, stored) in self.data.chunks_exact(self.dim).enumerate() {
            let id = row as EntryId;
            if self.retired.contains(&id) {
                continue;
            }
            let similarity = crate::simd::inner_product(query.as_slice(), stored);
            if !similarity.is_finite() {
                continue;
            }
            heap.push(Reverse((OrderedFloat(similarity), Reverse(id))));
            if heap.len() > top_k {
                heap.pop();
            }
        }

        let mut ranked: Vec<RankKey> = heap.into_iter().map(|Reverse(key)| key).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));

        Ok(ranked
            .into_iter()
            .filter_map(|(similarity, Reverse(id))| {
                self.id_to_meta.get(&id).map(|entry| SearchHit {
                    id,
                    similarity: similarity.into_inner(),
                    entry,
                })
            })
            .collect())
    }
}
