use crate::state::ScorerState;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use talentx_scoring::{parse_top_k, ExpAggMode, ScoreOptions, ScoreResult, ScoreWeights, ScoringError};
use tracing::error;

#[derive(Deserialize)]
struct LoadProfilesRequest {
    json_folder: String,
    #[serde(default = "default_exp_agg")]
    exp_agg: String,
    #[serde(default = "default_reset")]
    reset: bool,
}

fn default_exp_agg() -> String {
    ExpAggMode::SumNorm.as_str().to_string()
}

fn default_reset() -> bool {
    true
}

#[derive(Deserialize)]
struct ScoreRequest {
    job_text: String,
    weights: Option<HashMap<String, f32>>,
    top_k_search: Option<i64>,
}

#[derive(Serialize)]
struct ScoreResponse {
    count: usize,
    results: Vec<ScoreResult>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<ScorerState>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register the scorer routes on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/scorer/health", web::get().to(health))
        .route("/scorer/load_profiles", web::post().to(load_profiles))
        .route("/scorer/score", web::post().to(score));
}

async fn health(state: web::Data<Arc<ScorerState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.health()))
}

async fn load_profiles(
    state: web::Data<Arc<ScorerState>>,
    req: web::Json<LoadProfilesRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let mode: ExpAggMode = match req.exp_agg.parse() {
        Ok(mode) => mode,
        Err(e) => return Ok(error_response(&e)),
    };

    let folder = PathBuf::from(req.json_folder);
    let state = state.get_ref().clone();
    let result = web::block(move || state.load_profiles(&folder, mode, req.reset)).await?;

    match result {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn score(
    state: web::Data<Arc<ScorerState>>,
    req: web::Json<ScoreRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let options = match score_options(&req) {
        Ok(options) => options,
        Err(e) => return Ok(error_response(&e)),
    };

    if state.indexed_profiles() == 0 {
        return Ok(no_profiles());
    }

    let state = state.get_ref().clone();
    let job_text = req.job_text;
    let result = web::block(move || state.score(&job_text, &options)).await?;

    match result {
        Ok(Some(results)) => Ok(HttpResponse::Ok().json(ScoreResponse {
            count: results.len(),
            results,
        })),
        Ok(None) => Ok(no_profiles()),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Request weights keep only the four known components; a map without any
/// of them falls back to the default weights.
fn score_options(req: &ScoreRequest) -> talentx_scoring::Result<ScoreOptions> {
    let mut options = ScoreOptions::default();
    if let Some(top_k) = req.top_k_search {
        options.top_k_search = parse_top_k(top_k)?;
    }
    if let Some(weights) = &req.weights {
        let known = weights
            .keys()
            .any(|k| matches!(k.as_str(), "experience" | "skills" | "education" | "languages"));
        if known {
            options.weights = ScoreWeights::from_pairs(weights.iter().map(|(k, v)| (k.as_str(), *v)));
        }
    }
    options.validate()?;
    Ok(options)
}

fn no_profiles() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "No profiles indexed. Call /scorer/load_profiles first."
    }))
}

fn error_response(e: &ScoringError) -> HttpResponse {
    match e {
        ScoringError::InvalidConfig { .. } | ScoringError::Profile(_) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        _ => {
            error!("Scoring failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Scoring failed: {}", e)
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::fs;
    use talentx_scoring::{EngineConfig, HashingEmbedder};

    fn state() -> Arc<ScorerState> {
        Arc::new(ScorerState::new(
            Arc::new(HashingEmbedder::default()),
            EngineConfig::default(),
        ))
    }

    #[actix_web::test]
    async fn test_health_before_load() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/scorer/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["indexed_profiles"], 0);
        assert_eq!(body["exp_agg_mode"], Value::Null);
    }

    #[actix_web::test]
    async fn test_score_without_profiles_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scorer/score")
            .set_json(json!({"job_text": "rust"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_load_then_score() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"id": "ana", "skills": ["rust", "tokio"]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"results": [{"profile": {"id": "ben", "skills": "excel"}}]}"#,
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scorer/load_profiles")
            .set_json(json!({"json_folder": dir.path(), "exp_agg": "mean"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["indexed_profiles"], 2);
        assert_eq!(body["files_added"], 2);
        assert_eq!(body["exp_agg_mode"], "mean");

        let req = test::TestRequest::post()
            .uri("/scorer/score")
            .set_json(json!({"job_text": "rust tokio developer", "weights": {"skills": 1.0}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"][0]["candidate_id"], "ana");
    }

    #[actix_web::test]
    async fn test_invalid_inputs() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scorer/load_profiles")
            .set_json(json!({"json_folder": "/definitely/not/here", "exp_agg": "median"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/scorer/load_profiles")
            .set_json(json!({"json_folder": "/definitely/not/here"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/scorer/score")
            .set_json(json!({"job_text": "rust", "top_k_search": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_weight_keys_fall_back_to_defaults() {
        let req = ScoreRequest {
            job_text: "x".to_string(),
            weights: Some(HashMap::from([("salary".to_string(), 3.0)])),
            top_k_search: None,
        };
        let options = score_options(&req).unwrap();
        assert_eq!(options.weights, ScoreWeights::default());
    }
}
