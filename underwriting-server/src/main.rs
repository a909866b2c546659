//! Underwriting XAI Server
//!
//! HTTP presentation layer over the core pipeline: takes an applicant form,
//! returns the attribution chart data, ranked factors and decision letter.
//!
//! # Routes
//!
//! ```text
//! GET  /health                   liveness + model cache stats
//! GET  /api/v1/features          feature layout and input ranges
//! POST /api/v1/analyze           full analysis for one applicant
//! POST /api/v1/letters/download  letter as a text/plain attachment
//! ```

mod config;
mod models;
mod handlers;
mod error;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

use underwriting_core::{LetterComposer, LetterConfig, Pipeline, PipelineConfig};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "underwriting_server=debug,underwriting_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Underwriting XAI Server starting ({})...", config.environment);

    let pipeline_config = PipelineConfig::from_env();
    let letter_config = LetterConfig::from_env();
    tracing::info!(
        corpus_size = pipeline_config.corpus.n_samples,
        trees = pipeline_config.forest.n_trees,
        cache = pipeline_config.cache_models,
        "Pipeline configured"
    );
    if !letter_config.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set - letters will use the template");
    }

    // Build application state
    let composer = LetterComposer::from_config(&letter_config)?;
    let state = AppState {
        pipeline: Arc::new(Pipeline::new(pipeline_config, composer)),
        config: config.clone(),
    };

    // Warm the model cache so the first request does not pay for training
    if pipeline_config.cache_models {
        let summary = state.pipeline.train().await?.summary();
        tracing::info!(
            accuracy = summary.training_accuracy,
            train_ms = summary.train_time_ms,
            "Model trained"
        );
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/features", get(handlers::features::list))
        .route("/api/v1/analyze", post(handlers::analyze::analyze))
        .route("/api/v1/letters/download", post(handlers::letters::download));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use underwriting_core::{CorpusConfig, ForestConfig};

    fn test_state(n_samples: usize) -> AppState {
        let pipeline_config = PipelineConfig {
            corpus: CorpusConfig { n_samples, seed: 42 },
            forest: ForestConfig { n_trees: 15, ..Default::default() },
            ..Default::default()
        };
        AppState {
            pipeline: Arc::new(Pipeline::new(pipeline_config, LetterComposer::offline())),
            config: config::Config {
                port: 0,
                environment: "test".to_string(),
            },
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn applicant() -> Value {
        json!({
            "applicant_name": "John Doe",
            "policy_number": "POL-2024-001",
            "decision": "Approved",
            "credit_score": 750.0,
            "age": 30.0,
            "income": 80000.0,
            "claims_history": 0,
            "coverage_amount": 50000.0
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(300));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_features() {
        let app = create_router(test_state(300));
        let response = app
            .oneshot(Request::builder().uri("/api/v1/features").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["layout"]["feature_count"], 5);
        assert_eq!(body["ranges"][0]["name"], "credit_score");
        assert_eq!(body["ranges"][0]["max"], 850.0);
    }

    #[tokio::test]
    async fn test_analyze() {
        let app = create_router(test_state(400));
        let response = app.oneshot(post_json("/api/v1/analyze", applicant())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["factors"].as_array().unwrap().len(), 3);
        assert_eq!(body["chart"].as_array().unwrap().len(), 5);
        assert_eq!(body["decision"], "Approved");
        assert_eq!(body["letter"]["source"], "template");
        assert_eq!(body["letter_file_name"], "explanation_letter_POL-2024-001.txt");
    }

    #[tokio::test]
    async fn test_analyze_rejects_out_of_range() {
        let mut request = applicant();
        request["credit_score"] = json!(900.0);

        let app = create_router(test_state(300));
        let response = app.oneshot(post_json("/api/v1/analyze", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["status"], 400);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_server_error() {
        let app = create_router(test_state(0));
        let response = app.oneshot(post_json("/api/v1/analyze", applicant())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_letter_download() {
        let app = create_router(test_state(300));
        let response = app
            .oneshot(post_json(
                "/api/v1/letters/download",
                json!({ "policy_number": "POL 7", "text": "Dear John Doe," }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"explanation_letter_POL_7.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Dear John Doe,");
    }
}
