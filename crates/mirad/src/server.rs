//! HTTP server for mirad.

use crate::classifier::EmotionCnn;
use crate::config::MiraConfig;
use crate::questions::{
    create_shared_session, HttpGenerator, QuestionEngine, QuestionGenerator, SharedSession,
};
use crate::routes;
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use mira_common::AnalysisError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Upload size cap for /api/analyze bodies.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers.
pub struct AppState {
    pub config: MiraConfig,
    pub engine: QuestionEngine,
    pub session: SharedSession,
    pub start_time: Instant,
    /// Lazily loaded emotion model; analysis retries the load until it
    /// succeeds.
    model: RwLock<Option<Arc<EmotionCnn>>>,
}

impl AppState {
    pub fn new(config: MiraConfig) -> Result<Self> {
        let generator = Arc::new(HttpGenerator::new(&config.generator)?);
        Ok(Self::with_generator(config, generator))
    }

    /// Build state around an injected generator (tests use a scripted one).
    pub fn with_generator(config: MiraConfig, generator: Arc<dyn QuestionGenerator>) -> Self {
        let session = create_shared_session();
        let engine = QuestionEngine::new(
            generator,
            session.clone(),
            config.generator.max_attempts,
        );

        Self {
            config,
            engine,
            session,
            start_time: Instant::now(),
            model: RwLock::new(None),
        }
    }

    /// The loaded emotion model, probing the candidate paths on first use
    /// and again on every call until one of them loads.
    pub async fn classifier(&self) -> Result<Arc<EmotionCnn>, AnalysisError> {
        if let Some(model) = self.model.read().await.clone() {
            return Ok(model);
        }

        let mut slot = self.model.write().await;
        if let Some(model) = slot.clone() {
            return Ok(model);
        }

        let model = Arc::new(EmotionCnn::load(&self.config.model.candidate_paths)?);
        *slot = Some(model.clone());
        Ok(model)
    }

    /// Attempt the model load without running an analysis.
    pub async fn try_load_model(&self) -> Result<(), AnalysisError> {
        self.classifier().await.map(|_| ())
    }

    /// Install an already-built model (tests inject an untrained one).
    pub async fn install_model(&self, model: EmotionCnn) {
        *self.model.write().await = Some(Arc::new(model));
    }
}

/// Build the application router with CORS and tracing layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::analyze_routes())
        .merge(routes::session_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Run the HTTP server until shutdown.
pub async fn run(state: Arc<AppState>, bind: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
