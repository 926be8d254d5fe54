//! Web server for tourist attraction reviews.
//!
//! Provides:
//! - Review listing, optionally per attraction
//! - Sentiment statistics by attraction, category and aspect
//! - Classifier-backed review submission
//! - The static front-end

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::classifier::{HttpClassifier, SentimentClassifier};
use crate::config::Settings;
use crate::repository::{DbContext, ReviewRepository};
use crate::services::IngestService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub reviews: ReviewRepository,
    pub ingest: IngestService,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        ctx: &DbContext,
        classifier: Arc<dyn SentimentClassifier>,
        settings: &Settings,
    ) -> Self {
        Self {
            reviews: ctx.reviews(),
            ingest: IngestService::new(ctx.reviews(), classifier, settings.classifier.timeout()),
            static_dir: Arc::new(settings.static_dir.clone()),
        }
    }
}

/// Start the web server and run until Ctrl-C or SIGTERM.
///
/// A store that cannot be reached aborts startup before binding.
pub async fn serve(settings: &Settings, init_schema: bool) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    prepare_store(&ctx, init_schema).await?;

    let classifier = HttpClassifier::new(settings.classifier.clone())?;
    tracing::info!("Classifier endpoint: {}", settings.classifier.predict_url());

    let state = AppState::new(&ctx, Arc::new(classifier), settings);
    let app = create_router(state);

    let listener = bind_listener(&settings.host, settings.port).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    ctx.close();
    Ok(())
}

/// Create the review table, or with `init_schema` off just check that the
/// store answers a query.
async fn prepare_store(ctx: &DbContext, init_schema: bool) -> anyhow::Result<()> {
    if init_schema {
        ctx.init_schema()
            .await
            .context("Failed to initialize review store")?;
    } else {
        let count = ctx
            .reviews()
            .count()
            .await
            .context("Review store is not reachable")?;
        tracing::debug!("Review store holds {} reviews", count);
    }
    Ok(())
}

/// Bind the listener, resolving host names such as `localhost`.
async fn bind_listener(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
