//! Management listener: schema introspection and file administration.
//!
//! # Responsibilities
//! - List loaded message/enum types with zero-valued JSON examples
//! - Trigger explicit reloads
//! - Upload, read and delete schema files
//! - Serve the static console page
//!
//! Everything here is a thin surface over [`crate::schema::SchemaRegistry`];
//! failures are reported to the caller and never crash the process.

pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::schema::SchemaRegistry;

/// Upload size cap for multipart schema files.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// State injected into management handlers.
#[derive(Clone)]
pub struct ManagerState {
    pub registry: Arc<SchemaRegistry>,
}

/// HTTP listener for the management surface.
pub struct ManagerServer {
    router: Router,
}

impl ManagerServer {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        let state = ManagerState { registry };
        let router = Router::new()
            .route("/", get(handlers::index))
            .route("/index.html", get(handlers::index))
            .route("/st/meta", get(handlers::meta))
            .route(
                "/st/file/{name}",
                get(handlers::read_file).delete(handlers::delete_file),
            )
            .route("/do/reload", get(handlers::reload))
            .route("/do/upload", post(handlers::upload))
            .with_state(state)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "manager server started");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        tracing::info!("manager server stopped");
        Ok(())
    }
}
