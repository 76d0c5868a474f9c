//! HTTP surface: router wiring, shared state, and error rendering.

pub mod error;
pub mod routes;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::ToyCatalog;
pub use state::AppState;

/// Build the application router over the fixed route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::meta::liveness))
        .route("/toySearch/{text}", get(routes::toys::search_toys))
        .route("/alltoys", get(routes::toys::all_toys))
        .route("/category-toys", get(routes::toys::category_toys))
        .route("/toy/{id}", get(routes::toys::get_toy))
        .route("/my-toys", get(routes::toys::my_toys))
        .route(
            "/my-toys/{id}",
            put(routes::toys::update_toy).delete(routes::toys::delete_toy),
        )
        .route("/add-toy", post(routes::toys::add_toy))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the catalog on `listener` until `shutdown` resolves.
///
/// In-flight requests drain before the store connection is released.
pub async fn run<F>(listener: TcpListener, catalog: ToyCatalog, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState::new(catalog.clone()));
    let addr = listener.local_addr()?;
    tracing::info!(%addr, backend = catalog.backend_name(), "Toys kingdom server is running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    catalog.shutdown().await;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
