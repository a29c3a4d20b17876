//! HTTP transport for the tax calculator.
//!
//! | Method | Path                           | Auth  |
//! |--------|--------------------------------|-------|
//! | GET    | `/`                            | -     |
//! | POST   | `/tax/calculations`            | -     |
//! | POST   | `/tax/calculations/upload-csv` | -     |
//! | POST   | `/admin/deductions/personal`   | Basic |
//! | POST   | `/admin/deductions/k-receipt`  | Basic |

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod state;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

pub use auth::AdminCredentials;
pub use error::ApiError;
pub use state::AppState;

/// All routes, with the admin group behind Basic auth.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/deductions/personal", post(handlers::set_personal_deduction))
        .route("/deductions/k-receipt", post(handlers::set_k_receipt_deduction))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/", get(handlers::greeting))
        .route("/tax/calculations", post(handlers::calculate_tax))
        .route("/tax/calculations/upload-csv", post(handlers::upload_csv))
        .nest("/admin", admin)
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Serve `app` until Ctrl-C or SIGTERM, then let in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    app: Router,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C"),
        _ = terminate => info!("received SIGTERM"),
    }
    info!("shutting down");
}
