//! JSON API over the order and promo services.
//!
//! | Method | Path              | Handler         |
//! |--------|-------------------|-----------------|
//! | GET    | `/orders`         | list own orders |
//! | POST   | `/orders`         | checkout        |
//! | GET    | `/orders/:id`     | one own order   |
//! | POST   | `/orders/confirm` | confirm payment |
//! | GET    | `/promos`         | list own promos |
//! | POST   | `/promos`         | buy a voucher   |
//! | GET    | `/promos/:id`     | one own promo   |
//! | POST   | `/promos/confirm` | confirm payment |
//!
//! Every route except `/health` needs a bearer token known to the
//! [`UserDirectory`](crate::domain::ports::UserDirectory).

pub mod auth;
pub mod error;
pub mod handlers;
pub mod views;

use crate::application::orders::OrderService;
use crate::application::promos::PromoService;
use crate::domain::ports::UserDirectoryBox;
use crate::error::Result;
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppContext {
    pub orders: OrderService,
    pub promos: PromoService,
    pub users: UserDirectoryBox,
}

pub type AppState = Arc<AppContext>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/orders/confirm", post(handlers::confirm_order))
        .route("/orders/:id", get(handlers::get_order))
        .route(
            "/promos",
            get(handlers::list_promos).post(handlers::create_promo),
        )
        .route("/promos/confirm", post(handlers::confirm_promo))
        .route("/promos/:id", get(handlers::get_promo))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `bind` until Ctrl+C or SIGTERM.
pub async fn serve(bind: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "Server running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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
}
