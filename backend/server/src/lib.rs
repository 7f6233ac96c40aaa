//! Documentation of the Platter ordering backend.
//!
//! The web front end renders everything. This server only sits between the
//! browser and four upstreams, so every answer the browser sees has the same shape.
//!
//!
//!
//! # Endpoints
//!
//! | Route | Body | Success | Failures |
//! |---|---|---|---|
//! | `POST /api/order` | any JSON | `{ message }` | 500, 502 |
//! | `POST /api/geocode` | `{ pinCode }` | `{ pinCode, latitude, longitude, displayName }` | 400, 404, 500 |
//! | `POST /api/user/lookup` | `{ phone }` | `{ email }` | 400, 404, 500 |
//! | `POST /api/recommendations` | `{}` or `{ userId }` | `{ recommendations }` | 500 |
//! | `GET /health` | | `ok` | |
//!
//! Failures always look like `{ "ok": false, "statusCode": 404, "message": "..." }`.
//!
//!
//!
//! # Failure Classes
//!
//! - **400**: client sent something malformed (bad phone, bad pincode, lookup body that is not JSON)
//! - **404**: well formed query, nothing usable behind it
//! - **500**: we could not complete the call or read the body we were asked to relay, message stays generic
//! - **502**: ordering service answered with a non-success status
//!
//! Upstream details are only ever logged, never returned.
//!
//! An empty recommendation list is a success. The UI shows "nothing yet"
//! instead of an error banner.
//!
//!
//!
//! # Notes
//!
//! ## Order endpoint
//! The ordering service is a spreadsheet macro. It decides by itself whether a
//! payload is a new order or a status change, and it may answer with plain text.
//! So we never parse its reply. We also never retry, because a duplicate POST
//! there means a duplicate row.
//!
//! ## Optional upstreams
//! Any upstream can be left unconfigured. The matching route then answers 500,
//! and every other route keeps working.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export ORDER_ENDPOINT_URL=https://script.google.com/macros/s/<id>/exec
//! export ORDER_STORE_URL=https://<project>.supabase.co
//! export RECOMMENDER_URL=http://localhost:8787/recommend
//! echo "<anon key>" > /run/secrets/ORDER_STORE_KEY
//! ```
//!
//! Run with logs.
//! ```sh
//! RUST_LOG=info cargo run --bin server
//! ```
//!
//! Poke it.
//! ```sh
//! cargo run --bin tester -- geocode 600001
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use anyhow::Error;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use routes::{geocode_handler, health_handler, lookup_handler, order_handler, recommend_handler};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/order", post(order_handler))
        .route("/api/geocode", post(geocode_handler))
        .route("/api/user/lookup", post(lookup_handler))
        .route("/api/recommendations", post(recommend_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load();
    config.report();

    info!("Initializing state...");
    let state = State::new(config)?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Resolves once the process is asked to stop.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Ctrl+C listener unavailable: {e}");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM listener unavailable: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    let received = first_signal(interrupt, terminate).await;
    info!("Received {received}, draining connections");
}

async fn first_signal(
    interrupt: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> &'static str {
    tokio::select! {
        _ = interrupt => "Ctrl+C",
        _ = terminate => "SIGTERM",
    }
}
