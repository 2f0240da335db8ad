use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invitewiz_api::config::ServerConfig;
use invitewiz_api::router::build_app_router;
use invitewiz_api::sessions::{start_session_sweeper, SWEEP_INTERVAL};
use invitewiz_api::state::{AppState, OrderDelivery};
use invitewiz_delivery::{RelayClient, RelayConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "invitewiz_api=debug,invitewiz_delivery=debug,tower_http=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Form relay ---
    let delivery = match RelayConfig::from_env() {
        Some(relay) => {
            let client = RelayClient::from_config(&relay).expect("Failed to build form relay client");
            tracing::info!(url = %client.url(), "Form relay configured");
            Some(OrderDelivery {
                submitter: Arc::new(client),
                settings: config.relay_settings(&relay),
            })
        }
        None => {
            tracing::warn!("FORM_RELAY_ACCESS_KEY not set; order submission is disabled");
            None
        }
    };

    // --- App state ---
    let sessions = Arc::new(config.session_store());
    let sweeper_handle = start_session_sweeper(Arc::clone(&sessions), SWEEP_INTERVAL);
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::clone(&sessions),
        delivery,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Bound the drain of in-flight requests once a shutdown signal arrives.
    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            notify.notify_one();
        })
        .into_future();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    tokio::select! {
        result = server => result.expect("Server error"),
        () = async {
            signalled.notified().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(drain_secs = config.shutdown_timeout_secs, "Graceful shutdown timed out");
        }
    }

    sweeper_handle.abort();
    let remaining = sessions.session_count().await;
    tracing::info!(remaining, "Graceful shutdown complete; in-memory sessions discarded");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
