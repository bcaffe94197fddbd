use std::net::SocketAddr;

use dotenvy::dotenv;
use quizhub::logging::{init_tracing, shutdown_tracer};
use quizhub::metrics::{init_metrics, metrics_app};
use quizhub::router::init_router;
use quizhub::state::init_app_state;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let state = init_app_state().await?;
    let server_config = state.server_config.clone();
    let db = state.db.clone();

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
        let listener = TcpListener::bind(&metrics_addr).await?;
        info!(address = %metrics_addr, "Metrics listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);
    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;

    info!(
        address = %address,
        environment = server_config.environment.as_str(),
        "Server running; docs at /swagger-ui and /scalar"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.close().await;
    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
