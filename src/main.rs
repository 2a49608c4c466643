use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};
use visitor_relay::configuration::Settings;
use visitor_relay::notifications::DiscordWebhookSender;
use visitor_relay::relay::{AppState, router};
use visitor_relay::telemetry::{get_subscriber, init_subscriber, tracer_provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let provider = settings
        .otlp_endpoint
        .as_deref()
        .map(tracer_provider)
        .transpose()?;
    let subscriber = get_subscriber(
        "visitor-relay".into(),
        settings.log_level.clone(),
        std::io::stdout,
        provider.as_ref(),
    );
    init_subscriber(subscriber)?;

    info!("Starting visitor-relay");

    if settings.webhook_url.is_none() {
        warn!("DISCORD_WEBHOOK_URL is not set, collect requests will fail");
    }

    let state = AppState::new(settings.webhook_url.clone(), Arc::new(DiscordWebhookSender::new()));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(settings.listen_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            error!("Failed to flush spans: {:?}", e);
        }
    }

    info!("Stopped visitor-relay");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
