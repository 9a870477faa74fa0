use fw_server::{IngestServer, ServerState, build_router, logger, prometheus, settings};

use fw_ws::{
    AppState, Broadcaster, Metrics, SessionRegistry, ShutdownCoordinator, message_queue,
};

use std::error::Error;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = fw_config::Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(log_dir) = log_file_path.as_deref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(log_dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting fw-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = prometheus::install_recorder()?;

    let registry = SessionRegistry::new(settings::session_limits(&config));
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    // Event source -> queue -> broadcaster -> sessions, all stopped by one signal
    let (sender, queue) = message_queue(config.broadcast.queue_capacity);
    let broadcaster = Broadcaster::new(
        registry.clone(),
        queue,
        settings::broadcast_config(&config),
        metrics.clone(),
    )
    .start_with(shutdown.clone());

    let app_state = AppState {
        registry,
        metrics,
        shutdown: shutdown.clone(),
        config: settings::connection_config(&config),
        require_identity: config.server.require_identity,
    };

    if !config.server.require_identity {
        warn!("Identity gate DISABLED - unauthenticated dashboards will be accepted");
    }

    let app = build_router(ServerState {
        app: app_state,
        broadcaster: broadcaster.status(),
        prometheus,
    });

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Without ingest the queue stays open and the broadcaster idles until shutdown
    let _idle_sender = if config.ingest.enabled {
        let ingest = IngestServer::bind(&config.ingest, sender).await?;
        info!("Ingest listening on {}", ingest.local_addr()?);
        tokio::spawn(ingest.run(shutdown.clone()));
        None
    } else {
        warn!("Ingest disabled, no event source attached");
        Some(sender)
    };

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(signal) => {
                info!("Received {signal}, initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for shutdown signals: {e}");
            }
        }
    });

    info!("Server ready to accept connections");
    let mut serve_guard = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            serve_guard.wait().await;
        })
        .await?;

    match broadcaster.stop().await {
        Ok(reason) => info!("Broadcaster exited: {reason}"),
        Err(e) => error!("Broadcaster failed: {e}"),
    }

    info!("Graceful shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT (Ctrl+C)"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
    }
}
