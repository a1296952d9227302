use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replayq_core::{
    load_config, validate_config, DirWatcher, ExternalEditor, FfmpegAssembler, RegexFilter,
    Session, SlotPool, TransitionCycle, UpdateCallback,
};

use replayq_server::api::{create_router, WsBroadcaster};
use replayq_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("REPLAYQ_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully (replayq {})", VERSION);
    info!("Input directory: {:?}", config.input.dir);
    info!(
        "Queue directory: {:?} ({} slots)",
        config.queue.dir, config.queue.capacity
    );

    tokio::fs::create_dir_all(&config.queue.dir)
        .await
        .with_context(|| format!("Failed to create queue directory {:?}", config.queue.dir))?;
    tokio::fs::create_dir_all(&config.input.dir)
        .await
        .with_context(|| format!("Failed to create input directory {:?}", config.input.dir))?;

    // Derive initial slot states from whatever the queue already holds
    let mut pool = SlotPool::new(&config.queue.dir, config.queue.capacity);
    pool.refresh().await;
    info!(
        "Slot pool bootstrapped: {} of {} slots in use",
        pool.states().iter().filter(|s| s.is_used()).count(),
        pool.capacity()
    );

    let transitions = TransitionCycle::starting_at(&config.export.transition)
        .context("Unknown initial transition")?;

    let editor = ExternalEditor::new(config.editor.clone());
    let assembler = FfmpegAssembler::new(config.assembler.clone());

    // Create WebSocket broadcaster for real-time updates (before the
    // session so we can pass the callback)
    let ws_broadcaster = WsBroadcaster::default();
    info!("WebSocket broadcaster initialized");

    let broadcaster_for_callback = ws_broadcaster.clone();
    let update_callback: UpdateCallback = Arc::new(move |view| {
        broadcaster_for_callback.broadcast(view);
    });

    // The session owns the pool; everything mutating goes through its lane
    let session = Session::new(
        pool,
        transitions,
        editor,
        assembler,
        config.export.output.clone(),
    )
    .with_update_callback(update_callback)
    .spawn();
    info!("Session started");

    // Start the input directory watcher
    let filter = RegexFilter::new(&config.input.pattern).context("Invalid input pattern")?;
    let watcher = DirWatcher::spawn(
        config.input.dir.clone(),
        Arc::new(filter),
        session.clone(),
        config.watcher.clone(),
    )
    .await
    .context("Failed to start directory watcher")?;
    info!("Directory watcher started");

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), session, ws_broadcaster));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    watcher.stop();
    info!("Directory watcher stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
