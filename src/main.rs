//! Study Timer - A Pomodoro timer shared across independent surfaces
//!
//! Runs the HTTP page surface and the status widget over one data directory.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use study_timer::{
    api::create_router,
    config::Config,
    services::{CommandCue, CompletionCue, LogCue},
    state::AppState,
    store::FileStorage,
    surface::{Surface, SurfaceContext},
    tasks::spawn_widget,
    utils::shutdown_signal,
    Clock, Storage, SyncChannel, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    config.validate().map_err(anyhow::Error::msg)?;

    info!("Starting study-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}, refresh={}ms, poll={}s",
        config.host,
        config.port,
        config.data_dir.display(),
        config.refresh_ms,
        config.poll_secs
    );

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let context = SurfaceContext {
        storage,
        sync: SyncChannel::new(),
        clock,
    };

    let cue: Arc<dyn CompletionCue> = match &config.cue_command {
        Some(command) => Arc::new(CommandCue::new(command.clone())),
        None => Arc::new(LogCue),
    };
    let options = config.surface_options();

    // The widget runs headless; the page surface is the one the user looks at
    let widget = Surface::mount("widget", &context, Arc::clone(&cue), options);
    let widget_task = spawn_widget(widget);

    let page = Surface::mount("page", &context, cue, options);
    page.set_focused(true);
    let page_task = page.on_tick(|_| {});

    let app = create_router(AppState::new(page, config.port, config.host.clone()));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer              - Current countdown");
    info!("  POST /timer/start        - Start or resume");
    info!("  POST /timer/pause        - Pause");
    info!("  POST /timer/reset        - Reset to idle work");
    info!("  POST /timer/skip         - Complete the current phase early");
    info!("  POST /timer/phase/:phase - Switch to work, short-break or long-break");
    info!("  GET  /settings           - Current settings");
    info!("  PUT  /settings           - Replace settings");
    info!("  GET  /health             - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    widget_task.abort();
    page_task.abort();
    info!("Server shutdown complete");
    Ok(())
}
