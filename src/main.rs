// panelbox - terminal chat client demo
//
// Architecture:
// - Layout engine (panelbox::layout): box tree -> rectangles -> surfaces
// - TUI (ratatui): paints the surfaces and feeds keys back to the engine
// - Logging: tracing events go to the debug panel (and optionally to files)
// - UI queue: background tasks post work to the UI thread

use anyhow::Result;
use panelbox::cli;
use panelbox::config::{Config, LogRotation, LoggingConfig};
use panelbox::logging::{LogBuffer, TuiLogLayer};
use panelbox::tui;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// Events always go to the in-memory buffer behind the debug panel; with file
/// logging enabled they are also written as JSON to rotating files. The
/// returned guard must live until exit so buffered lines get flushed.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(config: &LoggingConfig, log_buffer: LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("panelbox={}", config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let mut guard = None;
    let file_layer = if config.file_enabled {
        match std::fs::create_dir_all(&config.file_dir) {
            Ok(()) => {
                let file_appender = match config.file_rotation {
                    LogRotation::Hourly => {
                        tracing_appender::rolling::hourly(&config.file_dir, &config.file_prefix)
                    }
                    LogRotation::Daily => {
                        tracing_appender::rolling::daily(&config.file_dir, &config.file_prefix)
                    }
                    LogRotation::Never => {
                        tracing_appender::rolling::never(&config.file_dir, &config.file_prefix)
                    }
                };
                // Writes happen on a background thread
                let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
                guard = Some(file_guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config, arrange)
    // If a command was handled, exit early
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // A broken config file is fatal; silently running on defaults would hide it
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config.logging, log_buffer.clone());

    tracing::info!(
        version = panelbox::config::VERSION,
        preset = %config.preset,
        "Starting TUI"
    );
    if let Err(e) = tui::run_tui(config, log_buffer).await {
        tracing::error!("TUI error: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
