// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, resize, timer ticks, queued UI work)
// - Painting the layout engine's surfaces

pub mod app;
pub mod paint;
pub mod panels;

use crate::config::Config;
use crate::logging::LogBuffer;
use crate::queue::{UiQueue, UiSender};
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How often the status strip clock is refreshed
const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal when
/// done, even if the loop failed.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (sender, mut queue) = UiQueue::new();
    let result = match App::new(&config, log_buffer, sender.clone()) {
        Ok(mut app) => {
            let timer = spawn_status_timer(sender);
            let result = run_event_loop(&mut terminal, &mut app, &mut queue).await;
            timer.abort();
            result
        }
        Err(e) => Err(e).context("Failed to set up panels"),
    };

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Post a status refresh every second until the UI goes away
fn spawn_status_timer(sender: UiSender<App>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATUS_INTERVAL);
        loop {
            interval.tick().await;
            if !sender.post(App::refresh_status) {
                break;
            }
        }
    })
}

/// Main event loop
///
/// Each iteration runs queued UI work, does a layout pass for the current
/// terminal size (cheap when nothing changed), paints, then waits for the next
/// input event, tick or queued task.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    queue: &mut UiQueue<App>,
) -> Result<()> {
    // Periodic wakeup so new log lines show up without input
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        queue.drain(app);

        let size = terminal.size().context("Failed to read terminal size")?;
        if let Err(e) = app.frame(size.width, size.height) {
            tracing::error!("Layout pass failed: {:#}", anyhow::Error::from(e));
        }

        terminal
            .draw(|f| paint::draw(f, app.layout.host()))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input and resizes
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => {
                            if let Err(e) = app.handle_key(key_event) {
                                tracing::error!("Key handling failed: {:#}", anyhow::Error::from(e));
                            }
                        }
                        // Picked up by the next layout pass
                        Ok(Event::Resize(width, height)) => {
                            tracing::debug!(width, height, "Resize event");
                        }
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}

            Some(task) = queue.recv() => {
                task(app);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
