// App state - ties the demo panels to the layout engine
//
// Owns the layout manager (and through it every surface), the shared chat
// state and the handles the panels need. Key handling is layered like this:
// open overlay -> global keys -> focused component (bindings, then editor).

use super::panels::{
    DebugPanel, HelpPanel, InputPanel, MessagesPanel, SharedStatus, StatusInfo, StatusPanel,
    StatusPart, HELP,
};
use crate::component::{shared, ComponentRef, Handled};
use crate::config::Config;
use crate::layout::builder::{DEBUG, INPUT, MESSAGES, STATUS, STATUS_LEFT, STATUS_RIGHT};
use crate::layout::{Breakpoint, LayoutError, LayoutManager, Preset, ViewRegistry};
use crate::logging::LogBuffer;
use crate::queue::UiSender;
use crate::state::ChatState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const STATUS_PANELS: [&str; 3] = [STATUS, STATUS_LEFT, STATUS_RIGHT];

pub struct App {
    pub layout: LayoutManager<ViewRegistry>,
    chat: ChatState,
    logs: LogBuffer,
    status: SharedStatus,
    help: ComponentRef,
    started: Instant,
    /// Log buffer generation the debug panel last rendered
    logs_seen: u64,
    /// Debug panel render is failing; warned once until it recovers
    logs_failing: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, logs: LogBuffer, sender: UiSender<App>) -> Result<Self, LayoutError> {
        let chat = ChatState::new();
        let status: SharedStatus = Rc::new(RefCell::new(StatusInfo::default()));

        let mut layout = LayoutManager::new(ViewRegistry::new(), config.layout.clone())
            .with_preset(Preset::from_name(&config.preset))
            .with_navigation_order(config.navigation_order.clone());

        layout.set_window_component(MESSAGES, shared(MessagesPanel::new(chat.clone())))?;
        layout.set_window_component(INPUT, shared(InputPanel::new(chat.clone(), sender)))?;
        layout.set_window_component(DEBUG, shared(DebugPanel::new(logs.clone())))?;
        layout.set_window_component(
            STATUS_LEFT,
            shared(StatusPanel::new(StatusPart::Left, status.clone())),
        )?;
        layout.set_window_component(
            STATUS_RIGHT,
            shared(StatusPanel::new(StatusPart::Right, status.clone())),
        )?;
        layout.set_window_component(
            STATUS,
            shared(StatusPanel::new(StatusPart::Single, status.clone())),
        )?;

        Ok(Self {
            layout,
            chat,
            logs,
            status,
            help: shared(HelpPanel),
            started: Instant::now(),
            logs_seen: 0,
            logs_failing: false,
            should_quit: false,
        })
    }

    pub fn chat(&self) -> &ChatState {
        &self.chat
    }

    /// One layout pass for the current terminal size
    pub fn frame(&mut self, width: u16, height: u16) -> Result<(), LayoutError> {
        let previous = self.layout.last_size();
        self.layout.layout(i32::from(width), i32::from(height))?;
        if previous.is_none() && self.layout.focused().is_none() {
            self.layout.cycle_focus()?;
        }
        if previous != self.layout.last_size() {
            self.refresh_status();
        }
        self.refresh_logs();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Refreshers (also posted from background tasks via the UI queue)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn refresh_messages(&mut self) {
        if let Err(e) = self.layout.render_panel(MESSAGES) {
            tracing::warn!("Messages refresh failed: {:#}", anyhow::Error::from(e));
        }
        self.refresh_status();
    }

    pub fn refresh_status(&mut self) {
        {
            let (width, height) = self.layout.last_size().unwrap_or((0, 0));
            let mut info = self.status.borrow_mut();
            info.mode = self.layout.screen().mode().as_str().to_string();
            info.breakpoint = Breakpoint::from_size(width, height).as_str().to_string();
            info.focused = self.layout.focused().map(str::to_string);
            info.width = width;
            info.height = height;
            info.messages = self.chat.len();
            info.loading = self.chat.is_loading();
            info.uptime = self.started.elapsed();
        }
        for panel in STATUS_PANELS {
            if let Err(e) = self.layout.render_panel(panel) {
                tracing::warn!("Status refresh failed: {:#}", anyhow::Error::from(e));
            }
        }
    }

    /// Redraw the debug panel when new log entries arrived
    pub fn refresh_logs(&mut self) {
        let generation = self.logs.generation();
        if generation == self.logs_seen {
            return;
        }
        match self.layout.render_panel(DEBUG) {
            Ok(()) => {
                self.logs_seen = generation;
                self.logs_failing = false;
            }
            // The warning itself adds a log entry, so only the first failure is reported
            Err(e) if !self.logs_failing => {
                self.logs_failing = true;
                tracing::warn!("Debug panel refresh failed: {:#}", anyhow::Error::from(e));
            }
            Err(_) => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), LayoutError> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // Layer 1: overlay owns input while open
        if self.layout.overlay_open(HELP) {
            match key.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.layout.close_overlay(HELP)?;
                    self.refresh_status();
                }
                _ => {
                    self.layout.dispatch_key(&key)?;
                }
            }
            return Ok(());
        }

        // Layer 2: global keys
        let typing = self.focused_is_editable();
        match key.code {
            KeyCode::Tab => {
                self.layout.cycle_focus()?;
                self.refresh_status();
                return Ok(());
            }
            KeyCode::F(2) => {
                self.layout.toggle_screen_mode();
                self.relayout()?;
                self.refresh_status();
                return Ok(());
            }
            KeyCode::F(1) => return self.open_help(),
            KeyCode::Char('?') if !typing => return self.open_help(),
            KeyCode::Char('q') if !typing => {
                self.should_quit = true;
                return Ok(());
            }
            _ => {}
        }

        // Layer 3: focused component
        if self.layout.dispatch_key(&key)? == Handled::No {
            tracing::trace!(key = ?key.code, "Key not handled");
        }
        Ok(())
    }

    fn focused_is_editable(&self) -> bool {
        self.layout
            .focused()
            .and_then(|panel| self.layout.windows().view(panel))
            .is_some_and(|view| view.editable)
    }

    fn open_help(&mut self) -> Result<(), LayoutError> {
        let (width, height) = HelpPanel::size();
        self.layout.open_overlay(HELP, self.help.clone(), width, height)?;
        self.refresh_status();
        Ok(())
    }

    /// Re-run the last pass after a mode or config change
    fn relayout(&mut self) -> Result<(), LayoutError> {
        match self.layout.last_size() {
            Some((width, height)) => self.layout.layout(width, height),
            None => Ok(()),
        }
    }
}
