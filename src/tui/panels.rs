//! Demo chat panels
//!
//! Each panel is a [`Component`]: it owns its data source (chat state, log
//! buffer, status info) and writes text into whatever surface the layout
//! engine hands it. None of them know where they are on screen.

use crate::component::{Component, Handled, KeyBinding, WindowProperties};
use crate::layout::builder::{DEBUG, INPUT, MESSAGES, STATUS, STATUS_LEFT, STATUS_RIGHT};
use crate::layout::View;
use crate::logging::LogBuffer;
use crate::queue::UiSender;
use crate::state::{ChatState, Message, Role};
use crossterm::event::{KeyCode, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::app::App;

/// Delay before the stub backend answers
pub const REPLY_DELAY: Duration = Duration::from_millis(300);

/// Help overlay window name
pub const HELP: &str = "help";

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

pub struct MessagesPanel {
    chat: ChatState,
}

impl MessagesPanel {
    pub fn new(chat: ChatState) -> Self {
        Self { chat }
    }
}

/// First line carries the timestamp and speaker, continuation lines are indented
fn format_message(message: &Message) -> Vec<String> {
    let prefix = format!(
        "[{}] {}: ",
        message.timestamp.format("%H:%M"),
        message.role.label()
    );
    let indent = " ".repeat(prefix.len());
    let mut lines: Vec<String> = message
        .text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{}{}", prefix, line)
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(prefix);
    }
    lines
}

/// Up/Down/PgUp/PgDn/Home/End over a surface's scroll state
fn scroll_bindings(view: &str) -> Vec<KeyBinding> {
    let bind = |key: KeyCode, description: &str, action: fn(&mut View)| {
        KeyBinding::new(view, key, KeyModifiers::NONE, move |v: &mut View| {
            action(v);
            Ok(Handled::Yes)
        })
        .with_description(description)
    };
    vec![
        bind(KeyCode::Up, "scroll up", |v| v.scroll_mut().scroll_up()),
        bind(KeyCode::Down, "scroll down", |v| v.scroll_mut().scroll_down()),
        bind(KeyCode::PageUp, "page up", |v| v.scroll_mut().page_up()),
        bind(KeyCode::PageDown, "page down", |v| v.scroll_mut().page_down()),
        bind(KeyCode::Home, "top", |v| v.scroll_mut().scroll_to_top()),
        bind(KeyCode::End, "bottom", |v| v.scroll_mut().scroll_to_bottom()),
    ]
}

impl Component for MessagesPanel {
    fn window_properties(&self) -> WindowProperties {
        WindowProperties {
            autoscroll: true,
            ..WindowProperties::default()
        }
    }

    fn title(&self) -> String {
        " Messages ".to_string()
    }

    fn view_name(&self) -> String {
        MESSAGES.to_string()
    }

    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        let mut lines: Vec<String> = self.chat.messages().iter().flat_map(format_message).collect();
        if self.chat.is_loading() {
            lines.push("bot is typing...".to_string());
        }
        view.set_lines(lines);
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        scroll_bindings(MESSAGES)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────────────────────

/// Editable prompt; Enter sends, Alt+Enter inserts a newline
pub struct InputPanel {
    chat: ChatState,
    sender: UiSender<App>,
}

impl InputPanel {
    pub fn new(chat: ChatState, sender: UiSender<App>) -> Self {
        Self { chat, sender }
    }
}

/// Take the typed text out of the input surface and hand it to the stub backend
fn submit(view: &mut View, chat: &ChatState, sender: &UiSender<App>) -> Handled {
    let text = view.buffer().trim().to_string();
    view.clear();
    if text.is_empty() {
        return Handled::Yes;
    }

    tracing::info!(chars = text.chars().count(), "Message submitted");
    chat.push(Message::new(Role::User, text.clone()));
    chat.set_loading(true);
    sender.post(App::refresh_messages);

    let chat = chat.clone();
    let sender = sender.clone();
    tokio::spawn(async move {
        tokio::time::sleep(REPLY_DELAY).await;
        chat.push(Message::new(Role::Assistant, format!("echo: {}", text)));
        chat.set_loading(false);
        tracing::debug!("Reply received");
        sender.post(App::refresh_messages);
    });
    Handled::Yes
}

impl Component for InputPanel {
    fn window_properties(&self) -> WindowProperties {
        WindowProperties {
            editable: true,
            autoscroll: true,
            ..WindowProperties::default()
        }
    }

    fn title(&self) -> String {
        " Input (Enter to send) ".to_string()
    }

    fn view_name(&self) -> String {
        INPUT.to_string()
    }

    /// The surface buffer is the draft; nothing to redraw
    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        view.sync_scroll();
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        let chat = self.chat.clone();
        let sender = self.sender.clone();
        vec![
            KeyBinding::new(INPUT, KeyCode::Enter, KeyModifiers::NONE, move |view| {
                Ok(submit(view, &chat, &sender))
            })
            .with_description("send message"),
            KeyBinding::new(INPUT, KeyCode::Char('u'), KeyModifiers::CONTROL, |view| {
                view.clear();
                Ok(Handled::Yes)
            })
            .with_description("clear input"),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug log
// ─────────────────────────────────────────────────────────────────────────────

pub struct DebugPanel {
    logs: LogBuffer,
}

impl DebugPanel {
    pub fn new(logs: LogBuffer) -> Self {
        Self { logs }
    }
}

impl Component for DebugPanel {
    fn window_properties(&self) -> WindowProperties {
        WindowProperties {
            autoscroll: true,
            wrap: false,
            ..WindowProperties::default()
        }
    }

    fn title(&self) -> String {
        " Debug ".to_string()
    }

    fn view_name(&self) -> String {
        DEBUG.to_string()
    }

    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        let lines = self.logs.get_all().iter().map(|e| e.display_line()).collect();
        view.set_lines(lines);
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        let logs = self.logs.clone();
        let mut bindings = scroll_bindings(DEBUG);
        bindings.push(
            KeyBinding::new(DEBUG, KeyCode::Char('c'), KeyModifiers::NONE, move |view| {
                logs.clear();
                view.clear();
                Ok(Handled::Yes)
            })
            .with_description("clear log"),
        );
        bindings
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status strip
// ─────────────────────────────────────────────────────────────────────────────

/// What the status panels show; refreshed by the app before each status render
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub mode: String,
    pub breakpoint: String,
    pub focused: Option<String>,
    pub width: i32,
    pub height: i32,
    pub messages: usize,
    pub loading: bool,
    pub uptime: Duration,
}

impl StatusInfo {
    fn uptime_text(&self) -> String {
        let secs = self.uptime.as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }

    fn activity_text(&self) -> String {
        format!(
            " {} msgs{} │ focus: {} │ {}",
            self.messages,
            if self.loading { " (waiting)" } else { "" },
            self.focused.as_deref().unwrap_or("-"),
            self.mode
        )
    }

    fn screen_text(&self) -> String {
        format!("{}x{} {} {}", self.width, self.height, self.breakpoint, self.uptime_text())
    }
}

pub type SharedStatus = Rc<RefCell<StatusInfo>>;

/// Which part of the status strip a panel draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPart {
    Left,
    Right,
    /// Narrow terminals: everything on one line
    Single,
}

pub struct StatusPanel {
    part: StatusPart,
    info: SharedStatus,
}

impl StatusPanel {
    pub fn new(part: StatusPart, info: SharedStatus) -> Self {
        Self { part, info }
    }
}

impl Component for StatusPanel {
    fn window_properties(&self) -> WindowProperties {
        WindowProperties {
            focusable: false,
            highlight: false,
            frame: false,
            wrap: false,
            ..WindowProperties::default()
        }
    }

    fn title(&self) -> String {
        String::new()
    }

    fn view_name(&self) -> String {
        match self.part {
            StatusPart::Left => STATUS_LEFT,
            StatusPart::Right => STATUS_RIGHT,
            StatusPart::Single => STATUS,
        }
        .to_string()
    }

    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        let info = self.info.borrow();
        let text = match self.part {
            StatusPart::Left => info.activity_text(),
            StatusPart::Right => info.screen_text(),
            StatusPart::Single => format!("{} │ {}", info.activity_text(), info.uptime_text()),
        };
        view.set_lines(vec![String::new(), text]);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Help overlay
// ─────────────────────────────────────────────────────────────────────────────

const HELP_LINES: [&str; 12] = [
    "Tab        next panel",
    "F2         screen mode (normal/half/full)",
    "F1 / ?     toggle this help",
    "Esc        close help",
    "Enter      send message",
    "Alt+Enter  new line in input",
    "Ctrl+U     clear input",
    "Up/Down    scroll",
    "PgUp/PgDn  scroll a page",
    "c          clear debug log",
    "q          quit (outside input)",
    "Ctrl+C     quit",
];

pub struct HelpPanel;

impl HelpPanel {
    /// Overlay size that fits the text plus frame
    pub fn size() -> (i32, i32) {
        let width = HELP_LINES.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
        (width as i32, HELP_LINES.len() as i32 + 2)
    }
}

impl Component for HelpPanel {
    fn window_properties(&self) -> WindowProperties {
        WindowProperties {
            wrap: false,
            ..WindowProperties::default()
        }
    }

    fn title(&self) -> String {
        " Help ".to_string()
    }

    fn view_name(&self) -> String {
        HELP.to_string()
    }

    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        view.set_lines(HELP_LINES.iter().map(|l| format!(" {}", l)).collect());
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        scroll_bindings(HELP)
    }
}
