//! Component contract - what a panel must provide to the layout engine
//!
//! The layout and window managers know nothing about chat messages, logs or
//! input editing. Each panel implements [`Component`] and the engine calls it
//! uniformly: display properties when a surface is configured, `render` when
//! content must be redrawn, focus callbacks on focus transitions, and
//! keybindings when a key arrives while the panel is focused.
//!
//! ```text
//! LayoutManager ──owns──▶ WindowManager ──binds──▶ Window ──▶ View (surface)
//!       │                                             │
//!       └────────── shares ComponentRef ──────────────┘
//! ```
//!
//! Components are shared (`Rc<RefCell<_>>`): the engine holds a handle, the
//! application keeps its own, and the component outlives any window rebuild.

use crate::layout::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Border drawn around a framed surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    None,
    #[default]
    Single,
    Double,
    Rounded,
    Thick,
}

impl BorderStyle {
    /// Parse from config, unknown values fall back to single
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => Self::None,
            "double" => Self::Double,
            "rounded" => Self::Rounded,
            "thick" => Self::Thick,
            _ => Self::Single,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Double => "double",
            Self::Rounded => "rounded",
            Self::Thick => "thick",
        }
    }
}

/// How a focused surface is distinguished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusStyle {
    /// Colored border only
    #[default]
    Border,
    /// Background highlight only
    Background,
    /// Border + background
    Both,
    /// No visual focus
    None,
}

impl FocusStyle {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "background" => Self::Background,
            "both" => Self::Both,
            "none" => Self::None,
            _ => Self::Border,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Background => "background",
            Self::Both => "both",
            Self::None => "none",
        }
    }
}

/// Display properties applied to a panel's surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowProperties {
    pub focusable: bool,
    pub editable: bool,
    pub wrap: bool,
    pub autoscroll: bool,
    pub highlight: bool,
    pub frame: bool,
    pub border_style: BorderStyle,
    pub focus_style: FocusStyle,
}

impl Default for WindowProperties {
    fn default() -> Self {
        Self {
            focusable: true,
            editable: false,
            wrap: true,
            autoscroll: false,
            highlight: true,
            frame: true,
            border_style: BorderStyle::default(),
            focus_style: FocusStyle::default(),
        }
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed
    Yes,
    /// Event was not handled, should bubble up
    No,
}

impl Handled {
    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Callback run when a bound key is pressed; receives the panel's surface
pub type KeyHandler = Rc<dyn Fn(&mut View) -> anyhow::Result<Handled>>;

/// Key descriptor published by a component
#[derive(Clone)]
pub struct KeyBinding {
    /// Surface the binding belongs to; empty means any focused surface
    pub view: String,
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    /// Short label for help screens
    pub description: String,
    pub handler: KeyHandler,
}

impl KeyBinding {
    pub fn new<F>(view: impl Into<String>, key: KeyCode, modifiers: KeyModifiers, handler: F) -> Self
    where
        F: Fn(&mut View) -> anyhow::Result<Handled> + 'static,
    {
        Self {
            view: view.into(),
            key,
            modifiers,
            description: String::new(),
            handler: Rc::new(handler),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this binding fires for `event` on surface `view_name`
    pub fn matches(&self, view_name: &str, event: &KeyEvent) -> bool {
        (self.view.is_empty() || self.view == view_name)
            && self.key == event.code
            && self.modifiers == event.modifiers
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("view", &self.view)
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A pluggable panel
///
/// # Example
///
/// ```ignore
/// struct Notes { lines: Vec<String> }
///
/// impl Component for Notes {
///     fn window_properties(&self) -> WindowProperties { WindowProperties::default() }
///     fn title(&self) -> String { " Notes ".into() }
///     fn view_name(&self) -> String { "notes".into() }
///     fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
///         view.set_lines(self.lines.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait Component {
    /// Properties applied when the surface is created or the component rebound
    fn window_properties(&self) -> WindowProperties;

    fn title(&self) -> String;

    /// Name of the underlying surface; may differ from the logical window name
    fn view_name(&self) -> String;

    /// Redraw content into the bound surface
    fn render(&mut self, view: &mut View) -> anyhow::Result<()>;

    fn handle_focus(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn handle_focus_lost(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        Vec::new()
    }
}

/// Shared handle to a component
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Wrap a component for registration with the layout manager
pub fn shared<C: Component + 'static>(component: C) -> ComponentRef {
    Rc::new(RefCell::new(component))
}
