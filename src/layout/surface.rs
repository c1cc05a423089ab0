//! Rendering surfaces and the host that owns them
//!
//! A [`View`] is the drawable thing a window is bound to: position, display
//! properties, a line buffer and a scroll position. The [`SurfaceHost`] trait is
//! the seam to whatever toolkit actually owns the views. [`ViewRegistry`] is the
//! in-process host the ratatui painter draws from; tests substitute their own.
//!
//! Surfaces are identified by a [`SurfaceId`] handed out at creation. Moving or
//! resizing a view keeps its id, content and scroll position.

use super::dimensions::Dimensions;
use super::error::SurfaceError;
use super::scroll::ScrollState;
use crate::component::{BorderStyle, FocusStyle, Handled, WindowProperties};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use unicode_width::UnicodeWidthChar;

/// Stable identity of a surface for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// A rendering surface
#[derive(Debug, Clone)]
pub struct View {
    id: SurfaceId,
    name: String,
    dimensions: Dimensions,
    /// Overlays are painted after (on top of) regular panels
    overlay: bool,
    /// Cleared while the window is left out of the current arrangement
    visible: bool,

    pub title: String,
    pub editable: bool,
    pub wrap: bool,
    pub autoscroll: bool,
    pub highlight: bool,
    pub frame: bool,
    pub border_style: BorderStyle,
    pub focus_style: FocusStyle,

    lines: Vec<String>,
    scroll: ScrollState,
}

impl View {
    pub fn new(id: SurfaceId, name: impl Into<String>, dimensions: Dimensions) -> Self {
        let defaults = WindowProperties::default();
        Self {
            id,
            name: name.into(),
            dimensions,
            overlay: false,
            visible: true,
            title: String::new(),
            editable: defaults.editable,
            wrap: defaults.wrap,
            autoscroll: defaults.autoscroll,
            highlight: defaults.highlight,
            frame: defaults.frame,
            border_style: defaults.border_style,
            focus_style: defaults.focus_style,
            lines: Vec::new(),
            scroll: ScrollState::manual(),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub(crate) fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
        self.sync_scroll();
    }

    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    pub(crate) fn set_overlay(&mut self, overlay: bool) {
        self.overlay = overlay;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Copy a component's display properties onto the surface
    pub fn apply_properties(&mut self, props: &WindowProperties, title: impl Into<String>) {
        self.title = title.into();
        self.editable = props.editable;
        self.wrap = props.wrap;
        self.highlight = props.highlight;
        self.frame = props.frame;
        self.border_style = props.border_style;
        self.focus_style = props.focus_style;
        if self.autoscroll != props.autoscroll {
            self.autoscroll = props.autoscroll;
            self.scroll.follow = props.autoscroll;
        }
        self.sync_scroll();
    }

    /// Cells available for content inside the frame
    pub fn inner_size(&self) -> (usize, usize) {
        let border = if self.frame { 2 } else { 0 };
        (
            (self.dimensions.width() - border).max(0) as usize,
            (self.dimensions.height() - border).max(0) as usize,
        )
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace the whole buffer
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.sync_scroll();
    }

    pub fn append_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.sync_scroll();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.sync_scroll();
    }

    /// Buffer joined with newlines (the text an editable view holds)
    pub fn buffer(&self) -> String {
        self.lines.join("\n")
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    /// Lines as they appear on screen, soft-wrapped to the inner width when `wrap` is set
    pub fn display_lines(&self) -> Vec<String> {
        let (width, _) = self.inner_size();
        if !self.wrap || width == 0 {
            return self.lines.clone();
        }
        self.lines
            .iter()
            .flat_map(|line| wrap_line(line, width))
            .collect()
    }

    /// Recompute scroll bounds from the current buffer and size
    pub fn sync_scroll(&mut self) {
        let (_, height) = self.inner_size();
        let total = self.display_lines().len();
        self.scroll.update_dimensions(total, height);
    }

    /// Built-in line editor for editable views
    ///
    /// Printable characters append to the last line, Backspace removes the
    /// last character (joining lines when a line is empty), Alt+Enter starts a
    /// new line. Everything else is left for the caller.
    pub fn edit(&mut self, event: &KeyEvent) -> Handled {
        if !self.editable {
            return Handled::No;
        }
        match event.code {
            KeyCode::Char(c) if !event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                match self.lines.last_mut() {
                    Some(line) => line.push(c),
                    None => self.lines.push(c.to_string()),
                }
            }
            KeyCode::Backspace => {
                if let Some(line) = self.lines.last_mut() {
                    if line.pop().is_none() && self.lines.len() > 1 {
                        self.lines.pop();
                    }
                }
            }
            KeyCode::Enter if event.modifiers.contains(KeyModifiers::ALT) => {
                if self.lines.is_empty() {
                    self.lines.push(String::new());
                }
                self.lines.push(String::new());
            }
            _ => return Handled::No,
        }
        self.sync_scroll();
        Handled::Yes
    }
}

/// Split `line` into chunks no wider than `width` display cells
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    out.push(current);
    out
}

/// The toolkit side: owns views by name
pub trait SurfaceHost {
    /// Allocate a new view
    fn create_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError>;

    /// Reposition an existing view; `SurfaceError::UnknownView` if it does not exist yet
    fn move_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError>;

    fn view(&self, name: &str) -> Option<&View>;

    fn view_mut(&mut self, name: &str) -> Option<&mut View>;

    fn delete_view(&mut self, name: &str) -> Result<(), SurfaceError>;

    /// Give input focus to a view (or clear it with `None`)
    fn set_current_view(&mut self, name: Option<&str>) -> Result<(), SurfaceError>;

    fn current_view(&self) -> Option<&str>;
}

/// In-memory surface host
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: BTreeMap<String, View>,
    /// Creation order, used as paint order
    order: Vec<String>,
    current: Option<String>,
    next_id: u64,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views in paint order: panels by creation, overlays last
    pub fn views(&self) -> impl Iterator<Item = &View> {
        let panels = self.order.iter().filter_map(|n| self.views.get(n)).filter(|v| !v.overlay);
        let overlays = self.order.iter().filter_map(|n| self.views.get(n)).filter(|v| v.overlay);
        panels.chain(overlays)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl SurfaceHost for ViewRegistry {
    fn create_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError> {
        if self.views.contains_key(name) {
            return Err(SurfaceError::Host(format!("view {name:?} already exists")));
        }
        self.next_id += 1;
        let view = View::new(SurfaceId(self.next_id), name, dimensions);
        self.order.push(name.to_string());
        Ok(self.views.entry(name.to_string()).or_insert(view))
    }

    fn move_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError> {
        let view = self
            .views
            .get_mut(name)
            .ok_or_else(|| SurfaceError::UnknownView(name.to_string()))?;
        if view.dimensions() != dimensions {
            view.set_dimensions(dimensions);
        }
        Ok(view)
    }

    fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    fn view_mut(&mut self, name: &str) -> Option<&mut View> {
        self.views.get_mut(name)
    }

    fn delete_view(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.views
            .remove(name)
            .ok_or_else(|| SurfaceError::UnknownView(name.to_string()))?;
        self.order.retain(|n| n != name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Ok(())
    }

    fn set_current_view(&mut self, name: Option<&str>) -> Result<(), SurfaceError> {
        match name {
            Some(name) if !self.views.contains_key(name) => {
                Err(SurfaceError::UnknownView(name.to_string()))
            }
            _ => {
                self.current = name.map(str::to_string);
                Ok(())
            }
        }
    }

    fn current_view(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
