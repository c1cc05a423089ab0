//! Test doubles for the layout engine

use super::dimensions::Dimensions;
use super::error::SurfaceError;
use super::surface::{SurfaceHost, View, ViewRegistry};
use crate::component::{Component, Handled, KeyBinding, WindowProperties};
use crossterm::event::{KeyCode, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared record of component callbacks, in call order
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Entries starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// Component that records `render:<name>`, `focus:<name>`, `lost:<name>`
pub struct FakeComponent {
    name: String,
    /// Surface name; defaults to `name`
    view: String,
    properties: WindowProperties,
    journal: Journal,
    fail_render: bool,
    bindings: Vec<KeyBinding>,
}

impl FakeComponent {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            view: name.to_string(),
            properties: WindowProperties::default(),
            journal: journal.clone(),
            fail_render: false,
            bindings: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: WindowProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_view_name(mut self, view: &str) -> Self {
        self.view = view.to_string();
        self
    }

    pub fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }

    /// Bind `c` to append `<c>` to the surface buffer
    pub fn with_char_binding(mut self, c: char) -> Self {
        self.bindings.push(KeyBinding::new(
            "",
            KeyCode::Char(c),
            KeyModifiers::NONE,
            move |view: &mut View| {
                view.append_line(format!("<{c}>"));
                Ok(Handled::Yes)
            },
        ));
        self
    }
}

impl Component for FakeComponent {
    fn window_properties(&self) -> WindowProperties {
        self.properties
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn view_name(&self) -> String {
        self.view.clone()
    }

    fn render(&mut self, view: &mut View) -> anyhow::Result<()> {
        self.journal.record(format!("render:{}", self.name));
        if self.fail_render {
            anyhow::bail!("{} cannot render", self.name);
        }
        view.set_lines(vec![format!("{} content", self.name)]);
        Ok(())
    }

    fn handle_focus(&mut self) -> anyhow::Result<()> {
        self.journal.record(format!("focus:{}", self.name));
        Ok(())
    }

    fn handle_focus_lost(&mut self) -> anyhow::Result<()> {
        self.journal.record(format!("lost:{}", self.name));
        Ok(())
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        self.bindings.clone()
    }
}

/// Host wrapper that counts calls and can refuse creation
#[derive(Debug, Default)]
pub struct FlakyHost {
    inner: ViewRegistry,
    fail_creates: bool,
    pub creates: usize,
    pub deletes: usize,
}

impl FlakyHost {
    pub fn failing_creates() -> Self {
        Self {
            fail_creates: true,
            ..Self::default()
        }
    }

    /// Live surfaces
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl SurfaceHost for FlakyHost {
    fn create_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError> {
        if self.fail_creates {
            return Err(SurfaceError::Host("terminal detached".into()));
        }
        self.creates += 1;
        self.inner.create_view(name, dimensions)
    }

    fn move_view(&mut self, name: &str, dimensions: Dimensions) -> Result<&mut View, SurfaceError> {
        self.inner.move_view(name, dimensions)
    }

    fn view(&self, name: &str) -> Option<&View> {
        self.inner.view(name)
    }

    fn view_mut(&mut self, name: &str) -> Option<&mut View> {
        self.inner.view_mut(name)
    }

    fn delete_view(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.deletes += 1;
        self.inner.delete_view(name)
    }

    fn set_current_view(&mut self, name: Option<&str>) -> Result<(), SurfaceError> {
        self.inner.set_current_view(name)
    }

    fn current_view(&self) -> Option<&str> {
        self.inner.current_view()
    }
}
