//! Window registry - one persistent record per logical panel
//!
//! A window remembers its last rectangle, the surfaces bound to it and the
//! component that draws into them. Windows are created the first time their
//! name shows up in an arrangement and afterwards only reconciled: a new
//! rectangle moves the existing surface, it never replaces it. Only
//! [`WindowManager::delete_window`] destroys surfaces.

use super::dimensions::Dimensions;
use super::error::{LayoutError, SurfaceError};
use super::surface::{SurfaceHost, View};
use crate::component::{BorderStyle, ComponentRef, FocusStyle};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Runtime record for a panel
pub struct Window {
    name: String,
    dimensions: Dimensions,
    /// Surfaces bound to this window, normally exactly one
    views: Vec<String>,
    component: Option<ComponentRef>,
}

impl Window {
    fn new(name: &str, dimensions: Dimensions) -> Self {
        Self {
            name: name.to_string(),
            dimensions,
            views: Vec::new(),
            component: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn views(&self) -> &[String] {
        &self.views
    }

    /// Primary surface, if one was created
    pub fn view_name(&self) -> Option<&str> {
        self.views.first().map(String::as_str)
    }

    pub fn component(&self) -> Option<&ComponentRef> {
        self.component.as_ref()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .field("views", &self.views)
            .field("component", &self.component.is_some())
            .finish()
    }
}

/// What [`WindowManager::create_or_update_view`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    /// Surface did not exist and was allocated
    Created,
    /// Surface existed and was repositioned
    Moved,
}

/// Owns the window records and the surface host
pub struct WindowManager<H: SurfaceHost> {
    host: H,
    windows: BTreeMap<String, Window>,
    /// Styles for components that keep the default border/focus style
    styles: (BorderStyle, FocusStyle),
}

impl<H: SurfaceHost> WindowManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            windows: BTreeMap::new(),
            styles: (BorderStyle::default(), FocusStyle::default()),
        }
    }

    /// Border and focus style applied when a component doesn't pick its own
    pub fn set_default_styles(&mut self, border: BorderStyle, focus: FocusStyle) {
        self.styles = (border, focus);
    }

    /// Register a window without a surface. Existing windows are left alone.
    pub fn create_window(&mut self, name: &str, dimensions: Dimensions) -> &Window {
        self.windows.entry(name.to_string()).or_insert_with(|| {
            info!(window = name, ?dimensions, "Window created");
            Window::new(name, dimensions)
        })
    }

    pub fn window(&self, name: &str) -> Option<&Window> {
        self.windows.get(name)
    }

    pub fn has_window(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    /// All windows, sorted by name
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    /// Record a new rectangle and move any bound surfaces to it
    pub fn update_window_dimensions(
        &mut self,
        name: &str,
        dimensions: Dimensions,
    ) -> Result<(), LayoutError> {
        let window = self
            .windows
            .get_mut(name)
            .ok_or_else(|| LayoutError::UnknownPanel(name.to_string()))?;
        window.dimensions = dimensions;

        for view in &window.views {
            match self.host.move_view(view, dimensions) {
                Ok(_) => {}
                // Surface vanished behind our back; the next create_or_update_view recreates it
                Err(SurfaceError::UnknownView(_)) => {
                    debug!(window = name, view = %view, "Bound surface missing on resize");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Ensure `view_name` exists for `window_name` at the window's rectangle
    ///
    /// The first call allocates the surface and configures it from the bound
    /// component; later calls only reposition it.
    pub fn create_or_update_view(
        &mut self,
        window_name: &str,
        view_name: &str,
    ) -> Result<ViewChange, LayoutError> {
        let window = self
            .windows
            .get_mut(window_name)
            .ok_or_else(|| LayoutError::UnknownPanel(window_name.to_string()))?;
        let dimensions = window.dimensions;

        match self.host.move_view(view_name, dimensions) {
            Ok(_) => {
                if !window.views.iter().any(|v| v == view_name) {
                    window.views.push(view_name.to_string());
                }
                Ok(ViewChange::Moved)
            }
            Err(SurfaceError::UnknownView(_)) => {
                debug!(window = window_name, view = view_name, ?dimensions, "Creating surface");
                let view = self.host.create_view(view_name, dimensions)?;
                if let Some(component) = &window.component {
                    configure(view, component, self.styles);
                }
                if !window.views.iter().any(|v| v == view_name) {
                    window.views.push(view_name.to_string());
                }
                Ok(ViewChange::Created)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Bind a component; existing surfaces pick up its display properties
    ///
    /// When the component names a different surface than the window has, the
    /// old surface is destroyed and the new one takes its rectangle, visibility
    /// and current-view status, so a window never ends up with two surfaces.
    pub fn set_window_component(
        &mut self,
        name: &str,
        component: ComponentRef,
    ) -> Result<(), LayoutError> {
        let window = self
            .windows
            .get_mut(name)
            .ok_or_else(|| LayoutError::UnknownPanel(name.to_string()))?;

        let view_name = component.borrow().view_name();
        let renamed = window.views.first().is_some_and(|v| *v != view_name);
        if renamed {
            let was_current = window
                .views
                .iter()
                .any(|v| self.host.current_view() == Some(v.as_str()));
            let flags = window
                .views
                .first()
                .and_then(|v| self.host.view(v))
                .map(|v| (v.is_visible(), v.is_overlay()));
            for old in window.views.drain(..) {
                match self.host.delete_view(&old) {
                    Ok(()) | Err(SurfaceError::UnknownView(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            info!(window = name, view = %view_name, "Surface replaced for new component");
            let view = self.host.create_view(&view_name, window.dimensions)?;
            if let Some((visible, overlay)) = flags {
                view.set_visible(visible);
                view.set_overlay(overlay);
            }
            window.views.push(view_name.clone());
            if was_current {
                self.host.set_current_view(Some(&view_name))?;
            }
        }

        for view in &window.views {
            if let Some(view) = self.host.view_mut(view) {
                configure(view, &component, self.styles);
            }
        }
        window.component = Some(component);
        Ok(())
    }

    pub fn window_component(&self, name: &str) -> Option<ComponentRef> {
        self.windows.get(name).and_then(|w| w.component.clone())
    }

    /// Destroy all surfaces of a window and forget it. Returns false when absent.
    pub fn delete_window(&mut self, name: &str) -> Result<bool, LayoutError> {
        let Some(window) = self.windows.remove(name) else {
            return Ok(false);
        };
        for view in &window.views {
            match self.host.delete_view(view) {
                Ok(()) | Err(SurfaceError::UnknownView(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!(window = name, "Window deleted");
        Ok(true)
    }

    /// Run the bound component's `render` against the window's primary surface
    ///
    /// Windows without a component or surface are skipped.
    pub fn render_window(&mut self, name: &str) -> Result<(), LayoutError> {
        let Some(window) = self.windows.get(name) else {
            return Err(LayoutError::UnknownPanel(name.to_string()));
        };
        let (Some(component), Some(view_name)) = (&window.component, window.view_name()) else {
            return Ok(());
        };
        let Some(view) = self.host.view_mut(view_name) else {
            return Ok(());
        };
        component
            .borrow_mut()
            .render(view)
            .map_err(|source| LayoutError::Render {
                panel: name.to_string(),
                source,
            })
    }

    /// Primary surface of a window
    pub fn view(&self, window_name: &str) -> Option<&View> {
        let view = self.windows.get(window_name)?.view_name()?;
        self.host.view(view)
    }

    pub fn view_mut(&mut self, window_name: &str) -> Option<&mut View> {
        let view = self.windows.get(window_name)?.view_name()?;
        self.host.view_mut(view)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

fn configure(view: &mut View, component: &ComponentRef, styles: (BorderStyle, FocusStyle)) {
    let component = component.borrow();
    let mut props = component.window_properties();
    if props.border_style == BorderStyle::default() {
        props.border_style = styles.0;
    }
    if props.focus_style == FocusStyle::default() {
        props.focus_style = styles.1;
    }
    view.apply_properties(&props, component.title());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{shared, WindowProperties};
    use crate::layout::surface::ViewRegistry;
    use crate::layout::testing::{FakeComponent, FlakyHost, Journal};

    fn manager() -> WindowManager<ViewRegistry> {
        WindowManager::new(ViewRegistry::new())
    }

    #[test]
    fn create_window_has_no_surface() {
        let mut wm = manager();
        wm.create_window("messages", Dimensions::from_size(40, 10));
        assert!(wm.window("messages").unwrap().views().is_empty());
        assert!(wm.host().is_empty());
    }

    #[test]
    fn create_or_update_view_is_idempotent() {
        let mut wm = manager();
        wm.create_window("messages", Dimensions::from_size(40, 10));
        assert_eq!(
            wm.create_or_update_view("messages", "messages").unwrap(),
            ViewChange::Created
        );
        assert_eq!(
            wm.create_or_update_view("messages", "messages").unwrap(),
            ViewChange::Moved
        );
        assert_eq!(wm.host().len(), 1);
        assert_eq!(wm.window("messages").unwrap().views(), ["messages".to_string()]);
    }

    #[test]
    fn surface_identity_survives_resizes() {
        let mut wm = manager();
        wm.create_window("messages", Dimensions::from_size(40, 10));
        wm.create_or_update_view("messages", "messages").unwrap();
        let id = wm.view("messages").unwrap().id();
        wm.view_mut("messages").unwrap().set_lines(vec!["kept".into()]);

        for (w, h) in [(80, 24), (20, 5), (200, 60), (1, 1), (120, 40)] {
            wm.update_window_dimensions("messages", Dimensions::from_size(w, h)).unwrap();
            wm.create_or_update_view("messages", "messages").unwrap();
            let view = wm.view("messages").unwrap();
            assert_eq!(view.id(), id);
            assert_eq!(view.dimensions(), Dimensions::from_size(w, h));
            assert_eq!(view.lines(), ["kept".to_string()]);
        }
    }

    #[test]
    fn update_without_surface_only_records_dimensions() {
        let mut wm = manager();
        wm.create_window("debug", Dimensions::default());
        wm.update_window_dimensions("debug", Dimensions::from_size(30, 8)).unwrap();
        assert_eq!(wm.window("debug").unwrap().dimensions(), Dimensions::from_size(30, 8));
        assert!(wm.host().is_empty());
    }

    #[test]
    fn update_unknown_window_is_an_error() {
        let mut wm = manager();
        assert!(matches!(
            wm.update_window_dimensions("ghost", Dimensions::from_size(1, 1)),
            Err(LayoutError::UnknownPanel(_))
        ));
    }

    #[test]
    fn new_surface_is_configured_from_component() {
        let journal = Journal::default();
        let props = WindowProperties {
            editable: true,
            frame: false,
            ..WindowProperties::default()
        };
        let mut wm = manager();
        wm.create_window("input", Dimensions::from_size(40, 3));
        wm.set_window_component("input", shared(FakeComponent::new("input", &journal).with_properties(props)))
            .unwrap();
        wm.create_or_update_view("input", "input").unwrap();

        let view = wm.view("input").unwrap();
        assert!(view.editable);
        assert!(!view.frame);
        assert_eq!(view.title, "input");
    }

    #[test]
    fn rebinding_reapplies_properties_without_recreating() {
        let journal = Journal::default();
        let mut wm = manager();
        wm.create_window("main", Dimensions::from_size(40, 10));
        wm.set_window_component("main", shared(FakeComponent::new("first", &journal)))
            .unwrap();
        wm.create_or_update_view("main", "main").unwrap();
        let id = wm.view("main").unwrap().id();

        let props = WindowProperties {
            wrap: false,
            ..WindowProperties::default()
        };
        wm.set_window_component("main", shared(FakeComponent::new("second", &journal).with_properties(props)))
            .unwrap();

        let view = wm.view("main").unwrap();
        assert_eq!(view.id(), id);
        assert_eq!(view.title, "second");
        assert!(!view.wrap);
    }

    #[test]
    fn rebinding_with_another_view_name_replaces_the_surface() {
        let journal = Journal::default();
        let mut wm = WindowManager::new(FlakyHost::default());
        wm.create_window("main", Dimensions::from_size(40, 10));
        wm.set_window_component("main", shared(FakeComponent::new("main", &journal)))
            .unwrap();
        wm.create_or_update_view("main", "main").unwrap();
        wm.host_mut().set_current_view(Some("main")).unwrap();

        wm.set_window_component(
            "main",
            shared(FakeComponent::new("transcript", &journal).with_view_name("log")),
        )
        .unwrap();

        assert_eq!(wm.window("main").unwrap().views(), ["log".to_string()]);
        assert!(wm.host().view("main").is_none());
        assert_eq!(wm.host().current_view(), Some("log"));
        let view = wm.view("main").unwrap();
        assert_eq!(view.dimensions(), Dimensions::from_size(40, 10));
        assert_eq!(view.title, "transcript");
        assert_eq!((wm.host().creates, wm.host().deletes), (2, 1));

        // Repositioning afterwards reuses the replacement
        wm.update_window_dimensions("main", Dimensions::from_size(50, 12)).unwrap();
        assert_eq!(wm.create_or_update_view("main", "log").unwrap(), ViewChange::Moved);
        assert_eq!(wm.host().creates, 2);
    }

    #[test]
    fn rebinding_before_any_surface_only_swaps_the_component() {
        let journal = Journal::default();
        let mut wm = WindowManager::new(FlakyHost::default());
        wm.create_window("main", Dimensions::from_size(40, 10));
        wm.set_window_component("main", shared(FakeComponent::new("a", &journal)))
            .unwrap();
        wm.set_window_component("main", shared(FakeComponent::new("b", &journal)))
            .unwrap();
        assert!(wm.window("main").unwrap().views().is_empty());
        assert_eq!((wm.host().creates, wm.host().deletes), (0, 0));
    }

    #[test]
    fn default_styles_fill_in_for_components() {
        let journal = Journal::default();
        let mut wm = manager();
        wm.set_default_styles(BorderStyle::Rounded, FocusStyle::Both);
        wm.create_window("plain", Dimensions::from_size(10, 5));
        wm.create_window("picky", Dimensions::from_size(10, 5));
        wm.set_window_component("plain", shared(FakeComponent::new("plain", &journal)))
            .unwrap();
        let props = WindowProperties {
            border_style: BorderStyle::Double,
            ..WindowProperties::default()
        };
        wm.set_window_component("picky", shared(FakeComponent::new("picky", &journal).with_properties(props)))
            .unwrap();
        wm.create_or_update_view("plain", "plain").unwrap();
        wm.create_or_update_view("picky", "picky").unwrap();

        assert_eq!(wm.view("plain").unwrap().border_style, BorderStyle::Rounded);
        assert_eq!(wm.view("plain").unwrap().focus_style, FocusStyle::Both);
        assert_eq!(wm.view("picky").unwrap().border_style, BorderStyle::Double);
    }

    #[test]
    fn delete_window_destroys_surfaces() {
        let mut wm = manager();
        wm.create_window("debug", Dimensions::from_size(20, 10));
        wm.create_or_update_view("debug", "debug").unwrap();
        assert!(wm.delete_window("debug").unwrap());
        assert!(wm.window("debug").is_none());
        assert!(wm.host().view("debug").is_none());
        assert!(!wm.delete_window("debug").unwrap());
    }

    #[test]
    fn host_failures_other_than_unknown_propagate() {
        let mut wm = WindowManager::new(FlakyHost::failing_creates());
        wm.create_window("messages", Dimensions::from_size(10, 10));
        assert!(matches!(
            wm.create_or_update_view("messages", "messages"),
            Err(LayoutError::Surface(SurfaceError::Host(_)))
        ));
    }

    #[test]
    fn render_failure_names_the_panel() {
        let journal = Journal::default();
        let mut wm = manager();
        wm.create_window("messages", Dimensions::from_size(10, 10));
        wm.set_window_component("messages", shared(FakeComponent::new("messages", &journal).failing_render()))
            .unwrap();
        wm.create_or_update_view("messages", "messages").unwrap();

        let err = wm.render_window("messages").unwrap_err();
        assert!(matches!(err, LayoutError::Render { ref panel, .. } if panel == "messages"));
    }
}
