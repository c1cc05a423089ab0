//! Layout orchestration
//!
//! One [`LayoutManager::layout`] call is one pass:
//!
//! ```text
//! size ──▶ ScreenManager ──▶ build_plan ──▶ arrange ──▶ WindowManager ──▶ render
//!                              │                          ▲
//!                              └── hidden panels ─────────┘ (deleted)
//! ```
//!
//! The whole tree is arranged before any window is touched, so a component
//! never renders against a rectangle computed from a stale sibling. Components
//! re-render when the terminal size changed or their surface was just created.
//!
//! Focus and overlays live here too: the [`FocusManager`] decides where focus
//! goes, this module fires the component callbacks (lost before gained) and
//! points the host's current view at the new panel.

use super::arrange::{arrange, Arrangement};
use super::builder::{build_plan, Preset};
use super::dimensions::Dimensions;
use super::error::LayoutError;
use super::focus::{FocusManager, FocusTransition};
use super::screen::{ScreenManager, ScreenMode};
use super::surface::SurfaceHost;
use super::window::{ViewChange, WindowManager};
use crate::component::{ComponentRef, Handled};
use crate::config::LayoutConfig;
use crossterm::event::KeyEvent;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Centered surface outside the box tree (help, dialogs)
#[derive(Clone)]
struct Overlay {
    name: String,
    component: ComponentRef,
    width: i32,
    height: i32,
}

pub struct LayoutManager<H: SurfaceHost> {
    windows: WindowManager<H>,
    screen: ScreenManager,
    focus: FocusManager,
    config: LayoutConfig,
    preset: Preset,
    navigation_order: Vec<String>,
    /// Panels with a component, in registration order
    components: Vec<(String, ComponentRef)>,
    /// Open overlays, innermost last
    overlays: Vec<Overlay>,
    last_size: Option<(i32, i32)>,
    /// Window names placed by the last pass
    arranged: Arrangement,
}

impl<H: SurfaceHost> LayoutManager<H> {
    pub fn new(host: H, config: LayoutConfig) -> Self {
        Self::from_parts(
            WindowManager::new(host),
            ScreenManager::default(),
            FocusManager::new(),
            config,
        )
    }

    /// Assemble from separately owned state containers
    pub fn from_parts(
        windows: WindowManager<H>,
        screen: ScreenManager,
        focus: FocusManager,
        config: LayoutConfig,
    ) -> Self {
        Self {
            windows,
            screen,
            focus,
            config,
            preset: Preset::default(),
            navigation_order: Vec::new(),
            components: Vec::new(),
            overlays: Vec::new(),
            last_size: None,
            arranged: Arrangement::new(),
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Tab order; panels missing from it are never cycled to
    pub fn with_navigation_order(mut self, order: Vec<String>) -> Self {
        self.navigation_order = order;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layout pass
    // ─────────────────────────────────────────────────────────────────────────

    /// Arrange and reconcile all windows for a `width` x `height` terminal
    pub fn layout(&mut self, width: i32, height: i32) -> Result<(), LayoutError> {
        if width <= 0 || height <= 0 {
            debug!(width, height, "Skipping layout pass: terminal has no area");
            return Ok(());
        }

        let resized = self.last_size != Some((width, height));
        if resized {
            info!(width, height, previous = ?self.last_size, "Terminal resized");
            self.last_size = Some((width, height));
        }
        self.screen.set_dimensions(width, height);
        self.windows
            .set_default_styles(self.config.border_style, self.config.focus_style);

        let registered: Vec<String> = self.components.iter().map(|(n, _)| n.clone()).collect();
        let plan = build_plan(&self.config, &self.screen, self.preset, &registered);
        let outer = Dimensions::from_size(width, height);
        let arrangement = arrange(&plan.root, outer);
        debug!(
            breakpoint = plan.breakpoint.as_str(),
            compact = plan.compact,
            windows = arrangement.len(),
            "Arranged layout"
        );

        for name in &plan.hidden {
            if self.windows.delete_window(name)? {
                info!(panel = %name, breakpoint = plan.breakpoint.as_str(), "Panel hidden");
                self.focus.forget(name);
            }
        }

        let mut created = Vec::new();
        for (name, dimensions) in &arrangement {
            let Some(component) = self.registered_component(name) else {
                continue;
            };
            if self.windows.has_window(name) {
                self.windows.update_window_dimensions(name, *dimensions)?;
            } else {
                self.windows.create_window(name, *dimensions);
                self.windows.set_window_component(name, component.clone())?;
            }
            let view_name = component.borrow().view_name();
            if self.windows.create_or_update_view(name, &view_name)? == ViewChange::Created {
                created.push(name.clone());
            }
            if let Some(view) = self.windows.view_mut(name) {
                view.set_visible(true);
            }
        }

        // Squeezed out this pass: keep the surface, stop painting it
        let squeezed: Vec<String> = self
            .components
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| !arrangement.contains_key(name))
            .collect();
        for name in &squeezed {
            if let Some(view) = self.windows.view_mut(name) {
                if view.is_visible() {
                    debug!(panel = %name, "Panel has no room this pass");
                    view.set_visible(false);
                }
            }
        }

        for overlay in self.overlays.clone() {
            self.place_overlay(&overlay, outer)?;
        }
        self.arranged = arrangement;

        if resized {
            self.render_all()?;
        } else {
            for name in &created {
                self.windows.render_window(name)?;
            }
        }

        self.ensure_focus_visible()
    }

    /// Re-render every visible panel and overlay
    pub fn render_all(&mut self) -> Result<(), LayoutError> {
        let names: Vec<String> = self
            .arranged
            .keys()
            .filter(|name| self.windows.window_component(name).is_some())
            .cloned()
            .chain(self.overlays.iter().map(|o| o.name.clone()))
            .collect();
        for name in names {
            self.windows.render_window(&name)?;
        }
        Ok(())
    }

    /// Re-render one panel, e.g. after its content changed
    pub fn render_panel(&mut self, panel: &str) -> Result<(), LayoutError> {
        if !self.windows.has_window(panel) {
            return Ok(());
        }
        self.windows.render_window(panel)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Components
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind `component` to `panel`; an existing surface is reconfigured in place
    pub fn set_window_component(
        &mut self,
        panel: &str,
        component: ComponentRef,
    ) -> Result<(), LayoutError> {
        match self.components.iter_mut().find(|(name, _)| name == panel) {
            Some((_, existing)) => *existing = component.clone(),
            None => self.components.push((panel.to_string(), component.clone())),
        }
        if self.windows.has_window(panel) {
            self.windows.set_window_component(panel, component)?;
        }
        Ok(())
    }

    pub fn get_window_component(&self, panel: &str) -> Option<ComponentRef> {
        self.registered_component(panel)
    }

    /// Replace a panel's component and redraw it right away
    pub fn swap_component(
        &mut self,
        panel: &str,
        component: ComponentRef,
    ) -> Result<(), LayoutError> {
        if self.registered_component(panel).is_none() {
            return Err(LayoutError::UnknownPanel(panel.to_string()));
        }
        info!(panel, "Swapping component");
        self.set_window_component(panel, component)?;
        self.render_panel(panel)
    }

    /// Panels with a bound component, in registration order
    pub fn available_panels(&self) -> Vec<String> {
        self.components.iter().map(|(name, _)| name.clone()).collect()
    }

    fn registered_component(&self, panel: &str) -> Option<ComponentRef> {
        self.components
            .iter()
            .find(|(name, _)| name == panel)
            .map(|(_, c)| Rc::clone(c))
    }

    /// Registered panel or open overlay
    fn component_for(&self, panel: &str) -> Option<ComponentRef> {
        self.registered_component(panel).or_else(|| {
            self.overlays
                .iter()
                .find(|o| o.name == panel)
                .map(|o| Rc::clone(&o.component))
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────────

    pub fn focused(&self) -> Option<&str> {
        self.focus.current()
    }

    /// Whether `panel` can take focus right now: focusable, with a visible surface
    pub fn is_focusable(&self, panel: &str) -> bool {
        let Some(component) = self.component_for(panel) else {
            return false;
        };
        let focusable = component.borrow().window_properties().focusable;
        focusable && self.windows.view(panel).is_some_and(|v| v.is_visible())
    }

    pub fn set_focus(&mut self, panel: &str) -> Result<(), LayoutError> {
        if self.component_for(panel).is_none() {
            return Err(LayoutError::UnknownPanel(panel.to_string()));
        }
        if !self.is_focusable(panel) {
            return Err(LayoutError::NotFocusable(panel.to_string()));
        }
        match self.focus.set_focus(panel) {
            Some(transition) => self.apply_transition(transition),
            None => Ok(()),
        }
    }

    /// Move focus to the next focusable panel in navigation order
    ///
    /// Does nothing while an overlay holds focus. Returns the newly focused panel.
    pub fn cycle_focus(&mut self) -> Result<Option<String>, LayoutError> {
        if !self.overlays.is_empty() {
            return Ok(None);
        }
        let order = self.navigation_order();
        let available: Vec<String> = order
            .iter()
            .filter(|p| self.is_focusable(p))
            .cloned()
            .collect();
        match self
            .focus
            .cycle_focus(&order, |p| available.iter().any(|a| a == p))
        {
            Some(transition) => {
                let to = transition.to.clone();
                self.apply_transition(transition)?;
                Ok(to)
            }
            None => Ok(None),
        }
    }

    /// Save the current focus and focus `panel`
    pub fn push_focus(&mut self, panel: &str) -> Result<(), LayoutError> {
        if self.component_for(panel).is_none() {
            return Err(LayoutError::UnknownPanel(panel.to_string()));
        }
        let transition = self.focus.push_focus(panel);
        debug!(panel, depth = self.focus.depth(), "Focus pushed");
        self.apply_transition(transition)
    }

    /// Restore the focus saved by the last push; empty stack is a no-op
    pub fn pop_focus(&mut self) -> Result<(), LayoutError> {
        match self.focus.pop_focus() {
            Some(transition) => {
                debug!(restored = ?transition.to, depth = self.focus.depth(), "Focus popped");
                self.apply_transition(transition)
            }
            None => Ok(()),
        }
    }

    /// Saved focus entries, one per open overlay
    pub fn focus_depth(&self) -> usize {
        self.focus.depth()
    }

    fn navigation_order(&self) -> Vec<String> {
        if self.navigation_order.is_empty() {
            self.available_panels()
        } else {
            self.navigation_order.clone()
        }
    }

    /// Fire lost on the old panel, then gained on the new one
    fn apply_transition(&mut self, transition: FocusTransition) -> Result<(), LayoutError> {
        if let Some(from) = &transition.from {
            if let Some(component) = self.component_for(from) {
                component
                    .borrow_mut()
                    .handle_focus_lost()
                    .map_err(|source| LayoutError::Focus {
                        panel: from.clone(),
                        source,
                    })?;
            }
        }

        self.screen.set_focused_window(transition.to.as_deref());
        let Some(to) = &transition.to else {
            self.windows.host_mut().set_current_view(None)?;
            info!(from = ?transition.from, "Focus cleared");
            return Ok(());
        };

        if let Some(component) = self.component_for(to) {
            component
                .borrow_mut()
                .handle_focus()
                .map_err(|source| LayoutError::Focus {
                    panel: to.clone(),
                    source,
                })?;
            let highlight = component.borrow().window_properties().highlight;
            let view_name = self.windows.window(to).and_then(|w| w.view_name()).map(str::to_string);
            if let Some(view_name) = view_name {
                self.windows.host_mut().set_current_view(Some(&view_name))?;
                if let Some(view) = self.windows.view_mut(to) {
                    if highlight {
                        view.highlight = true;
                    }
                }
            }
        }
        info!(from = ?transition.from, to = %to, "Focus changed");
        Ok(())
    }

    /// Focus must sit on a visible panel; move it when the pass took it away
    fn ensure_focus_visible(&mut self) -> Result<(), LayoutError> {
        let Some(current) = self.focus.current().map(str::to_string) else {
            return Ok(());
        };
        if self.is_focusable(&current) {
            return Ok(());
        }
        if self.overlays.iter().any(|o| o.name == current) {
            return Ok(());
        }
        warn!(panel = %current, "Focused panel is no longer visible");
        let order = self.navigation_order();
        let available: Vec<String> = order
            .iter()
            .filter(|p| self.is_focusable(p))
            .cloned()
            .collect();
        let transition = match self
            .focus
            .cycle_focus(&order, |p| available.iter().any(|a| a == p))
        {
            Some(transition) => Some(transition),
            None => self.focus.clear(),
        };
        match transition {
            Some(transition) => self.apply_transition(transition),
            None => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Overlays
    // ─────────────────────────────────────────────────────────────────────────

    /// Show `component` centered over the panels and give it focus
    pub fn open_overlay(
        &mut self,
        name: &str,
        component: ComponentRef,
        width: i32,
        height: i32,
    ) -> Result<(), LayoutError> {
        // Already open: refocus it, the saved focus stays where it is
        if self.overlay_open(name) {
            debug!(overlay = name, "Overlay already open");
            return match self.focus.set_focus(name) {
                Some(transition) => self.apply_transition(transition),
                None => Ok(()),
            };
        }
        let overlay = Overlay {
            name: name.to_string(),
            component,
            width,
            height,
        };
        self.overlays.push(overlay.clone());

        let (w, h) = self.last_size.unwrap_or((0, 0));
        self.place_overlay(&overlay, Dimensions::from_size(w, h))?;
        self.windows.render_window(name)?;
        info!(overlay = name, depth = self.overlays.len(), "Overlay opened");
        self.push_focus(name)
    }

    /// Remove an overlay and restore the focus it saved
    pub fn close_overlay(&mut self, name: &str) -> Result<(), LayoutError> {
        let Some(index) = self.overlays.iter().position(|o| o.name == name) else {
            return Ok(());
        };
        // Pop while the overlay is still registered so it gets its focus-lost call
        if index + 1 == self.overlays.len() {
            self.pop_focus()?;
        } else {
            self.focus.forget(name);
        }
        self.overlays.remove(index);
        self.windows.delete_window(name)?;
        info!(overlay = name, depth = self.overlays.len(), "Overlay closed");
        self.ensure_focus_visible()
    }

    pub fn overlay_open(&self, name: &str) -> bool {
        self.overlays.iter().any(|o| o.name == name)
    }

    pub fn has_overlay(&self) -> bool {
        !self.overlays.is_empty()
    }

    fn place_overlay(&mut self, overlay: &Overlay, outer: Dimensions) -> Result<(), LayoutError> {
        let dimensions = outer.centered(overlay.width, overlay.height);
        if self.windows.has_window(&overlay.name) {
            self.windows.update_window_dimensions(&overlay.name, dimensions)?;
        } else {
            self.windows.create_window(&overlay.name, dimensions);
            self.windows
                .set_window_component(&overlay.name, overlay.component.clone())?;
        }
        if dimensions.is_degenerate() {
            return Ok(());
        }
        let view_name = overlay.component.borrow().view_name();
        self.windows.create_or_update_view(&overlay.name, &view_name)?;
        if let Some(view) = self.windows.view_mut(&overlay.name) {
            view.set_overlay(true);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Route a key to the focused panel
    ///
    /// The component's keybindings get the first chance; unclaimed keys go to
    /// the built-in editor when the focused surface is editable.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> Result<Handled, LayoutError> {
        let Some(focused) = self.focus.current().map(str::to_string) else {
            return Ok(Handled::No);
        };
        let Some(component) = self.component_for(&focused) else {
            return Ok(Handled::No);
        };
        let Some(view_name) = self
            .windows
            .window(&focused)
            .and_then(|w| w.view_name())
            .map(str::to_string)
        else {
            return Ok(Handled::No);
        };

        let bindings = component.borrow().keybindings();
        for binding in bindings.iter().filter(|b| b.matches(&view_name, event)) {
            let Some(view) = self.windows.view_mut(&focused) else {
                break;
            };
            let handled = (binding.handler)(view).map_err(|source| LayoutError::KeyHandler {
                panel: focused.clone(),
                source,
            })?;
            if handled.was_handled() {
                return Ok(Handled::Yes);
            }
        }

        match self.windows.view_mut(&focused) {
            Some(view) if view.editable => Ok(view.edit(event)),
            _ => Ok(Handled::No),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Screen and config
    // ─────────────────────────────────────────────────────────────────────────

    /// NORMAL -> HALF -> FULL -> NORMAL; applies on the next pass
    pub fn toggle_screen_mode(&mut self) -> ScreenMode {
        let mode = self.screen.toggle_mode();
        info!(mode = mode.as_str(), "Screen mode toggled");
        mode
    }

    pub fn screen(&self) -> &ScreenManager {
        &self.screen
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Swap config; read on the next pass
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
    }

    /// Terminal size seen by the last pass
    pub fn last_size(&self) -> Option<(i32, i32)> {
        self.last_size
    }

    /// Rectangles placed by the last pass
    pub fn arrangement(&self) -> &Arrangement {
        &self.arranged
    }

    pub fn windows(&self) -> &WindowManager<H> {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager<H> {
        &mut self.windows
    }

    pub fn host(&self) -> &H {
        self.windows.host()
    }
}
