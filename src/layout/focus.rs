//! Focus tracking
//!
//! Pure state: which panel has focus and the stack of focus saved by open
//! overlays. Every change returns a [`FocusTransition`]; the layout manager
//! turns it into `handle_focus_lost` / `handle_focus` calls, lost first.

/// Focus moved from one panel to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTransition {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    current: Option<String>,
    /// Focus saved by each open overlay, innermost last
    stack: Vec<Option<String>>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Number of open overlays
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Focus `panel`; `None` when it already has focus
    pub fn set_focus(&mut self, panel: &str) -> Option<FocusTransition> {
        if self.current.as_deref() == Some(panel) {
            return None;
        }
        Some(self.move_to(Some(panel.to_string())))
    }

    /// Drop focus entirely, e.g. when the focused panel disappears
    pub fn clear(&mut self) -> Option<FocusTransition> {
        self.current.as_ref()?;
        Some(self.move_to(None))
    }

    /// Save the current focus and focus `panel`
    pub fn push_focus(&mut self, panel: &str) -> FocusTransition {
        self.stack.push(self.current.clone());
        self.move_to(Some(panel.to_string()))
    }

    /// Restore the focus saved by the matching push; empty stack is a no-op
    pub fn pop_focus(&mut self) -> Option<FocusTransition> {
        let saved = self.stack.pop()?;
        Some(self.move_to(saved))
    }

    /// Advance to the next available panel in `order`, wrapping around
    ///
    /// Panels for which `is_available` is false are skipped. When the current
    /// panel is not in the filtered list, focus goes to its first entry.
    pub fn cycle_focus<F>(&mut self, order: &[String], is_available: F) -> Option<FocusTransition>
    where
        F: Fn(&str) -> bool,
    {
        let available: Vec<&String> = order.iter().filter(|p| is_available(p)).collect();
        if available.is_empty() {
            return None;
        }
        let next = match self
            .current
            .as_ref()
            .and_then(|c| available.iter().position(|p| *p == c))
        {
            Some(index) => (index + 1) % available.len(),
            None => 0,
        };
        let next = available[next].clone();
        self.set_focus(&next)
    }

    /// Forget saved focus entries that name `panel`, replacing them with no focus
    pub(crate) fn forget(&mut self, panel: &str) {
        for saved in &mut self.stack {
            if saved.as_deref() == Some(panel) {
                *saved = None;
            }
        }
    }

    fn move_to(&mut self, to: Option<String>) -> FocusTransition {
        let from = std::mem::replace(&mut self.current, to.clone());
        FocusTransition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<String> {
        ["input", "messages", "debug"].map(String::from).to_vec()
    }

    #[test]
    fn starts_without_focus() {
        let focus = FocusManager::new();
        assert_eq!(focus.current(), None);
        assert_eq!(focus.depth(), 0);
    }

    #[test]
    fn set_focus_reports_previous_panel() {
        let mut focus = FocusManager::new();
        let first = focus.set_focus("input").unwrap();
        assert_eq!(first.from, None);

        let second = focus.set_focus("messages").unwrap();
        assert_eq!(second.from.as_deref(), Some("input"));
        assert_eq!(second.to.as_deref(), Some("messages"));

        assert!(focus.set_focus("messages").is_none());
    }

    #[test]
    fn cycle_wraps_from_last_to_first() {
        let mut focus = FocusManager::new();
        focus.set_focus("debug");
        let t = focus.cycle_focus(&order(), |_| true).unwrap();
        assert_eq!(t.to.as_deref(), Some("input"));
    }

    #[test]
    fn cycle_skips_unavailable_without_touching_order() {
        let order = order();
        let mut focus = FocusManager::new();
        focus.set_focus("messages");
        let t = focus.cycle_focus(&order, |p| p != "debug").unwrap();
        assert_eq!(t.to.as_deref(), Some("input"));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn cycle_from_hidden_panel_lands_on_first() {
        let mut focus = FocusManager::new();
        focus.set_focus("debug");
        let t = focus.cycle_focus(&order(), |p| p != "debug").unwrap();
        assert_eq!(t.to.as_deref(), Some("input"));
    }

    #[test]
    fn cycle_with_nothing_available_is_noop() {
        let mut focus = FocusManager::new();
        focus.set_focus("input");
        assert!(focus.cycle_focus(&order(), |_| false).is_none());
        assert_eq!(focus.current(), Some("input"));
    }

    #[test]
    fn push_pop_restores_exact_focus() {
        let mut focus = FocusManager::new();
        focus.set_focus("messages");
        for n in 1..=4 {
            for i in 0..n {
                focus.push_focus(&format!("dialog-{i}"));
            }
            assert_eq!(focus.depth(), n);
            for _ in 0..n {
                focus.pop_focus();
            }
            assert_eq!(focus.current(), Some("messages"));
        }
    }

    #[test]
    fn nested_pop_restores_inner_overlay_first() {
        let mut focus = FocusManager::new();
        focus.set_focus("input");
        focus.push_focus("help");
        focus.push_focus("confirm");
        let t = focus.pop_focus().unwrap();
        assert_eq!(t.from.as_deref(), Some("confirm"));
        assert_eq!(t.to.as_deref(), Some("help"));
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut focus = FocusManager::new();
        focus.set_focus("input");
        assert!(focus.pop_focus().is_none());
        assert_eq!(focus.current(), Some("input"));
    }

    #[test]
    fn forgotten_panel_is_not_restored() {
        let mut focus = FocusManager::new();
        focus.set_focus("debug");
        focus.push_focus("help");
        focus.forget("debug");
        let t = focus.pop_focus().unwrap();
        assert_eq!(t.to, None);
    }
}
