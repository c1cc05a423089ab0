//! Layout configuration: panel weights, fixed heights, visibility and styles
//!
//! Read by the box-tree builder on every layout pass, so a swapped config
//! takes effect on the next pass.

use serde::Deserialize;

use crate::component::{BorderStyle, FocusStyle};

/// Panel sizing and visibility
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Weight of the messages panel in the content row
    pub messages_weight: u16,
    /// Weight of the debug panel when visible
    pub debug_weight: u16,
    /// Fixed height of the input panel
    pub input_height: u16,
    /// Input height in compact mode
    pub compact_input_height: u16,
    /// Fixed height of the status strip
    pub status_height: u16,
    /// Show the sidebar panel when the terminal is wide enough
    pub show_sidebar: bool,
    /// Force compact mode regardless of terminal size
    pub compact_mode: bool,
    /// Side panels narrower than this are left out
    pub min_panel_width: u16,
    /// Stacked panels shorter than this are left out
    pub min_panel_height: u16,
    /// Border used by panels that don't pick their own
    pub border_style: BorderStyle,
    /// Focus indicator used by panels that don't pick their own
    pub focus_style: FocusStyle,
    /// Separator cells between sibling panels
    pub spacing: u16,
    /// Take NORMAL-mode weights and input height from the breakpoint's ratio table
    pub adaptive_weights: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            messages_weight: 3,
            debug_weight: 1,
            input_height: 4,
            compact_input_height: 3,
            status_height: 2,
            show_sidebar: true,
            compact_mode: false,
            min_panel_width: 20,
            min_panel_height: 3,
            border_style: BorderStyle::Single,
            focus_style: FocusStyle::Border,
            spacing: 0,
            adaptive_weights: false,
        }
    }
}

/// Layout settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLayout {
    pub messages_weight: Option<u16>,
    pub debug_weight: Option<u16>,
    pub input_height: Option<u16>,
    pub compact_input_height: Option<u16>,
    pub status_height: Option<u16>,
    pub show_sidebar: Option<bool>,
    pub compact_mode: Option<bool>,
    pub min_panel_width: Option<u16>,
    pub min_panel_height: Option<u16>,
    pub border_style: Option<String>,
    pub focus_style: Option<String>,
    pub spacing: Option<u16>,
    pub adaptive_weights: Option<bool>,
}

impl LayoutConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLayout>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            messages_weight: file.messages_weight.unwrap_or(defaults.messages_weight),
            debug_weight: file.debug_weight.unwrap_or(defaults.debug_weight),
            input_height: file.input_height.unwrap_or(defaults.input_height),
            compact_input_height: file
                .compact_input_height
                .unwrap_or(defaults.compact_input_height),
            status_height: file.status_height.unwrap_or(defaults.status_height),
            show_sidebar: file.show_sidebar.unwrap_or(defaults.show_sidebar),
            compact_mode: file.compact_mode.unwrap_or(defaults.compact_mode),
            min_panel_width: file.min_panel_width.unwrap_or(defaults.min_panel_width),
            min_panel_height: file.min_panel_height.unwrap_or(defaults.min_panel_height),
            border_style: file
                .border_style
                .map(|s| BorderStyle::from_str(&s))
                .unwrap_or(defaults.border_style),
            focus_style: file
                .focus_style
                .map(|s| FocusStyle::from_str(&s))
                .unwrap_or(defaults.focus_style),
            spacing: file.spacing.unwrap_or(defaults.spacing),
            adaptive_weights: file.adaptive_weights.unwrap_or(defaults.adaptive_weights),
        }
    }

    /// Input height for the current compactness
    pub fn input_height_for(&self, compact: bool) -> u16 {
        if compact {
            self.compact_input_height
        } else {
            self.input_height
        }
    }
}
