//! Responsive breakpoint table for layout decisions.
//!
//! Single source of truth for size tiers: panel ratios, hidden panels and
//! feature toggles all hang off the breakpoint picked for the current terminal.

use crate::config::LayoutConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Anything smaller than sm
    Xs,
    /// >= 60x20
    Sm,
    /// >= 80x30
    Md,
    /// >= 120x40
    Lg,
    /// >= 160x50
    Xl,
}

/// How much chrome a breakpoint can afford
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Minimal,
    Compact,
    Standard,
    Expanded,
    Full,
}

/// Row of the breakpoint table
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointConfig {
    pub min_width: i32,
    pub min_height: i32,
    pub layout_mode: LayoutMode,
    pub panel_ratios: &'static [(&'static str, f64)],
    pub hidden_panels: &'static [&'static str],
    pub features: &'static [&'static str],
}

/// Ratio used for panels missing from a breakpoint's table
const DEFAULT_RATIO: f64 = 0.1;

static XS: BreakpointConfig = BreakpointConfig {
    min_width: 0,
    min_height: 0,
    layout_mode: LayoutMode::Minimal,
    panel_ratios: &[("messages", 0.8), ("input", 0.2)],
    hidden_panels: &["debug", "sidebar"],
    features: &["compact-input", "no-borders"],
};

static SM: BreakpointConfig = BreakpointConfig {
    min_width: 60,
    min_height: 20,
    layout_mode: LayoutMode::Compact,
    panel_ratios: &[("messages", 0.75), ("input", 0.25)],
    hidden_panels: &["sidebar"],
    features: &["compact-input"],
};

static MD: BreakpointConfig = BreakpointConfig {
    min_width: 80,
    min_height: 30,
    layout_mode: LayoutMode::Standard,
    panel_ratios: &[("messages", 0.7), ("input", 0.2), ("debug", 0.1)],
    hidden_panels: &[],
    features: &[],
};

static LG: BreakpointConfig = BreakpointConfig {
    min_width: 120,
    min_height: 40,
    layout_mode: LayoutMode::Expanded,
    panel_ratios: &[("messages", 0.6), ("input", 0.15), ("debug", 0.15), ("sidebar", 0.1)],
    hidden_panels: &[],
    features: &["enhanced-sidebar", "multi-column"],
};

static XL: BreakpointConfig = BreakpointConfig {
    min_width: 160,
    min_height: 50,
    layout_mode: LayoutMode::Full,
    panel_ratios: &[("messages", 0.5), ("input", 0.15), ("debug", 0.2), ("sidebar", 0.15)],
    hidden_panels: &[],
    features: &["enhanced-sidebar", "multi-column", "split-view"],
};

impl Breakpoint {
    /// Largest first, so the first match wins
    const DESCENDING: [Breakpoint; 5] = [Self::Xl, Self::Lg, Self::Md, Self::Sm, Self::Xs];

    pub fn from_size(width: i32, height: i32) -> Self {
        Self::DESCENDING
            .into_iter()
            .find(|bp| {
                let config = bp.config();
                width >= config.min_width && height >= config.min_height
            })
            .unwrap_or(Self::Xs)
    }

    pub fn config(&self) -> &'static BreakpointConfig {
        match self {
            Self::Xs => &XS,
            Self::Sm => &SM,
            Self::Md => &MD,
            Self::Lg => &LG,
            Self::Xl => &XL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }

    pub fn hides_panel(&self, panel: &str) -> bool {
        self.config().hidden_panels.contains(&panel)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.config().features.contains(&feature)
    }

    pub fn panel_ratio(&self, panel: &str) -> f64 {
        self.config()
            .panel_ratios
            .iter()
            .find(|(name, _)| *name == panel)
            .map(|(_, ratio)| *ratio)
            .unwrap_or(DEFAULT_RATIO)
    }

    /// Panel ratio as an integer box weight, never below 1
    pub fn adaptive_weight(&self, panel: &str) -> u16 {
        ((self.panel_ratio(panel) * 100.0).round() as u16).max(1)
    }

    /// Preferred height for a panel given the total terminal height
    pub fn optimal_panel_height(&self, panel: &str, total_height: i32) -> i32 {
        let height = (f64::from(total_height) * self.panel_ratio(panel)).round() as i32;
        match panel {
            "input" if self.has_feature("compact-input") => height.min(3),
            "input" => height.min(5),
            "debug" => height.min(total_height / 3),
            "messages" => height.max(total_height / 4),
            _ => height,
        }
    }
}

/// Copy of `config` adjusted for the breakpoint of a `width` x `height` terminal
pub fn adapt_config(width: i32, height: i32, config: &LayoutConfig) -> LayoutConfig {
    let breakpoint = Breakpoint::from_size(width, height);
    let mut adapted = config.clone();

    match breakpoint.config().layout_mode {
        LayoutMode::Minimal => {
            adapted.show_sidebar = false;
            adapted.compact_mode = true;
            adapted.min_panel_width = 15;
            adapted.min_panel_height = 2;
        }
        LayoutMode::Compact => {
            adapted.show_sidebar = false;
            adapted.compact_mode = true;
            adapted.min_panel_width = 20;
            adapted.min_panel_height = 3;
        }
        LayoutMode::Standard => {
            adapted.show_sidebar = config.show_sidebar && width > 100;
        }
        LayoutMode::Expanded | LayoutMode::Full => {}
    }

    if config.adaptive_weights {
        adapted.messages_weight = breakpoint.adaptive_weight("messages");
        adapted.debug_weight = if breakpoint.hides_panel("debug") {
            0
        } else {
            breakpoint.adaptive_weight("debug")
        };
        let input = breakpoint.optimal_panel_height("input", height).max(1);
        adapted.input_height = u16::try_from(input).unwrap_or(u16::MAX);
        adapted.compact_input_height = adapted.compact_input_height.min(adapted.input_height);
    }

    adapted
}
