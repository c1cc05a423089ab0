//! Screen mode state machine
//!
//! The mode only changes through [`ScreenManager::toggle_mode`]. Everything else
//! (portrait, compact, narrow, panel weights) is derived from the current size,
//! mode and focused panel every time it is asked for.

use serde::Serialize;

/// Terminal width at or below which a tall terminal stacks panels
const PORTRAIT_MAX_WIDTH: i32 = 84;
/// Height a narrow terminal must exceed to count as portrait
const PORTRAIT_MIN_HEIGHT: i32 = 45;
const COMPACT_MIN_WIDTH: i32 = 60;
const COMPACT_MIN_HEIGHT: i32 = 24;
const NARROW_MAX_WIDTH: i32 = 100;

/// Narrow and tall: panels stack instead of sitting side by side
pub fn is_portrait(width: i32, height: i32) -> bool {
    width <= PORTRAIT_MAX_WIDTH && height > PORTRAIT_MIN_HEIGHT
}

/// Emphasis level for the main content panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    #[default]
    Normal,
    Half,
    Full,
}

impl ScreenMode {
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Half,
            Self::Half => Self::Full,
            Self::Full => Self::Normal,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "half" => Some(Self::Half),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Half => "half",
            Self::Full => "full",
        }
    }
}

/// Current terminal size, mode and focused panel
#[derive(Debug, Clone)]
pub struct ScreenManager {
    mode: ScreenMode,
    focused: Option<String>,
    width: i32,
    height: i32,
    /// Panel that expands when side panels are hidden
    main_panel: String,
}

impl Default for ScreenManager {
    fn default() -> Self {
        Self::new("messages")
    }
}

impl ScreenManager {
    pub fn new(main_panel: impl Into<String>) -> Self {
        Self {
            mode: ScreenMode::Normal,
            focused: None,
            width: 0,
            height: 0,
            main_panel: main_panel.into(),
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ScreenMode) {
        self.mode = mode;
    }

    /// NORMAL -> HALF -> FULL -> NORMAL
    pub fn toggle_mode(&mut self) -> ScreenMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn set_focused_window(&mut self, name: Option<&str>) {
        self.focused = name.map(str::to_string);
    }

    pub fn focused_window(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn main_panel(&self) -> &str {
        &self.main_panel
    }

    pub fn set_dimensions(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn is_portrait_mode(&self) -> bool {
        is_portrait(self.width, self.height)
    }

    pub fn is_compact_mode(&self) -> bool {
        self.height < COMPACT_MIN_HEIGHT || self.width < COMPACT_MIN_WIDTH
    }

    pub fn is_narrow_mode(&self) -> bool {
        self.width < NARROW_MAX_WIDTH
    }

    /// Only in HALF/FULL while the main panel has focus
    pub fn should_hide_side_panels(&self) -> bool {
        match self.mode {
            ScreenMode::Half | ScreenMode::Full => {
                self.focused.as_deref() == Some(self.main_panel.as_str())
            }
            ScreenMode::Normal => false,
        }
    }

    pub fn main_panel_weight(&self) -> u16 {
        match self.mode {
            ScreenMode::Normal => 3,
            ScreenMode::Half if self.should_hide_side_panels() => 5,
            ScreenMode::Half => 4,
            ScreenMode::Full => 5,
        }
    }

    pub fn side_panel_weight(&self) -> u16 {
        if self.should_hide_side_panels() {
            return 0;
        }
        match self.mode {
            ScreenMode::Normal => 2,
            ScreenMode::Half => 1,
            ScreenMode::Full => 0,
        }
    }
}
