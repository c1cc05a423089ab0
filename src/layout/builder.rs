// Box-tree construction for the chat panels
//
// Turns the layout config, the screen state and the set of registered panels
// into a `LayoutPlan`: the root box for this pass plus the panels that the
// current size or config rules out entirely. Panels squeezed to nothing by the
// weights stay out of the plan's `hidden` list; they keep their surfaces and
// come back when there is room again.
//
// Two presets:
// - classic: messages | debug | sidebar side by side, input and status below
// - stacked: messages, debug and sidebar stacked as rows
// Portrait terminals always get the stacked arrangement.

use super::boxes::{Direction, LayoutBox};
use super::responsive::{adapt_config, Breakpoint};
use super::screen::{is_portrait, ScreenManager, ScreenMode};
use crate::config::LayoutConfig;

pub const MESSAGES: &str = "messages";
pub const INPUT: &str = "input";
pub const DEBUG: &str = "debug";
pub const SIDEBAR: &str = "sidebar";
pub const STATUS: &str = "status";
pub const STATUS_LEFT: &str = "status-left";
pub const STATUS_RIGHT: &str = "status-right";

/// Width of the right half of a split status strip
const STATUS_RIGHT_WIDTH: u16 = 24;
/// Narrower terminals get a single status leaf
const STATUS_SPLIT_MIN_WIDTH: i32 = 60;

/// Named arrangement of the content panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Classic,
    Stacked,
}

impl Preset {
    /// Get preset by name, unknown names fall back to classic
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "stacked" => Self::Stacked,
            _ => Self::Classic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Stacked => "stacked",
        }
    }
}

/// Result of building the tree for one pass
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub root: LayoutBox,
    pub breakpoint: Breakpoint,
    pub compact: bool,
    /// Registered panels removed at this size/config; their windows get deleted
    pub hidden: Vec<String>,
}

/// Content row: main panel plus optional side panels
#[derive(Debug, Clone)]
struct ContentSpec {
    messages: bool,
    main_weight: u16,
    sides: Vec<(String, u16)>,
    stacked: bool,
    min_width: i32,
    min_height: i32,
    spacing: u16,
}

impl ContentSpec {
    fn node(&self, portrait: bool) -> LayoutBox {
        let direction = if self.stacked || portrait {
            Direction::Row
        } else {
            Direction::Column
        };
        let spec = self.clone();
        LayoutBox::conditional(direction, move |width, height| spec.children(direction, width, height))
            .spacing(self.spacing)
    }

    /// Side panels whose share along the axis is below the minimum are left out
    fn children(&self, direction: Direction, width: i32, height: i32) -> Vec<LayoutBox> {
        let (extent, min) = match direction {
            Direction::Row => (height, self.min_height),
            Direction::Column => (width, self.min_width),
        };
        let main = if self.messages { self.main_weight.max(1) } else { 0 };
        let total: i32 = i32::from(main)
            + self.sides.iter().map(|(_, w)| i32::from(*w)).sum::<i32>();

        let mut children = Vec::new();
        if self.messages {
            children.push(LayoutBox::window(MESSAGES).weight(main));
        }
        for (name, weight) in &self.sides {
            if *weight == 0 || total == 0 {
                continue;
            }
            if extent * i32::from(*weight) / total >= min {
                children.push(LayoutBox::window(name.clone()).weight(*weight));
            }
        }
        children
    }
}

/// Status strip: split in two when wide enough
#[derive(Debug, Clone)]
struct StatusSpec {
    single: bool,
    split: bool,
    height: u16,
}

impl StatusSpec {
    fn node(&self) -> Option<LayoutBox> {
        if !self.single && !self.split {
            return None;
        }
        let spec = self.clone();
        let node = LayoutBox::conditional(Direction::Column, move |width, _| {
            if spec.split && (width >= STATUS_SPLIT_MIN_WIDTH || !spec.single) {
                if width >= STATUS_SPLIT_MIN_WIDTH {
                    vec![
                        LayoutBox::window(STATUS_LEFT).weight(2),
                        LayoutBox::window(STATUS_RIGHT).size(STATUS_RIGHT_WIDTH),
                    ]
                } else {
                    vec![LayoutBox::window(STATUS_LEFT).weight(1)]
                }
            } else {
                vec![LayoutBox::window(STATUS).weight(1)]
            }
        });
        Some(node.size(self.height))
    }
}

/// Build the tree for the screen's current size
///
/// `registered` lists panels that have a component, in registration order.
pub fn build_plan(
    config: &LayoutConfig,
    screen: &ScreenManager,
    preset: Preset,
    registered: &[String],
) -> LayoutPlan {
    let (width, height) = screen.dimensions();
    let breakpoint = Breakpoint::from_size(width, height);
    let adapted = adapt_config(width, height, config);
    let compact = adapted.compact_mode
        || screen.is_compact_mode()
        || breakpoint.has_feature("compact-input");

    let hidden: Vec<String> = registered
        .iter()
        .filter(|name| {
            breakpoint.hides_panel(name)
                || (name.as_str() == SIDEBAR && (!adapted.show_sidebar || compact))
                || (name.as_str() == DEBUG && adapted.debug_weight == 0)
        })
        .cloned()
        .collect();
    let shown = |name: &str| registered.iter().any(|r| r == name) && !hidden.iter().any(|h| h == name);

    let (main_weight, side_weight) = match screen.mode() {
        ScreenMode::Normal => (adapted.messages_weight, adapted.debug_weight),
        ScreenMode::Half | ScreenMode::Full => {
            (screen.main_panel_weight(), screen.side_panel_weight())
        }
    };

    let content = ContentSpec {
        messages: shown(MESSAGES),
        main_weight,
        sides: [DEBUG, SIDEBAR]
            .into_iter()
            .filter(|name| shown(name))
            .map(|name| (name.to_string(), side_weight))
            .collect(),
        stacked: preset == Preset::Stacked,
        min_width: i32::from(adapted.min_panel_width),
        min_height: i32::from(adapted.min_panel_height),
        spacing: adapted.spacing,
    };
    let input_height = shown(INPUT).then(|| adapted.input_height_for(compact));
    let status = StatusSpec {
        single: shown(STATUS),
        split: shown(STATUS_LEFT) && shown(STATUS_RIGHT),
        height: adapted.status_height,
    };

    let root = LayoutBox::conditional(Direction::Row, move |width, height| {
        let mut rows = vec![content.node(is_portrait(width, height)).weight(1)];
        if let Some(input_height) = input_height {
            rows.push(LayoutBox::window(INPUT).size(input_height));
        }
        rows.extend(status.node());
        rows
    })
    .spacing(adapted.spacing);

    LayoutPlan {
        root,
        breakpoint,
        compact,
        hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::arrange::arrange;
    use crate::layout::dimensions::Dimensions;

    fn panels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn screen(width: i32, height: i32) -> ScreenManager {
        let mut screen = ScreenManager::default();
        screen.set_dimensions(width, height);
        screen
    }

    fn run(
        config: &LayoutConfig,
        screen: &ScreenManager,
        preset: Preset,
        registered: &[&str],
    ) -> (LayoutPlan, crate::layout::arrange::Arrangement) {
        let plan = build_plan(config, screen, preset, &panels(registered));
        let (w, h) = screen.dimensions();
        let arrangement = arrange(&plan.root, Dimensions::from_size(w, h));
        (plan, arrangement)
    }

    const CHAT: [&str; 4] = [MESSAGES, INPUT, DEBUG, STATUS];

    #[test]
    fn classic_landscape_puts_debug_beside_messages() {
        let (plan, result) = run(&LayoutConfig::default(), &screen(120, 40), Preset::Classic, &CHAT);
        assert_eq!(plan.breakpoint, Breakpoint::Lg);
        assert!(plan.hidden.is_empty());
        assert_eq!(result[MESSAGES], Dimensions::new(0, 0, 90, 34));
        assert_eq!(result[DEBUG], Dimensions::new(90, 0, 120, 34));
        assert_eq!(result[INPUT], Dimensions::new(0, 34, 120, 38));
        assert_eq!(result[STATUS], Dimensions::new(0, 38, 120, 40));
    }

    #[test]
    fn adaptive_weights_size_panels_from_the_breakpoint() {
        let config = LayoutConfig {
            adaptive_weights: true,
            ..LayoutConfig::default()
        };
        let (_, result) = run(&config, &screen(120, 40), Preset::Classic, &CHAT);
        assert_eq!(result[MESSAGES], Dimensions::new(0, 0, 96, 33));
        assert_eq!(result[DEBUG], Dimensions::new(96, 0, 120, 33));
        assert_eq!(result[INPUT], Dimensions::new(0, 33, 120, 38));
    }

    #[test]
    fn portrait_stacks_content_rows() {
        let (_, result) = run(&LayoutConfig::default(), &screen(80, 50), Preset::Classic, &CHAT);
        assert_eq!(result[MESSAGES], Dimensions::new(0, 0, 80, 33));
        assert_eq!(result[DEBUG], Dimensions::new(0, 33, 80, 44));
        assert_eq!(result[INPUT], Dimensions::new(0, 44, 80, 48));
    }

    #[test]
    fn stacked_preset_stacks_in_landscape() {
        let (_, result) = run(&LayoutConfig::default(), &screen(120, 40), Preset::Stacked, &CHAT);
        assert_eq!(result[MESSAGES].width(), 120);
        assert_eq!(result[DEBUG].y0, result[MESSAGES].y1);
    }

    #[test]
    fn tiny_terminal_hides_debug_and_shrinks_input() {
        let (plan, result) = run(&LayoutConfig::default(), &screen(50, 15), Preset::Classic, &CHAT);
        assert_eq!(plan.breakpoint, Breakpoint::Xs);
        assert!(plan.compact);
        assert_eq!(plan.hidden, ["debug"]);
        assert!(!result.contains_key(DEBUG));
        assert_eq!(result[INPUT].height(), 3);
        assert_eq!(result[MESSAGES], Dimensions::new(0, 0, 50, 10));
    }

    #[test]
    fn full_mode_squeezes_side_panels_without_hiding_them() {
        let mut screen = screen(120, 40);
        screen.set_mode(ScreenMode::Full);
        screen.set_focused_window(Some(MESSAGES));
        let (plan, result) = run(&LayoutConfig::default(), &screen, Preset::Classic, &CHAT);
        assert!(plan.hidden.is_empty());
        assert!(!result.contains_key(DEBUG));
        assert_eq!(result[MESSAGES].width(), 120);
    }

    #[test]
    fn half_mode_uses_screen_weights() {
        let mut screen = screen(100, 40);
        screen.set_mode(ScreenMode::Half);
        screen.set_focused_window(Some(INPUT));
        let (_, result) = run(&LayoutConfig::default(), &screen, Preset::Classic, &CHAT);
        assert_eq!(result[MESSAGES].width(), 80);
        assert_eq!(result[DEBUG].width(), 20);
    }

    #[test]
    fn side_panel_below_min_width_is_left_out() {
        let (plan, result) = run(&LayoutConfig::default(), &screen(70, 25), Preset::Classic, &CHAT);
        assert!(plan.hidden.is_empty());
        assert!(!result.contains_key(DEBUG));
        assert_eq!(result[MESSAGES].width(), 70);
    }

    #[test]
    fn sidebar_follows_breakpoint_and_config() {
        let registered = [MESSAGES, INPUT, DEBUG, SIDEBAR, STATUS];
        let (plan, result) = run(&LayoutConfig::default(), &screen(130, 40), Preset::Classic, &registered);
        assert!(plan.hidden.is_empty());
        assert_eq!(result[MESSAGES].width(), 78);
        assert_eq!(result[DEBUG].width(), 26);
        assert_eq!(result[SIDEBAR], Dimensions::new(104, 0, 130, 34));

        let (plan, _) = run(&LayoutConfig::default(), &screen(90, 35), Preset::Classic, &registered);
        assert_eq!(plan.hidden, ["sidebar"]);

        let config = LayoutConfig {
            show_sidebar: false,
            ..LayoutConfig::default()
        };
        let (plan, _) = run(&config, &screen(130, 40), Preset::Classic, &registered);
        assert_eq!(plan.hidden, ["sidebar"]);
    }

    #[test]
    fn status_strip_splits_when_wide() {
        let registered = [MESSAGES, INPUT, STATUS, STATUS_LEFT, STATUS_RIGHT];
        let (_, wide) = run(&LayoutConfig::default(), &screen(120, 40), Preset::Classic, &registered);
        assert_eq!(wide[STATUS_LEFT], Dimensions::new(0, 38, 96, 40));
        assert_eq!(wide[STATUS_RIGHT], Dimensions::new(96, 38, 120, 40));
        assert!(!wide.contains_key(STATUS));

        let (_, narrow) = run(&LayoutConfig::default(), &screen(50, 15), Preset::Classic, &registered);
        assert_eq!(narrow[STATUS], Dimensions::new(0, 13, 50, 15));
        assert!(!narrow.contains_key(STATUS_LEFT));
    }

    #[test]
    fn unregistered_panels_are_not_in_the_tree() {
        let (_, result) = run(&LayoutConfig::default(), &screen(120, 40), Preset::Classic, &[MESSAGES]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[MESSAGES], Dimensions::from_size(120, 40));
    }

    #[test]
    fn config_sizes_are_read_at_build_time() {
        let config = LayoutConfig {
            input_height: 6,
            status_height: 1,
            spacing: 1,
            ..LayoutConfig::default()
        };
        let (_, result) = run(&config, &screen(120, 40), Preset::Classic, &CHAT);
        assert_eq!(result[INPUT].height(), 6);
        assert_eq!(result[STATUS].height(), 1);
        // one separator row between each of the three root rows
        assert_eq!(result[MESSAGES].height(), 40 - 6 - 1 - 2);
        assert_eq!(result[DEBUG].x0, result[MESSAGES].x1 + 1);
    }

    #[test]
    fn preset_names() {
        assert_eq!(Preset::from_name("Stacked"), Preset::Stacked);
        assert_eq!(Preset::from_name("nope"), Preset::Classic);
        assert_eq!(Preset::Classic.as_str(), "classic");
    }
}
