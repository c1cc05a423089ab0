//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        let layout = &self.layout;
        let logging = &self.logging;
        format!(
            r#"# panelbox configuration

# Layout preset: classic (messages | debug side by side), stacked (always rows)
preset = "{preset}"

# Panel order for Tab cycling; hidden panels are skipped
navigation_order = {order:?}

# Panel sizing and visibility (read on every layout pass)
[layout]
messages_weight = {messages_weight}
debug_weight = {debug_weight}
input_height = {input_height}
compact_input_height = {compact_input_height}
status_height = {status_height}
show_sidebar = {show_sidebar}
compact_mode = {compact_mode}
min_panel_width = {min_panel_width}
min_panel_height = {min_panel_height}
border_style = "{border_style}"  # single, double, rounded, thick, none
focus_style = "{focus_style}"  # border, background, both, none
spacing = {spacing}
# Size panels from the breakpoint ratio table instead of the weights above
adaptive_weights = {adaptive_weights}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to the debug panel)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            preset = self.preset,
            order = self.navigation_order,
            messages_weight = layout.messages_weight,
            debug_weight = layout.debug_weight,
            input_height = layout.input_height,
            compact_input_height = layout.compact_input_height,
            status_height = layout.status_height,
            show_sidebar = layout.show_sidebar,
            compact_mode = layout.compact_mode,
            min_panel_width = layout.min_panel_width,
            min_panel_height = layout.min_panel_height,
            border_style = layout.border_style.as_str(),
            focus_style = layout.focus_style.as_str(),
            spacing = layout.spacing,
            adaptive_weights = layout.adaptive_weights,
            log_level = logging.level,
            log_file_enabled = logging.file_enabled,
            log_file_dir = logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = logging.file_rotation.as_str(),
            log_file_prefix = logging.file_prefix,
        )
    }
}
