// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults
// - arrange: Run one headless layout pass and print the window rectangles

use crate::config::{Config, VERSION};
use crate::layout::builder::{
    build_plan, Preset, DEBUG, INPUT, MESSAGES, STATUS, STATUS_LEFT, STATUS_RIGHT,
};
use crate::layout::{arrange, Arrangement, Dimensions, ScreenManager, ScreenMode};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

/// Panels the demo client registers
pub const DEMO_PANELS: [&str; 6] = [MESSAGES, INPUT, DEBUG, STATUS, STATUS_LEFT, STATUS_RIGHT];

/// panelbox - responsive panel layout for terminal chat
#[derive(Parser)]
#[command(name = "panelbox")]
#[command(version = VERSION)]
#[command(about = "Responsive panel layout for a terminal chat client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Print the window rectangles for a terminal size
    Arrange {
        #[arg(long)]
        width: i32,

        #[arg(long)]
        height: i32,

        /// Screen mode: normal, half, full
        #[arg(long, default_value = "normal")]
        mode: String,

        /// Treat this panel as focused (affects half/full modes)
        #[arg(long)]
        focus: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Handle CLI commands. Returns true if a command was handled (exit after).
pub fn handle_cli() -> bool {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else {
                // No flag provided, show help
                println!("Usage: panelbox config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            true
        }
        Some(Commands::Arrange {
            width,
            height,
            mode,
            focus,
            json,
        }) => {
            if let Err(e) = handle_arrange(width, height, &mode, focus.as_deref(), json) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
            true
        }
        None => false, // No subcommand, run the TUI
    }
}

fn load_or_exit() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = load_or_exit();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    match Config::reset() {
        Ok(path) => println!("Config reset to defaults: {}", path.display()),
        Err(e) => {
            eprintln!("Error writing config: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Output of a headless pass
#[derive(Debug, Serialize)]
pub struct ArrangeReport {
    pub width: i32,
    pub height: i32,
    pub mode: ScreenMode,
    pub preset: String,
    pub breakpoint: String,
    pub compact: bool,
    pub portrait: bool,
    pub narrow: bool,
    pub hidden: Vec<String>,
    pub windows: Arrangement,
}

/// Build and arrange the demo panel tree without a terminal
pub fn headless_arrange(
    config: &Config,
    width: i32,
    height: i32,
    mode: ScreenMode,
    focus: Option<&str>,
) -> ArrangeReport {
    let mut screen = ScreenManager::default();
    screen.set_dimensions(width, height);
    screen.set_mode(mode);
    screen.set_focused_window(focus);

    let preset = Preset::from_name(&config.preset);
    let registered: Vec<String> = DEMO_PANELS.iter().map(|p| p.to_string()).collect();
    let plan = build_plan(&config.layout, &screen, preset, &registered);
    let windows = arrange(&plan.root, Dimensions::from_size(width, height));

    ArrangeReport {
        width,
        height,
        mode,
        preset: preset.as_str().to_string(),
        breakpoint: plan.breakpoint.as_str().to_string(),
        compact: plan.compact,
        portrait: screen.is_portrait_mode(),
        narrow: screen.is_narrow_mode(),
        hidden: plan.hidden,
        windows,
    }
}

fn handle_arrange(
    width: i32,
    height: i32,
    mode: &str,
    focus: Option<&str>,
    json: bool,
) -> Result<()> {
    if width <= 0 || height <= 0 {
        bail!("terminal size must be positive, got {}x{}", width, height);
    }
    let Some(mode) = ScreenMode::from_str(mode) else {
        bail!("unknown screen mode '{}' (expected normal, half or full)", mode);
    };

    let config = Config::load().context("failed to load configuration")?;
    let report = headless_arrange(&config, width, height, mode, focus);

    if json {
        let out = serde_json::to_string_pretty(&report).context("failed to encode arrangement")?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "{}x{} mode={} preset={} breakpoint={}{}{}{}",
        report.width,
        report.height,
        report.mode.as_str(),
        report.preset,
        report.breakpoint,
        if report.compact { " compact" } else { "" },
        if report.portrait { " portrait" } else { "" },
        if report.narrow { " narrow" } else { "" }
    );
    for (name, d) in &report.windows {
        println!(
            "  {:<14} ({:>3},{:>3}) -> ({:>3},{:>3})  {}x{}",
            name,
            d.x0,
            d.y0,
            d.x1,
            d.y1,
            d.width(),
            d.height()
        );
    }
    if !report.hidden.is_empty() {
        println!("  hidden: {}", report.hidden.join(", "));
    }
    Ok(())
}
