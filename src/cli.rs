// CLI module - command-line argument parsing and handlers
//
// Without a subcommand (or with `run`) the daemon starts. The other
// subcommands run once against the same engine and exit:
// - update / sun-times / toggle / reset-colors / preview / locate
// - config --show|--reset|--edit|--update|--path: manage the config file

use crate::config::{Config, CONFIG_PATH_ENV, VERSION};
use crate::preview::{PreviewColors, PreviewRequest};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// Editor for `config --edit` when neither $VISUAL nor $EDITOR is set
const DEFAULT_EDITOR: &str = "code --wait";

/// suntint - editor colors that follow the sun
#[derive(Parser, Debug)]
#[command(name = "suntint")]
#[command(version = VERSION)]
#[command(about = "Editor colors that follow the sun", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the daemon (default)
    Run {
        /// No host process: ignore stdin, print events as plain text
        #[arg(long)]
        headless: bool,
    },

    /// Write the current solar colors once
    Update,

    /// Show today's sunrise, sunset and current phase
    SunTimes,

    /// Turn the solar theme on or off
    Toggle,

    /// Remove all colors written by suntint and disable the theme
    ResetColors,

    /// Write preview colors (they stay until the next update)
    Preview {
        /// Editor background, #rrggbb
        #[arg(long)]
        bg: String,

        /// Editor foreground, #rrggbb
        #[arg(long)]
        fg: String,

        /// Accent color, #rrggbb
        #[arg(long)]
        accent: String,

        /// Phase to preview against (e.g. dawn, golden_hour)
        #[arg(long)]
        phase: Option<String>,
    },

    /// Detect location from IP address and save it
    Locate,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $VISUAL, $EDITOR or VS Code
        #[arg(long)]
        edit: bool,

        /// Update config with new defaults (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

impl Commands {
    /// Preview request for `suntint preview`
    pub fn preview_request(
        bg: &str,
        fg: &str,
        accent: &str,
        phase: Option<&str>,
    ) -> PreviewRequest {
        PreviewRequest {
            phase: phase.map(str::to_string),
            colors: PreviewColors {
                bg: Some(bg.to_string()),
                fg: Some(fg.to_string()),
                accent: Some(accent.to_string()),
            },
        }
    }
}

/// Handle `config` flags
pub fn handle_config(show: bool, reset: bool, edit: bool, update: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else if update {
        handle_config_update();
    } else {
        // No flag provided, show help
        println!("Usage: suntint config [--show|--reset|--edit|--update|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $VISUAL, $EDITOR or VS Code");
        println!("  --update  Update config with new defaults (preserves user values)");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: No home directory; set {} to choose a config file", CONFIG_PATH_ENV);
        std::process::exit(1);
    };
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(not created yet; `suntint config --reset` writes the defaults)");
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("location_initialized = {}", config.location_initialized);
    match config.settings_path() {
        Some(path) => println!("settings_path = {:?}", path.display().to_string()),
        None => println!("settings_path = (unknown)"),
    }
    println!("geolocation_url = {:?}", config.geolocation_url);
    println!();
    println!("[solar]");
    println!("enabled = {}", config.solar.enabled);
    println!("latitude = {}", config.solar.latitude);
    println!("longitude = {}", config.solar.longitude);
    println!(
        "update_interval_secs = {}",
        config.solar.update_interval_secs
    );
    println!("show_notifications = {}", config.solar.show_notifications);
    println!("intensity = {}", config.solar.intensity);
    println!("style_pack = {:?}", config.solar.style_pack.as_str());
    println!();
    println!("[preview]");
    println!("cooldown_ms = {}", config.preview.cooldown_ms);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    if !config.palettes.is_empty() {
        println!();
        println!(
            "# Palette overrides: {}",
            config
                .palettes
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

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
        eprintln!("Error: No home directory; set {} to choose a config file", CONFIG_PATH_ENV);
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
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    // Atomic write of the defaults (Config's single source of truth)
    if let Err(e) = Config::default().save_to(&path) {
        eprintln!("Error writing config: {:#}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: No home directory; set {} to choose a config file", CONFIG_PATH_ENV);
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = editor_command(
        std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .ok(),
    );
    let Some((program, args)) = editor.split_first() else {
        return;
    };

    println!("Opening {} with {}", path.display(), editor.join(" "));

    // The running daemon picks up the saved file on its own
    match Command::new(program).args(args).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("{} exited with status: {}", program, s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch '{}': {}", program, e);
            eprintln!(
                "Set $VISUAL or $EDITOR, or open `suntint config --path` yourself"
            );
            std::process::exit(1);
        }
    }
}

/// `$VISUAL`/`$EDITOR` split into program and arguments, VS Code when unset
fn editor_command(configured: Option<String>) -> Vec<String> {
    configured
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn handle_config_update() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: No home directory; set {} to choose a config file", CONFIG_PATH_ENV);
        std::process::exit(1);
    };

    if !path.exists() {
        // No existing config, just create default
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    // Read the file without env overrides so they don't get baked in
    let existing = match Config::load(Some(&path), |_| None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading config: {:#}", e);
            eprintln!("Fix the file or run `suntint config --reset`");
            std::process::exit(1);
        }
    };

    // Backup existing
    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = existing.save_to(&path) {
        eprintln!("Error writing config: {:#}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Commands> {
        Cli::try_parse_from(args).expect("valid arguments").command
    }

    #[test]
    fn test_no_subcommand_runs_daemon() {
        assert_eq!(parse(&["suntint"]), None);
        assert_eq!(
            parse(&["suntint", "run", "--headless"]),
            Some(Commands::Run { headless: true })
        );
    }

    #[test]
    fn test_one_shot_commands() {
        assert_eq!(parse(&["suntint", "sun-times"]), Some(Commands::SunTimes));
        assert_eq!(
            parse(&["suntint", "reset-colors"]),
            Some(Commands::ResetColors)
        );
        assert_eq!(parse(&["suntint", "toggle"]), Some(Commands::Toggle));
    }

    #[test]
    fn test_preview_arguments() {
        let command = parse(&[
            "suntint", "preview", "--bg", "#101010", "--fg", "#f0f0f0", "--accent", "#ff8800",
            "--phase", "dusk",
        ]);
        let Some(Commands::Preview {
            bg,
            fg,
            accent,
            phase,
        }) = command
        else {
            panic!("expected preview");
        };
        let request = Commands::preview_request(&bg, &fg, &accent, phase.as_deref());
        assert_eq!(request.phase.as_deref(), Some("dusk"));
        assert_eq!(request.colors.bg.as_deref(), Some("#101010"));
    }

    #[test]
    fn test_preview_requires_colors() {
        assert!(Cli::try_parse_from(["suntint", "preview", "--bg", "#101010"]).is_err());
    }

    #[test]
    fn test_editor_command() {
        assert_eq!(editor_command(None), vec!["code", "--wait"]);
        assert_eq!(editor_command(Some("  ".to_string())), vec!["code", "--wait"]);
        assert_eq!(
            editor_command(Some("nvim -u NONE".to_string())),
            vec!["nvim", "-u", "NONE"]
        );
    }

    #[test]
    fn test_config_flags() {
        assert_eq!(
            parse(&["suntint", "config", "--path"]),
            Some(Commands::Config {
                show: false,
                reset: false,
                edit: false,
                update: false,
                path: true,
            })
        );
    }
}
