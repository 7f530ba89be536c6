// Startup module - displays banner and module status
//
// Everything here goes to stderr: stdout carries the host protocol.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Module status for display
#[derive(Debug, PartialEq)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

/// Print the startup banner and module status
pub fn print_startup(config: &Config, headless: bool) {
    use colors::*;

    // Banner
    eprintln!();
    eprintln!("  {BOLD}{CYAN}suntint{RESET} {DIM}v{VERSION}{RESET}");
    eprintln!("  {DIM}Editor colors that follow the sun{RESET}");
    eprintln!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            eprintln!("  {DIM}Config:{RESET}   {GREEN}✓{RESET} {}", path.display());
        } else {
            eprintln!("  {DIM}Config:{RESET}   {DIM}(using defaults){RESET}");
        }
    }
    match config.settings_path() {
        Some(path) => eprintln!("  {DIM}Settings:{RESET} {}", path.display()),
        None => eprintln!("  {DIM}Settings:{RESET} {YELLOW}unknown location{RESET}"),
    }
    eprintln!();

    for module in get_module_status(config, headless) {
        print_module_status(&module);
    }
    eprintln!();

    eprintln!(
        "  {MAGENTA}▸{RESET} Location {BOLD}{:.4}, {:.4}{RESET}, pack {BOLD}{}{RESET}, every {}s",
        config.solar.latitude,
        config.solar.longitude,
        config.solar.style_pack.as_str(),
        config.solar.update_interval_secs
    );
    if !config.solar.enabled {
        eprintln!("  {YELLOW}▸{RESET} {YELLOW}Solar theme disabled{RESET} {DIM}(suntint toggle){RESET}");
    }
    eprintln!();
}

/// Status of each part of the daemon
pub fn get_module_status(config: &Config, headless: bool) -> Vec<ModuleStatus> {
    let mut modules = vec![
        ModuleStatus {
            name: "scheduler",
            enabled: config.solar.enabled,
            description: "Solar color updates",
        },
        ModuleStatus {
            name: "host",
            enabled: !headless,
            description: "Editor commands on stdin",
        },
        ModuleStatus {
            name: "notify",
            enabled: config.solar.show_notifications,
            description: "Phase change notifications",
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: "JSON log files",
        },
    ];

    // Only worth a line when there are any
    if !config.palettes.is_empty() {
        modules.push(ModuleStatus {
            name: "palettes",
            enabled: true,
            description: "Custom palette overrides",
        });
    }

    modules
}

/// Print a single module's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    eprintln!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}
