// suntint - editor colors that follow the sun
//
// Computes where "now" falls between local sunrise and sunset, blends the
// matching palettes and writes the result into the editor's color settings.
//
// Architecture:
// - Solar + resolver: solar time and palette interpolation (pure)
// - Scheduler + preview: when to write, and when not to
// - Engine: single-task event loop owning all state
// - Sink: writes colors into VS Code settings.json
// - Host: JSON lines on stdin/stdout for the editor-side shim
// - Geo: one-time IP geolocation on first run

mod cli;
mod color;
mod config;
mod engine;
mod geo;
mod host;
mod logging;
mod palette;
mod preview;
mod resolver;
mod scheduler;
mod sink;
mod solar;
mod startup;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, FileConfigStore};
use engine::{Engine, EngineParts, PreviewOutcome, UpdateOutcome};
use geo::GeoLocator;
use host::{ConsoleSurface, HostCommand, HostSurface, JsonLinesSurface};
use sink::VsCodeSettingsSink;
use solar::SuncalcProvider;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Buffered host commands before the reader waits on the engine
const COMMAND_BUFFER: usize = 64;

/// Assemble an engine around the real adapters
fn build_engine(config: &Config, surface: Box<dyn HostSurface>) -> Result<Engine> {
    let settings = config
        .settings_path()
        .context("Could not locate VS Code settings.json; set settings_path in the config")?;
    let sink = VsCodeSettingsSink::new(settings);
    tracing::debug!("Writing colors to {}", sink.path().display());

    Ok(Engine::new(EngineParts {
        store: Box::new(FileConfigStore::at_default_location()),
        sink: Arc::new(sink),
        surface,
        sun: Box::new(SuncalcProvider),
        clock: Box::new(chrono::Local::now),
    }))
}

/// First-run location lookup
async fn locate(engine: &mut Engine, force: bool) {
    match GeoLocator::new(engine.config().geolocation_url.clone()) {
        Ok(locator) => {
            engine.locate(&locator, force).await;
        }
        Err(e) => tracing::warn!("Location lookup unavailable: {}", e),
    }
}

async fn run_daemon(config: &Config, headless: bool) -> Result<()> {
    startup::print_startup(config, headless);

    let surface: Box<dyn HostSurface> = if headless {
        Box::new(ConsoleSurface)
    } else {
        Box::new(JsonLinesSurface)
    };
    let mut engine = build_engine(config, surface)?;

    if !config.location_initialized {
        locate(&mut engine, false).await;
    }

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let mut engine = engine.with_commands(rx);

    if !headless {
        host::spawn_stdin_reader(tx.clone()).context("Failed to start host input reader")?;
    }

    let shutdown = tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            let _ = shutdown.send(HostCommand::Shutdown).await;
        }
    });

    engine.run().await
}

async fn run_once(config: &Config, command: Commands) -> Result<()> {
    let mut engine = build_engine(config, Box::new(ConsoleSurface))?;

    match command {
        Commands::Update => {
            if !engine.config().location_initialized {
                locate(&mut engine, false).await;
            }
            match engine.update(true).await {
                UpdateOutcome::Failed => bail!("Could not write editor colors"),
                UpdateOutcome::Disabled => {
                    println!("Solar theme is disabled (suntint toggle to enable)")
                }
                _ => {}
            }
        }
        Commands::SunTimes => {
            engine.show_sun_times();
        }
        Commands::Toggle => {
            engine.toggle_enabled().await?;
        }
        Commands::ResetColors => {
            engine.reset_colors().await?;
        }
        Commands::Preview {
            bg,
            fg,
            accent,
            phase,
        } => {
            let request = Commands::preview_request(&bg, &fg, &accent, phase.as_deref());
            match engine.apply_preview(request).await {
                PreviewOutcome::Applied | PreviewOutcome::Dropped => {
                    println!("Preview written; the next update restores solar colors")
                }
                PreviewOutcome::Rejected => bail!("Preview needs --bg, --fg and --accent"),
                PreviewOutcome::Failed => bail!("Could not write preview colors"),
            }
        }
        Commands::Locate => {
            locate(&mut engine, true).await;
            let solar = &engine.config().solar;
            println!("Location: {:.4}, {:.4}", solar.latitude, solar.longitude);
        }
        // Dispatched in main
        Commands::Run { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management never touches logging or the editor
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        update,
        path,
    }) = cli.command
    {
        cli::handle_config(show, reset, edit, update, path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Reports a broken file on stderr and falls back to defaults
    let config = Config::from_env();

    // Keep alive so file logs flush
    let _log_guard = logging::init(&config.logging);

    match cli.command {
        None => run_daemon(&config, false).await,
        Some(Commands::Run { headless }) => run_daemon(&config, headless).await,
        Some(command) => run_once(&config, command).await,
    }
}
