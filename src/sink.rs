//! Style sinks: where resolved colors end up
//!
//! The engine only knows the `StyleSink` trait. The bundled implementation
//! merges colors into VS Code's user `settings.json` under
//! `workbench.colorCustomizations`, leaving every other setting alone.

use crate::resolver::ColorMap;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Applies a color map at global scope. Calls may block on I/O; the engine
/// runs them off the event loop.
pub trait StyleSink: Send + Sync {
    /// Write (merge) the given colors
    fn apply(&self, colors: &ColorMap) -> Result<()>;

    /// Remove the given keys, leaving anything else in place
    fn reset(&self, keys: &[&str]) -> Result<()>;
}

/// Settings key holding per-key color overrides
pub const COLOR_CUSTOMIZATIONS: &str = "workbench.colorCustomizations";

/// VS Code user settings file
#[derive(Debug)]
pub struct VsCodeSettingsSink {
    path: PathBuf,
    /// Serializes writes; a timed-out write may still be running
    lock: Mutex<()>,
}

impl VsCodeSettingsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Platform location of the user settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("Code").join("User").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, edit and write back the settings object. Nothing is written when
    /// `edit` reports no change.
    fn update(&self, edit: impl FnOnce(&mut Map<String, Value>) -> bool) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("settings writer lock poisoned"))?;

        let mut settings = read_settings(&self.path)?;
        if !edit(&mut settings) {
            tracing::trace!("{} already up to date", self.path.display());
            return Ok(());
        }
        write_settings(&self.path, &settings)
    }
}

impl StyleSink for VsCodeSettingsSink {
    fn apply(&self, colors: &ColorMap) -> Result<()> {
        self.update(|settings| {
            let section = settings
                .entry(COLOR_CUSTOMIZATIONS)
                .or_insert_with(|| Value::Object(Map::new()));
            if !section.is_object() {
                tracing::warn!("{} is not an object, replacing it", COLOR_CUSTOMIZATIONS);
                *section = Value::Object(Map::new());
            }
            let Some(section) = section.as_object_mut() else {
                return false;
            };

            let mut changed = false;
            for (key, color) in colors {
                if section.get(key).and_then(Value::as_str) != Some(color.as_str()) {
                    section.insert(key.clone(), Value::String(color.clone()));
                    changed = true;
                }
            }
            changed
        })
        .with_context(|| format!("Failed to apply colors to {}", self.path.display()))
    }

    fn reset(&self, keys: &[&str]) -> Result<()> {
        self.update(|settings| {
            let Some(section) = settings
                .get_mut(COLOR_CUSTOMIZATIONS)
                .and_then(Value::as_object_mut)
            else {
                return false;
            };

            let before = section.len();
            for key in keys {
                section.remove(*key);
            }
            let changed = section.len() != before;

            if section.is_empty() {
                settings.remove(COLOR_CUSTOMIZATIONS);
                return true;
            }
            changed
        })
        .with_context(|| format!("Failed to reset colors in {}", self.path.display()))
    }
}

/// Load the settings object; a missing or blank file is an empty object
fn read_settings(path: &Path) -> Result<Map<String, Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    // Never rewrite a file we could only read by dropping its comments
    let value = match serde_json::from_str::<Value>(&content) {
        Ok(value) => value,
        Err(e) if is_jsonc(&content, &e) => bail!(
            "{} contains comments or trailing commas; point settings_path at a plain JSON file",
            path.display()
        ),
        Err(e) => {
            return Err(e).with_context(|| format!("{} is not valid JSON", path.display()))
        }
    };
    match value {
        Value::Object(settings) => Ok(settings),
        _ => bail!("{} does not contain a JSON object", path.display()),
    }
}

/// VS Code accepts JSON with comments and trailing commas; serde_json doesn't
fn is_jsonc(content: &str, error: &serde_json::Error) -> bool {
    error.to_string().contains("trailing comma")
        || content.lines().any(|line| {
            let line = line.trim_start();
            line.starts_with("//") || line.starts_with("/*")
        })
}

/// Write the settings object with VS Code's four-space indent, atomically
fn write_settings(path: &Path, settings: &Map<String, Value>) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    settings
        .serialize(&mut serializer)
        .context("Failed to encode settings")?;
    buf.push(b'\n');

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Temp file then rename, so the editor never sees a half-written file
    let temp = path.with_extension("json.suntint.tmp");
    std::fs::write(&temp, &buf).with_context(|| format!("Failed to write {}", temp.display()))?;
    std::fs::rename(&temp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
