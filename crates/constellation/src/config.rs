//! Configuration file and flag merging.
//!
//! A YAML file may set any of the transform options:
//!
//! ```yaml
//! theme: dark        # light | dark | auto
//! force: false
//! formats: [rgb, hsl, oklch, hover]
//! ```
//!
//! The file is taken from `--config`, or from `constellation.yaml` next to the
//! input when present. Command-line flags override file values; `--no-force`
//! turns off a `force: true` set in the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use constellation_core::{ColorFormat, ThemeMode, TransformOptions};
use serde::{Deserialize, Serialize};

use crate::detect::detect_theme;

/// Name of the configuration file looked up next to the input.
pub const CONFIG_FILE_NAME: &str = "constellation.yaml";

/// Fallback theme as written in config or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    #[default]
    Light,
    Dark,
    /// Ask the OS; light when it has no preference.
    Auto,
}

impl ThemeSetting {
    pub fn resolve(self) -> ThemeMode {
        match self {
            ThemeSetting::Light => ThemeMode::Light,
            ThemeSetting::Dark => ThemeMode::Dark,
            ThemeSetting::Auto => {
                let detected = detect_theme();
                log::info!(
                    "OS theme preference: {}",
                    detected.map(|t| t.as_str()).unwrap_or("none, using light")
                );
                detected.unwrap_or(ThemeMode::Light)
            }
        }
    }
}

/// Contents of a configuration file. Absent keys defer to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub theme: Option<ThemeSetting>,
    pub force: Option<bool>,
    pub formats: Option<Vec<ColorFormat>>,
}

/// Options given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub theme: Option<ThemeSetting>,
    /// `Some(false)` comes from `--no-force`.
    pub force: Option<bool>,
    pub formats: Option<Vec<ColorFormat>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        if is_blank_document(&text) {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Loads `explicit` if given, else `constellation.yaml` beside `input`.
    pub fn locate(explicit: Option<&Path>, input: &Path) -> Result<Option<(PathBuf, Self)>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match discover(input) {
                Some(path) => path,
                None => return Ok(None),
            },
        };
        let config = Self::load(&path)?;
        log::info!("using config {}", path.display());
        Ok(Some((path, config)))
    }

    /// Applies command-line overrides and produces engine options.
    pub fn merge(self, flags: &Overrides) -> TransformOptions {
        let defaults = TransformOptions::default();
        let theme = flags.theme.or(self.theme).unwrap_or_default().resolve();
        TransformOptions {
            theme,
            force: flags.force.or(self.force).unwrap_or(defaults.force),
            formats: flags
                .formats
                .clone()
                .or(self.formats)
                .unwrap_or(defaults.formats),
        }
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn discover(input: &Path) -> Option<PathBuf> {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}
