//! Light/dark classification of a single color.
//!
//! A color is classified by its WCAG relative luminance `Y`:
//!
//! - `Y < DARK_LUMINANCE_THRESHOLD` → [`ThemeMode::Dark`]
//! - otherwise → [`ThemeMode::Light`]
//!
//! The threshold `0.179` is where a color has the same contrast ratio against
//! black as against white. Colors within [`AMBIGUITY_MARGIN`] of it, or with
//! alpha below [`MIN_DECISIVE_ALPHA`], are not decisive: callers fall back to
//! another signal for those (see [`crate::policy`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::ColorValue;
use crate::colorspace::relative_luminance;

/// Luminance below which a color is considered dark.
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.179;

/// Half-width of the band around the threshold where classification is not decisive.
pub const AMBIGUITY_MARGIN: f64 = 0.02;

/// Colors more transparent than this depend on their backdrop and are not decisive.
pub const MIN_DECISIVE_ALPHA: f64 = 0.5;

/// The theme a color is assumed to belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light surface (the color reads as light; enhancements darken it).
    #[default]
    Light,
    /// Dark surface (the color reads as dark; enhancements lighten it).
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!(
                "unknown theme '{}' (expected 'light' or 'dark')",
                other
            )),
        }
    }
}

/// Relative luminance of a parsed color (alpha ignored).
pub fn luminance(color: &ColorValue) -> f64 {
    relative_luminance(color.as_rgb())
}

/// Classifies a color as light or dark. Always answers.
pub fn classify_theme(color: &ColorValue) -> ThemeMode {
    if luminance(color) < DARK_LUMINANCE_THRESHOLD {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// Classifies a color only when the answer is clear-cut.
///
/// Returns `None` for colors near the threshold and for mostly transparent
/// colors.
pub fn classify_decisive(color: &ColorValue) -> Option<ThemeMode> {
    if color.alpha().is_some_and(|a| a < MIN_DECISIVE_ALPHA) {
        return None;
    }
    if (luminance(color) - DARK_LUMINANCE_THRESHOLD).abs() < AMBIGUITY_MARGIN {
        return None;
    }
    Some(classify_theme(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> ColorValue {
        ColorValue::parse_hex(s).unwrap()
    }

    #[test]
    fn test_classify_extremes() {
        assert_eq!(classify_theme(&hex("#ffffff")), ThemeMode::Light);
        assert_eq!(classify_theme(&hex("#000000")), ThemeMode::Dark);
        assert_eq!(classify_theme(&hex("#1a1a1a")), ThemeMode::Dark);
    }

    #[test]
    fn test_classify_threshold_boundary() {
        // #757575 sits just below 0.179, #767676 just above
        let below = hex("#757575");
        let above = hex("#767676");
        assert!(luminance(&below) < DARK_LUMINANCE_THRESHOLD);
        assert!(luminance(&above) >= DARK_LUMINANCE_THRESHOLD);
        assert_eq!(classify_theme(&below), ThemeMode::Dark);
        assert_eq!(classify_theme(&above), ThemeMode::Light);
    }

    #[test]
    fn test_decisive_outside_margin() {
        assert_eq!(classify_decisive(&hex("#444444")), Some(ThemeMode::Dark));
        assert_eq!(classify_decisive(&hex("#aaaaaa")), Some(ThemeMode::Light));
        assert_eq!(classify_decisive(&hex("#ffffff")), Some(ThemeMode::Light));
    }

    #[test]
    fn test_not_decisive_near_threshold() {
        assert_eq!(classify_decisive(&hex("#757575")), None);
        assert_eq!(classify_decisive(&hex("#767676")), None);
    }

    #[test]
    fn test_not_decisive_when_mostly_transparent() {
        assert_eq!(classify_decisive(&hex("#00000020")), None);
        assert_eq!(classify_decisive(&hex("#000000ff")), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_theme_mode_from_str() {
        assert_eq!("dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(" Light ".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert!("dim".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_theme_mode_serde() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        let parsed: ThemeMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(parsed, ThemeMode::Light);
    }
}
