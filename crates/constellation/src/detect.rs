//! OS light/dark preference for `--theme auto`.
//!
//! Detection goes through a swappable detector so tests can pin the answer:
//!
//! ```rust
//! use constellation::detect::{detect_theme, set_theme_detector};
//! use constellation_core::ThemeMode;
//!
//! set_theme_detector(|| Some(ThemeMode::Dark));
//! assert_eq!(detect_theme(), Some(ThemeMode::Dark));
//! ```

use std::sync::{Mutex, PoisonError};

use constellation_core::ThemeMode;
use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

type ThemeDetector = fn() -> Option<ThemeMode>;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Replaces the detector behind [`detect_theme`].
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores OS detection.
pub fn reset_theme_detector() {
    set_theme_detector(os_theme_detector);
}

/// The OS theme preference, or `None` when the OS does not express one.
pub fn detect_theme() -> Option<ThemeMode> {
    let detector = THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    (*detector)()
}

fn os_theme_detector() -> Option<ThemeMode> {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => Some(ThemeMode::Dark),
        Ok(OsThemeMode::Light) => Some(ThemeMode::Light),
        Ok(OsThemeMode::Unspecified) => None,
        Err(err) => {
            log::debug!("could not read the OS theme: {}", err);
            None
        }
    }
}
