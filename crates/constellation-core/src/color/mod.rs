//! The color model: canonical HEX values, derived formats, theme classification.
//!
//! - [`ColorValue`]: the parsed HEX literal, the single source of truth
//! - [`ColorFormat`] / [`DerivedFormatSet`]: rendered companions of a color
//! - [`ThemeMode`], [`classify_theme`], [`classify_decisive`]: light/dark
//!   classification by relative luminance
//!
//! ```rust
//! use constellation_core::color::{classify_theme, ColorFormat, ColorValue, DerivedFormatSet, ThemeMode};
//!
//! let bg = ColorValue::parse_hex("#1A1A1A").unwrap();
//! let theme = classify_theme(&bg);
//! assert_eq!(theme, ThemeMode::Dark);
//!
//! let derived = DerivedFormatSet::derive(&bg, theme, &[ColorFormat::Rgb, ColorFormat::Hsl]);
//! assert_eq!(derived.get(ColorFormat::Rgb), Some("rgb(26, 26, 26)"));
//! assert_eq!(derived.get(ColorFormat::Hsl), Some("hsl(0, 0%, 10%)"));
//! ```

mod format;
mod theme;
mod value;

pub use format::{
    normalize_formats, ColorFormat, DerivedFormatSet, ACTIVE_LIGHTNESS_STEP, HOVER_LIGHTNESS_STEP,
};
pub use theme::{
    classify_decisive, classify_theme, luminance, ThemeMode, AMBIGUITY_MARGIN,
    DARK_LUMINANCE_THRESHOLD, MIN_DECISIVE_ALPHA,
};
pub use value::ColorValue;
