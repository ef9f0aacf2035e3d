//! Derived format identifiers and their renderers.
//!
//! Each [`ColorFormat`] renders deterministically from a [`ColorValue`] and a
//! [`ThemeMode`]. Numbers are rounded to a fixed number of decimals and
//! trailing zeros are dropped, so repeated runs produce identical text.
//!
//! | Format | Example (`#1a1a1a`, dark) | Precision |
//! |--------|---------------------------|-----------|
//! | `rgb` | `rgb(26, 26, 26)` | integer channels, alpha 3 decimals |
//! | `hsl` | `hsl(0, 0%, 10%)` | whole degree / percent |
//! | `hwb` | `hwb(0 10% 90%)` | whole degree / percent |
//! | `lab` | `lab(9.26 0 0)` | 2 decimals |
//! | `oklch` | `oklch(21.78% 0 0)` | L 2, C 4, H 2 decimals |
//! | `p3` | `color(display-p3 0.102 0.102 0.102)` | 4 decimals |
//! | `hover` | lightened (dark) or darkened (light) hex | OKLCH ΔL 0.06 |
//! | `active` | lightened (dark) or darkened (light) hex | OKLCH ΔL 0.12 |
//! | `contrast` | `#ffffff` or `#000000` | best WCAG contrast |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::theme::{luminance, ThemeMode};
use super::value::ColorValue;
use crate::colorspace::{
    contrast_ratio, rgb_to_display_p3, rgb_to_hsl, rgb_to_hwb, rgb_to_lab, rgb_to_oklch,
    shift_lightness,
};

/// OKLCH lightness step for the `hover` format.
pub const HOVER_LIGHTNESS_STEP: f64 = 0.06;

/// OKLCH lightness step for the `active` format.
pub const ACTIVE_LIGHTNESS_STEP: f64 = 0.12;

/// A derived representation of a HEX color.
///
/// Variant order is the canonical order used in generated blocks and markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    Rgb,
    Hsl,
    Hwb,
    Lab,
    Oklch,
    P3,
    Hover,
    Active,
    Contrast,
}

impl ColorFormat {
    /// Every format, in canonical order.
    pub const ALL: [ColorFormat; 9] = [
        ColorFormat::Rgb,
        ColorFormat::Hsl,
        ColorFormat::Hwb,
        ColorFormat::Lab,
        ColorFormat::Oklch,
        ColorFormat::P3,
        ColorFormat::Hover,
        ColorFormat::Active,
        ColorFormat::Contrast,
    ];

    /// Identifier used in markers, config files and derived property names.
    pub fn id(self) -> &'static str {
        match self {
            ColorFormat::Rgb => "rgb",
            ColorFormat::Hsl => "hsl",
            ColorFormat::Hwb => "hwb",
            ColorFormat::Lab => "lab",
            ColorFormat::Oklch => "oklch",
            ColorFormat::P3 => "p3",
            ColorFormat::Hover => "hover",
            ColorFormat::Active => "active",
            ColorFormat::Contrast => "contrast",
        }
    }

    /// Whether the rendering depends on the resolved theme.
    pub fn is_theme_specific(self) -> bool {
        matches!(self, ColorFormat::Hover | ColorFormat::Active)
    }

    /// Whether the format is a wide-gamut form that may redeclare a standard
    /// property as a progressive enhancement.
    pub fn is_progressive(self) -> bool {
        matches!(self, ColorFormat::Oklch | ColorFormat::P3)
    }

    /// Renders this format for a color under the given theme.
    pub fn render(self, color: &ColorValue, theme: ThemeMode) -> String {
        match self {
            ColorFormat::Rgb => render_rgb(color),
            ColorFormat::Hsl => render_hsl(color),
            ColorFormat::Hwb => render_hwb(color),
            ColorFormat::Lab => render_lab(color),
            ColorFormat::Oklch => render_oklch(color),
            ColorFormat::P3 => render_p3(color),
            ColorFormat::Hover => render_shift(color, theme, HOVER_LIGHTNESS_STEP),
            ColorFormat::Active => render_shift(color, theme, ACTIVE_LIGHTNESS_STEP),
            ColorFormat::Contrast => render_contrast(color),
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ColorFormat::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = ColorFormat::ALL.iter().map(|f| f.id()).collect();
                format!("unknown color format '{}' (known: {})", s, known.join(", "))
            })
    }
}

/// Sorts and deduplicates a format list into canonical order.
pub fn normalize_formats(formats: &[ColorFormat]) -> Vec<ColorFormat> {
    let mut out = formats.to_vec();
    out.sort();
    out.dedup();
    out
}

/// Rendered derived formats for one color, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFormatSet {
    entries: Vec<(ColorFormat, String)>,
}

impl DerivedFormatSet {
    /// Computes the requested formats for a color.
    pub fn derive(color: &ColorValue, theme: ThemeMode, formats: &[ColorFormat]) -> Self {
        let entries = normalize_formats(formats)
            .into_iter()
            .map(|f| (f, f.render(color, theme)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, format: ColorFormat) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorFormat, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn formats(&self) -> Vec<ColorFormat> {
        self.entries.iter().map(|(f, _)| *f).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Number formatting ─────────────────────────────────────────────────────

/// Rounds to `decimals` places and trims trailing zeros. `-0` becomes `0`.
pub(crate) fn fmt_number(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    // Adding 0.0 turns -0.0 into 0.0
    let rounded = (value * factor).round() / factor + 0.0;
    let mut s = format!("{:.*}", decimals, rounded);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn alpha_suffix(color: &ColorValue) -> String {
    color
        .alpha()
        .map(|a| format!(" / {}", fmt_number(a, 3)))
        .unwrap_or_default()
}

/// Whole-degree hue where 360 wraps to 0.
fn whole_hue(h: f64) -> i64 {
    (h.round() as i64).rem_euclid(360)
}

fn percent(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

// ─── Renderers ─────────────────────────────────────────────────────────────

fn render_rgb(color: &ColorValue) -> String {
    let (r, g, b) = color.rgb();
    match color.alpha() {
        Some(a) => format!("rgba({}, {}, {}, {})", r, g, b, fmt_number(a, 3)),
        None => format!("rgb({}, {}, {})", r, g, b),
    }
}

fn render_hsl(color: &ColorValue) -> String {
    let hsl = rgb_to_hsl(color.as_rgb());
    let (h, s, l) = (whole_hue(hsl.h), percent(hsl.s), percent(hsl.l));
    match color.alpha() {
        Some(a) => format!("hsla({}, {}%, {}%, {})", h, s, l, fmt_number(a, 3)),
        None => format!("hsl({}, {}%, {}%)", h, s, l),
    }
}

fn render_hwb(color: &ColorValue) -> String {
    let hwb = rgb_to_hwb(color.as_rgb());
    format!(
        "hwb({} {}% {}%{})",
        whole_hue(hwb.h),
        percent(hwb.w),
        percent(hwb.b),
        alpha_suffix(color)
    )
}

fn render_lab(color: &ColorValue) -> String {
    let lab = rgb_to_lab(color.as_rgb());
    format!(
        "lab({} {} {}{})",
        fmt_number(lab.l, 2),
        fmt_number(lab.a, 2),
        fmt_number(lab.b, 2),
        alpha_suffix(color)
    )
}

fn render_oklch(color: &ColorValue) -> String {
    let lch = rgb_to_oklch(color.as_rgb());
    let chroma = fmt_number(lch.c, 4);
    let hue = if chroma == "0" {
        "0".to_string()
    } else {
        fmt_number(lch.h, 2)
    };
    format!(
        "oklch({}% {} {}{})",
        fmt_number(lch.l * 100.0, 2),
        chroma,
        hue,
        alpha_suffix(color)
    )
}

fn render_p3(color: &ColorValue) -> String {
    let [r, g, b] = rgb_to_display_p3(color.as_rgb());
    format!(
        "color(display-p3 {} {} {}{})",
        fmt_number(r, 4),
        fmt_number(g, 4),
        fmt_number(b, 4),
        alpha_suffix(color)
    )
}

fn render_shift(color: &ColorValue, theme: ThemeMode, step: f64) -> String {
    let delta = match theme {
        ThemeMode::Dark => step,
        ThemeMode::Light => -step,
    };
    color
        .with_rgb(shift_lightness(color.as_rgb(), delta))
        .to_hex()
}

fn render_contrast(color: &ColorValue) -> String {
    let y = luminance(color);
    if contrast_ratio(y, 0.0) >= contrast_ratio(y, 1.0) {
        "#000000".to_string()
    } else {
        "#ffffff".to_string()
    }
}
