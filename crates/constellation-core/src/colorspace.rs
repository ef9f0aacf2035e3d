//! Colorspace math behind every derived format.
//!
//! All conversions start from 8-bit sRGB channels and go through linear light.
//! Nothing here knows about CSS text; [`crate::color`] turns these numbers into
//! the strings written to the stylesheet.
//!
//! | Space | Used for | Reference white |
//! |-------|----------|-----------------|
//! | HSL / HWB | `hsl()`, `hwb()` | n/a (cylindrical sRGB) |
//! | CIE Lab | `lab()` | D50, as CSS Color 4 defines it |
//! | OKLab / OKLCH | `oklch()`, hover/active shifts | D65 |
//! | Display-P3 | `color(display-p3 ...)` | D65 |
//!
//! Relative luminance follows WCAG 2 (Rec. 709 coefficients on linear sRGB).
//!
//! ```rust
//! use constellation_core::colorspace::{relative_luminance, Rgb};
//!
//! assert_eq!(relative_luminance(Rgb(0, 0, 0)), 0.0);
//! assert!((relative_luminance(Rgb(255, 255, 255)) - 1.0).abs() < 1e-9);
//! ```

// ─── RGB type ───────────────────────────────────────────────────────────────

/// A simple RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn linear(self) -> [f64; 3] {
        [
            srgb_to_linear(self.0),
            srgb_to_linear(self.1),
            srgb_to_linear(self.2),
        ]
    }

    fn unit(self) -> [f64; 3] {
        [
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0,
        ]
    }
}

// ─── Transfer functions ────────────────────────────────────────────────────

/// Convert an sRGB component (0–255) to linear light (0.0–1.0).
pub fn srgb_to_linear(c: u8) -> f64 {
    decode_gamma(c as f64 / 255.0)
}

/// Convert a linear light value to sRGB (0–255), clamped.
pub fn linear_to_srgb(c: f64) -> u8 {
    (encode_gamma(c.clamp(0.0, 1.0)) * 255.0).round() as u8
}

fn decode_gamma(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn encode_gamma(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

// ─── Luminance ─────────────────────────────────────────────────────────────

/// WCAG 2 relative luminance of an sRGB color, in `0.0..=1.0`.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let [r, g, b] = rgb.linear();
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// WCAG 2 contrast ratio between two luminances, in `1.0..=21.0`.
pub fn contrast_ratio(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    (hi + 0.05) / (lo + 0.05)
}

// ─── HSL / HWB ─────────────────────────────────────────────────────────────

/// Hue (degrees, `0.0..360.0`), saturation and lightness (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Hue (degrees), whiteness and blackness (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hwb {
    pub h: f64,
    pub w: f64,
    pub b: f64,
}

/// Hue in degrees shared by HSL and HWB. Achromatic colors get `0.0`.
fn hue_degrees(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    h * 60.0
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let [r, g, b] = rgb.unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h: hue_degrees(r, g, b, max, delta),
        s,
        l,
    }
}

pub fn rgb_to_hwb(rgb: Rgb) -> Hwb {
    let [r, g, b] = rgb.unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    Hwb {
        h: hue_degrees(r, g, b, max, max - min),
        w: min,
        b: 1.0 - max,
    }
}

// ─── CIE Lab (D50) ─────────────────────────────────────────────────────────

/// CIE Lab color relative to the D50 white point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// D50 reference white point for CIE XYZ → Lab conversion.
const XN: f64 = 0.96422;
const YN: f64 = 1.00000;
const ZN: f64 = 0.82521;

const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;

/// Lab forward transform helper.
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

/// Convert an [`Rgb`] value to CIE Lab via XYZ, chromatically adapted to D50.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let [r, g, b] = rgb.linear();

    // Linear sRGB → XYZ (D50, Bradford-adapted)
    let x = 0.4360747 * r + 0.3850649 * g + 0.1430804 * b;
    let y = 0.2225045 * r + 0.7168786 * g + 0.0606169 * b;
    let z = 0.0139322 * r + 0.0971045 * g + 0.7141733 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

// ─── OKLab / OKLCH ─────────────────────────────────────────────────────────

/// OKLab color (D65).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// OKLab in cylindrical form: lightness, chroma, hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

pub fn rgb_to_oklab(rgb: Rgb) -> Oklab {
    let [r, g, b] = rgb.linear();

    let l = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
    let m = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
    let s = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

    Oklab {
        l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    }
}

/// Convert OKLab back to sRGB, clamping out-of-gamut channels.
pub fn oklab_to_rgb(lab: Oklab) -> Rgb {
    let l = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
    let m = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
    let s = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

    let (l, m, s) = (l * l * l, m * m * m, s * s * s);

    let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
    let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
    let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

    Rgb(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

impl Oklab {
    pub fn to_lch(self) -> Oklch {
        let c = self.a.hypot(self.b);
        let h = self.b.atan2(self.a).to_degrees().rem_euclid(360.0);
        Oklch { l: self.l, c, h }
    }
}

impl Oklch {
    pub fn to_lab(self) -> Oklab {
        let rad = self.h.to_radians();
        Oklab {
            l: self.l,
            a: self.c * rad.cos(),
            b: self.c * rad.sin(),
        }
    }
}

pub fn rgb_to_oklch(rgb: Rgb) -> Oklch {
    rgb_to_oklab(rgb).to_lch()
}

/// Shift a color's OKLCH lightness by `delta`, keeping chroma and hue.
///
/// Lightness is clamped to `0.0..=1.0`; the result is clamped into sRGB.
pub fn shift_lightness(rgb: Rgb, delta: f64) -> Rgb {
    let mut lch = rgb_to_oklch(rgb);
    lch.l = (lch.l + delta).clamp(0.0, 1.0);
    oklab_to_rgb(lch.to_lab())
}

// ─── Display-P3 ────────────────────────────────────────────────────────────

/// Convert sRGB to gamma-encoded Display-P3 channels (`0.0..=1.0`).
///
/// sRGB is a subset of P3, so clamping only absorbs floating-point drift.
pub fn rgb_to_display_p3(rgb: Rgb) -> [f64; 3] {
    let [r, g, b] = rgb.linear();

    // Linear sRGB → linear Display-P3 (both D65)
    let pr = 0.8224621 * r + 0.1775380 * g;
    let pg = 0.0331941 * r + 0.9668058 * g;
    let pb = 0.0170827 * r + 0.0723974 * g + 0.9105199 * b;

    [
        encode_gamma(pr.clamp(0.0, 1.0)),
        encode_gamma(pg.clamp(0.0, 1.0)),
        encode_gamma(pb.clamp(0.0, 1.0)),
    ]
}

// ─── Tests ──────────────────────────────────────────────────────────────────
