//! Constellation - derived color formats for HEX colors in CSS.
//!
//! Every HEX color declaration in a stylesheet is the single source of truth.
//! Constellation derives its companions (RGB, HSL, HWB, Lab, OKLCH,
//! Display-P3, hover/active shades and a contrast color) and writes them into
//! a marked block right after the declaration:
//!
//! ```css
//! :root {
//!   --bg: #1A1A1A;
//!   /* @constellation #1a1a1a theme=dark formats=rgb,hsl,hwb,lab,oklch,p3,hover,active,contrast */
//!   --bg-rgb: rgb(26, 26, 26);
//!   --bg-hsl: hsl(0, 0%, 10%);
//!   ...
//!   /* @end-constellation */
//! }
//! ```
//!
//! Running the transform again leaves current blocks alone. Editing the HEX
//! makes its block stale and the next pass regenerates it. Everything outside
//! generated blocks is copied byte for byte.
//!
//! # Quick Start
//!
//! ```rust
//! use constellation_core::{transform, ColorFormat, ThemeMode, TransformOptions};
//!
//! let options = TransformOptions::default()
//!     .with_theme(ThemeMode::Dark)
//!     .with_formats(vec![ColorFormat::Rgb, ColorFormat::Hsl]);
//!
//! let result = transform(":root {\n  --bg: #1A1A1A;\n}\n", &options).unwrap();
//! assert_eq!(
//!     result.text,
//!     ":root {\n  --bg: #1A1A1A;\
//!      \n  /* @constellation #1a1a1a theme=dark formats=rgb,hsl */\
//!      \n  --bg-rgb: rgb(26, 26, 26);\
//!      \n  --bg-hsl: hsl(0, 0%, 10%);\
//!      \n  /* @end-constellation */\n}\n"
//! );
//! ```
//!
//! # Pipeline
//!
//! | Stage | Module | Role |
//! |-------|--------|------|
//! | Locate | [`locate`] | find HEX declarations and their generated blocks |
//! | Decide | [`policy`] | skip, generate or regenerate; resolve the theme |
//! | Derive | [`color`] | render each format from the HEX value |
//! | Rewrite | [`rewrite`] | splice blocks into the original text |
//!
//! # Themes
//!
//! `hover` and `active` depend on whether the color sits on a light or dark
//! surface. The theme comes from, in order: the color's existing marker
//! (unless forced), its luminance when clearly on one side of the threshold,
//! and finally [`TransformOptions::theme`].

pub mod color;
pub mod colorspace;
mod error;
pub mod locate;
pub mod marker;
pub mod policy;
pub mod rewrite;
mod transform;

pub use color::{ColorFormat, ColorValue, DerivedFormatSet, ThemeMode};
pub use error::{Result, TransformError};
pub use locate::{locate, ColorDeclaration, GeneratedBlock, Located};
pub use marker::Marker;
pub use policy::{decide, Action, Decision, ThemeChain, ThemeResolver, ThemeSource};
pub use transform::{transform, ColorReport, TransformOptions, TransformResult};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
