//! Marker comments that delimit generated blocks.
//!
//! Every generated block is wrapped in two CSS comments:
//!
//! ```css
//! /* @constellation #1a1a1a theme=dark formats=rgb,hsl */
//! --bg-rgb: rgb(26, 26, 26);
//! --bg-hsl: hsl(0, 0%, 10%);
//! /* @end-constellation */
//! ```
//!
//! The opening marker records the normalized HEX the block was derived from,
//! the theme used for theme-specific formats, and the format identifiers in
//! canonical order. The next pass compares these against the current
//! declaration to decide whether the block is stale.
//!
//! Grammar of the comment bodies (surrounding whitespace ignored):
//!
//! ```text
//! opening := "@constellation" WS hex WS "theme=" ("light" | "dark") WS "formats=" id ("," id)*
//! closing := "@end-constellation"
//! ```
//!
//! An opening comment that starts with `@constellation` but does not match the
//! rest of the grammar still opens a block; its [`Marker`] is unreadable and the
//! block is treated as stale.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::{normalize_formats, ColorFormat, ThemeMode};

/// Keyword that starts an opening marker comment.
pub const OPEN_KEYWORD: &str = "@constellation";

/// Body of the closing marker comment.
pub const CLOSE_KEYWORD: &str = "@end-constellation";

static OPEN_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^@constellation\s+(#[0-9a-fA-F]+)\s+theme=([A-Za-z]+)\s+formats=([A-Za-z0-9]+(?:,[A-Za-z0-9]+)*)$",
    )
    .expect("marker pattern is valid")
});

/// Parsed content of an opening marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Normalized HEX (`#rrggbb` / `#rrggbbaa`) the block was derived from.
    pub hex: String,
    /// Theme the block was rendered for.
    pub theme: ThemeMode,
    /// Formats present in the block, in canonical order.
    pub formats: Vec<ColorFormat>,
}

impl Marker {
    pub fn new(hex: impl Into<String>, theme: ThemeMode, formats: &[ColorFormat]) -> Self {
        Self {
            hex: hex.into(),
            theme,
            formats: normalize_formats(formats),
        }
    }

    /// Renders the full opening comment, `/* ... */` included.
    pub fn render_open(&self) -> String {
        let ids: Vec<&str> = self.formats.iter().map(|f| f.id()).collect();
        format!(
            "/* {} {} theme={} formats={} */",
            OPEN_KEYWORD,
            self.hex,
            self.theme,
            ids.join(",")
        )
    }

    fn parse_body(body: &str) -> Option<Self> {
        let caps = OPEN_MARKER.captures(body)?;
        let hex = caps[1].to_ascii_lowercase();
        if !matches!(hex.len(), 7 | 9) {
            return None;
        }
        let theme = caps[2].parse::<ThemeMode>().ok()?;
        let formats = caps[3]
            .split(',')
            .map(|id| id.parse::<ColorFormat>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            hex,
            theme,
            formats: normalize_formats(&formats),
        })
    }
}

/// Renders the closing comment, `/* ... */` included.
pub fn render_close() -> String {
    format!("/* {} */", CLOSE_KEYWORD)
}

/// What a comment body means to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerComment {
    /// Opens a generated block; `None` when the marker is unreadable.
    Open(Option<Marker>),
    /// Closes a generated block.
    Close,
}

/// Classifies a comment body (the text between `/*` and `*/`).
///
/// Returns `None` for ordinary author comments.
pub fn classify_comment(body: &str) -> Option<MarkerComment> {
    let body = body.trim();
    if body == CLOSE_KEYWORD {
        return Some(MarkerComment::Close);
    }
    let rest = body.strip_prefix(OPEN_KEYWORD)?;
    // "@constellation-foo" is an author comment, not a marker
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    Some(MarkerComment::Open(Marker::parse_body(body)))
}
