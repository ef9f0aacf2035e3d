//! The transformation pass: locate, decide, rewrite.

use serde::{Deserialize, Serialize};

use crate::color::{ColorFormat, ThemeMode};
use crate::error::Result;
use crate::locate::locate;
use crate::policy::{decide, Action, ThemeSource};
use crate::rewrite::{apply_edits, line_ending, plan_edit};

/// Caller-supplied options for one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformOptions {
    /// Theme used when neither a marker nor luminance decides.
    pub theme: ThemeMode,
    /// Regenerate every block, ignoring marker themes.
    pub force: bool,
    /// Formats to derive.
    pub formats: Vec<ColorFormat>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            force: false,
            formats: ColorFormat::ALL.to_vec(),
        }
    }
}

impl TransformOptions {
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_formats(mut self, formats: Vec<ColorFormat>) -> Self {
        self.formats = formats;
        self
    }
}

/// What happened to one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorReport {
    pub property: String,
    /// Normalized HEX.
    pub hex: String,
    pub line: usize,
    pub action: Action,
    pub theme: ThemeMode,
    pub theme_source: ThemeSource,
}

/// Output of [`transform`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    /// The rewritten stylesheet.
    #[serde(skip)]
    pub text: String,
    /// Colors whose block was generated or regenerated.
    pub changed: usize,
    /// Colors left as they were.
    pub unchanged: usize,
    pub colors: Vec<ColorReport>,
    /// Generated blocks that follow no color declaration.
    pub orphaned_blocks: usize,
}

impl TransformResult {
    /// Whether the pass edited anything.
    pub fn is_modified(&self) -> bool {
        self.changed > 0
    }
}

/// Runs one pass over a stylesheet.
///
/// Either the whole pass succeeds or nothing is produced.
///
/// ```rust
/// use constellation_core::{transform, TransformOptions};
///
/// let once = transform("--bg: #1A1A1A;", &TransformOptions::default()).unwrap();
/// assert!(once.text.contains("--bg-rgb: rgb(26, 26, 26);"));
/// assert!(once.text.contains("theme=dark"));
///
/// let twice = transform(&once.text, &TransformOptions::default()).unwrap();
/// assert!(!twice.is_modified());
/// assert_eq!(twice.text, once.text);
/// ```
pub fn transform(input: &str, options: &TransformOptions) -> Result<TransformResult> {
    let located = locate(input)?;
    let newline = line_ending(input);

    let mut edits = Vec::new();
    let mut colors = Vec::with_capacity(located.declarations.len());
    for decl in &located.declarations {
        let decision = decide(decl, options);
        if let Some(edit) = plan_edit(decl, &decision, &options.formats, newline) {
            edits.push(edit);
        }
        colors.push(ColorReport {
            property: decl.property.clone(),
            hex: decl.color.to_hex(),
            line: decl.line,
            action: decision.action,
            theme: decision.theme,
            theme_source: decision.theme_source,
        });
    }

    let changed = edits.len();
    let text = apply_edits(input, &edits);
    log::debug!(
        "transform: {} changed, {} unchanged, {} orphaned block(s)",
        changed,
        colors.len() - changed,
        located.orphaned_blocks
    );

    Ok(TransformResult {
        text,
        changed,
        unchanged: colors.len() - changed,
        colors,
        orphaned_blocks: located.orphaned_blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = TransformOptions::default();
        assert_eq!(options.theme, ThemeMode::Light);
        assert!(!options.force);
        assert_eq!(options.formats, ColorFormat::ALL.to_vec());
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: TransformOptions = serde_yaml::from_str("theme: dark\n").unwrap();
        assert_eq!(options.theme, ThemeMode::Dark);
        assert_eq!(options.formats, ColorFormat::ALL.to_vec());

        let options: TransformOptions =
            serde_yaml::from_str("force: true\nformats: [rgb, hover]\n").unwrap();
        assert!(options.force);
        assert_eq!(options.formats, vec![ColorFormat::Rgb, ColorFormat::Hover]);
    }

    #[test]
    fn test_options_reject_unknown_keys() {
        assert!(serde_yaml::from_str::<TransformOptions>("colour: dark\n").is_err());
    }

    #[test]
    fn test_reports_per_color() {
        let css = ":root {\n  --bg: #1A1A1A;\n  --fg: #FFFFFF;\n}";
        let result = transform(css, &TransformOptions::default()).unwrap();
        assert_eq!(result.changed, 2);
        assert_eq!(result.unchanged, 0);
        assert!(result.is_modified());

        let bg = &result.colors[0];
        assert_eq!(bg.property, "--bg");
        assert_eq!(bg.hex, "#1a1a1a");
        assert_eq!(bg.line, 2);
        assert_eq!(bg.action, Action::Generate);
        assert_eq!(bg.theme, ThemeMode::Dark);
        assert_eq!(bg.theme_source, ThemeSource::Luminance);
        assert_eq!(result.colors[1].theme, ThemeMode::Light);
    }

    #[test]
    fn test_no_colors_returns_input() {
        let css = "body { margin: 0; }\n";
        let result = transform(css, &TransformOptions::default()).unwrap();
        assert_eq!(result.text, css);
        assert!(!result.is_modified());
        assert!(result.colors.is_empty());
    }

    #[test]
    fn test_summary_json_excludes_text() {
        let result = transform("--bg: #000;", &TransformOptions::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["changed"], 1);
        assert_eq!(json["colors"][0]["action"], "generate");
        assert_eq!(json["colors"][0]["theme_source"], "luminance");
    }

    #[test]
    fn test_error_produces_no_output() {
        let err = transform("--a: #fff;\n--b: #12345;", &TransformOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::TransformError::InvalidColorFormat { line: 2, .. }
        ));
    }

    #[test]
    fn test_crlf_stylesheet_keeps_its_line_endings() {
        let css = ":root {\r\n  --bg: #000;\r\n  color: #fff;\r\n}\r\n";
        let once = transform(css, &TransformOptions::default()).unwrap();
        assert!(once.text.contains("\r\n  --bg-rgb: rgb(0, 0, 0);\r\n"));
        let bytes = once.text.as_bytes();
        for (i, _) in once.text.match_indices('\n') {
            assert!(i > 0 && bytes[i - 1] == b'\r', "bare LF at byte {}", i);
        }

        let twice = transform(&once.text, &TransformOptions::default()).unwrap();
        assert!(!twice.is_modified());
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn test_standard_property_with_narrow_formats_is_stable() {
        let options = TransformOptions::default().with_formats(vec![ColorFormat::Rgb]);
        let once = transform(".a {\n  color: #336699;\n}\n", &options).unwrap();
        assert!(once
            .text
            .contains("formats=rgb */\n  /* @end-constellation */\n}"));

        let twice = transform(&once.text, &options).unwrap();
        assert!(!twice.is_modified());
        assert_eq!(twice.colors[0].action, Action::Skip);
    }
}
