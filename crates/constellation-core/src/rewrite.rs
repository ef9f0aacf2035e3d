//! Rendering generated blocks and splicing them into the stylesheet.
//!
//! A block is rendered on its own lines after the declaration, each line
//! carrying the declaration's indentation:
//!
//! ```css
//! :root {
//!   --bg: #1A1A1A;
//!   /* @constellation #1a1a1a theme=dark formats=rgb,hsl */
//!   --bg-rgb: rgb(26, 26, 26);
//!   --bg-hsl: hsl(0, 0%, 10%);
//!   /* @end-constellation */
//! }
//! ```
//!
//! Standard properties cannot grow new names, so they only get redeclarations
//! in the wide-gamut formats that browsers pick over the HEX when supported:
//!
//! ```css
//! color: #336699;
//! /* @constellation #336699 theme=dark formats=oklch,p3 */
//! color: oklch(...);
//! color: color(display-p3 ...);
//! /* @end-constellation */
//! ```
//!
//! When no wide-gamut format is requested, a standard property still gets the
//! marker pair with nothing in between. The marker records the requested
//! formats, so the next pass with the same formats skips it.
//!
//! Lines are joined with the stylesheet's own line ending (`\r\n` when the
//! source uses it, `\n` otherwise).

use std::ops::Range;

use crate::color::{normalize_formats, ColorFormat, DerivedFormatSet, ThemeMode};
use crate::locate::ColorDeclaration;
use crate::marker::{render_close, Marker};
use crate::policy::{Action, Decision};

/// A replacement of `span` in the original text. Insertions have an empty span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub text: String,
}

/// Renders the generated block for a declaration.
///
/// The text starts right where the declaration ends: with a `;` if the
/// declaration had none, then `newline` before the opening marker.
pub fn render_block(
    decl: &ColorDeclaration,
    theme: ThemeMode,
    formats: &[ColorFormat],
    newline: &str,
) -> String {
    let formats = normalize_formats(formats);
    let derived = DerivedFormatSet::derive(&decl.color, theme, &formats);
    let marker = Marker::new(decl.color.to_hex(), theme, &formats);
    let indent = decl.indent.as_str();

    let mut out = String::new();
    if !decl.terminated {
        out.push(';');
    }
    push_line(&mut out, newline, indent, &marker.render_open());

    if decl.is_custom_property() {
        for (format, value) in derived.iter() {
            push_line(
                &mut out,
                newline,
                indent,
                &format!("{}-{}: {};", decl.property, format.id(), value),
            );
        }
    } else {
        let important = if decl.important { " !important" } else { "" };
        for (_, value) in derived.iter().filter(|(f, _)| f.is_progressive()) {
            push_line(
                &mut out,
                newline,
                indent,
                &format!("{}: {}{};", decl.property, value, important),
            );
        }
    }

    push_line(&mut out, newline, indent, &render_close());
    out
}

fn push_line(out: &mut String, newline: &str, indent: &str, line: &str) {
    out.push_str(newline);
    out.push_str(indent);
    out.push_str(line);
}

/// The line ending a stylesheet uses.
pub fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// The edit a decision calls for, if any.
pub fn plan_edit(
    decl: &ColorDeclaration,
    decision: &Decision,
    formats: &[ColorFormat],
    newline: &str,
) -> Option<Edit> {
    let span = match (decision.action, &decl.block) {
        (Action::Skip, _) => return None,
        (Action::Regenerate, Some(block)) => block.span.clone(),
        _ => decl.end..decl.end,
    };
    Some(Edit {
        span,
        text: render_block(decl, decision.theme, formats, newline),
    })
}

/// Applies edits in one forward pass. Bytes outside edited spans are copied
/// verbatim.
///
/// Edits must be sorted by position and must not overlap.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let extra: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for edit in edits {
        debug_assert!(edit.span.start >= cursor, "edits overlap or are out of order");
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.text);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    out
}
