//! Human and JSON summaries of a run.

use std::path::Path;

use anyhow::Result;
use console::Style;
use constellation_core::{Action, TransformResult};
use serde::Serialize;

/// What the command did with the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The output file was written.
    Written,
    /// Nothing to write; the file is current.
    UpToDate,
    /// `--check`: the file would change.
    WouldChange,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Written => "wrote",
            Outcome::UpToDate => "up to date",
            Outcome::WouldChange => "would change",
        }
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    file: String,
    outcome: Outcome,
    #[serde(flatten)]
    result: &'a TransformResult,
}

/// Renders the summary as pretty-printed JSON.
pub fn render_json(result: &TransformResult, file: &Path, outcome: Outcome) -> Result<String> {
    let summary = JsonSummary {
        file: file.display().to_string(),
        outcome,
        result,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Renders the summary for a terminal.
///
/// One line per edited color, then a totals line. With `verbose`, skipped
/// colors are listed too.
pub fn render_text(
    result: &TransformResult,
    file: &Path,
    outcome: Outcome,
    verbose: bool,
) -> String {
    let action_style = |action: Action| match action {
        Action::Generate => Style::new().green(),
        Action::Regenerate => Style::new().yellow(),
        Action::Skip => Style::new().dim(),
    };
    let dim = Style::new().dim();

    let mut out = String::new();
    for color in result
        .colors
        .iter()
        .filter(|c| verbose || c.action.is_edit())
    {
        out.push_str(&format!(
            "  {} {} {} {}\n",
            action_style(color.action).apply_to(format!("{:<10}", color.action.as_str())),
            color.property,
            color.hex,
            dim.apply_to(format!(
                "line {}, {} theme from {}",
                color.line, color.theme, color.theme_source
            )),
        ));
    }

    if result.orphaned_blocks > 0 {
        out.push_str(&format!(
            "{} {} generated block(s) without a color declaration left untouched\n",
            Style::new().yellow().bold().apply_to("warning:"),
            result.orphaned_blocks
        ));
    }

    let status_style = match outcome {
        Outcome::Written => Style::new().green().bold(),
        Outcome::UpToDate => Style::new().bold(),
        Outcome::WouldChange => Style::new().yellow().bold(),
    };
    out.push_str(&format!(
        "{} {}: {} changed, {} unchanged\n",
        status_style.apply_to(outcome.label()),
        file.display(),
        result.changed,
        result.unchanged
    ));
    out
}
