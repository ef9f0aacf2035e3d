//! End-to-end behavior of the transformation pass.

use constellation_core::{
    transform, Action, ColorFormat, ThemeMode, ThemeSource, TransformError, TransformOptions,
};

fn run(css: &str) -> constellation_core::TransformResult {
    transform(css, &TransformOptions::default()).unwrap()
}

// ============================================================================
// Generation and idempotence
// ============================================================================

#[test]
fn generates_block_for_new_color() {
    let result = run("--bg: #1A1A1A;");

    assert!(result.text.starts_with("--bg: #1A1A1A;\n"));
    assert!(result.text.contains(
        "/* @constellation #1a1a1a theme=dark formats=rgb,hsl,hwb,lab,oklch,p3,hover,active,contrast */"
    ));
    assert!(result.text.contains("--bg-rgb: rgb(26, 26, 26);"));
    assert!(result.text.contains("--bg-hsl: hsl(0, 0%, 10%);"));
    assert!(result.text.contains("--bg-contrast: #ffffff;"));
    assert!(result.text.ends_with("/* @end-constellation */"));
    assert_eq!(result.colors[0].theme, ThemeMode::Dark);
}

#[test]
fn second_pass_changes_nothing() {
    let first = run("--bg: #1A1A1A;");
    let second = run(&first.text);

    assert!(!second.is_modified());
    assert_eq!(second.text, first.text);
    assert_eq!(second.unchanged, 1);
    assert_eq!(second.colors[0].action, Action::Skip);
    assert_eq!(second.colors[0].theme_source, ThemeSource::Marker);
}

#[test]
fn stale_block_is_regenerated() {
    let css = "\
:root {
  --bg: #111111;
  /* @constellation #000000 theme=dark formats=rgb,hsl,hwb,lab,oklch,p3,hover,active,contrast */
  --bg-rgb: rgb(0, 0, 0);
  /* @end-constellation */
}
";
    let result = run(css);

    assert_eq!(result.colors[0].action, Action::Regenerate);
    assert!(result.text.contains("/* @constellation #111111 theme=dark"));
    assert!(result.text.contains("  --bg-rgb: rgb(17, 17, 17);"));
    assert!(!result.text.contains("#000000 theme"));
    assert!(!result.text.contains("rgb(0, 0, 0)"));
    assert_eq!(result.text.matches("@end-constellation").count(), 1);
}

#[test]
fn short_hex_is_not_stale() {
    let first = run(".a { color: #FFF; }");
    assert!(first.text.contains("@constellation #ffffff"));
    assert!(!run(&first.text).is_modified());
}

#[test]
fn format_change_regenerates() {
    let first = run("--bg: #336699;");
    let options = TransformOptions::default().with_formats(vec![ColorFormat::Rgb]);
    let second = transform(&first.text, &options).unwrap();

    assert_eq!(second.colors[0].action, Action::Regenerate);
    assert!(second.text.contains("formats=rgb */"));
    assert!(!second.text.contains("--bg-hsl"));
}

// ============================================================================
// Force and themes
// ============================================================================

#[test]
fn force_regenerates_current_blocks() {
    let first = run("--bg: #1A1A1A;\n--fg: #EEEEEE;\n");
    let options = TransformOptions::default().with_force(true);
    let forced = transform(&first.text, &options).unwrap();

    assert_eq!(forced.changed, 2);
    assert!(forced
        .colors
        .iter()
        .all(|c| c.action == Action::Regenerate));
    // Deterministic rendering gives the same text back
    assert_eq!(forced.text, first.text);
}

#[test]
fn force_replaces_hand_edited_theme() {
    let css = "--fg: #ffffff;\n/* @constellation #ffffff theme=dark formats=hover */\n--fg-hover: #ffffff;\n/* @end-constellation */";
    let kept = run(css);
    assert_eq!(kept.colors[0].theme, ThemeMode::Dark);

    let forced = transform(css, &TransformOptions::default().with_force(true)).unwrap();
    assert_eq!(forced.colors[0].theme, ThemeMode::Light);
    assert!(forced.text.contains("theme=light"));
}

#[test]
fn clear_luminance_overrides_fallback() {
    let options = TransformOptions::default().with_theme(ThemeMode::Dark);
    let result = transform("--fg: #FFFFFF;", &options).unwrap();
    assert_eq!(result.colors[0].theme, ThemeMode::Light);
    assert_eq!(result.colors[0].theme_source, ThemeSource::Luminance);
}

#[test]
fn ambiguous_color_uses_fallback() {
    let options = TransformOptions::default().with_theme(ThemeMode::Dark);
    let result = transform("--mid: #777777;", &options).unwrap();
    assert_eq!(result.colors[0].theme, ThemeMode::Dark);
    assert_eq!(result.colors[0].theme_source, ThemeSource::Fallback);
    assert!(result.text.contains("theme=dark"));
}

#[test]
fn hover_direction_follows_theme() {
    let options = TransformOptions::default().with_formats(vec![ColorFormat::Hover]);
    let dark = transform("--a: #222222;", &options).unwrap();
    let light = transform("--a: #dddddd;", &options).unwrap();

    let hover = |text: &str| -> String {
        let start = text.find("--a-hover: ").unwrap() + "--a-hover: ".len();
        text[start..start + 7].to_string()
    };
    assert!(hover(&dark.text).as_str() > "#222222");
    assert!(hover(&light.text).as_str() < "#dddddd");
}

// ============================================================================
// Preservation
// ============================================================================

#[test]
fn unrelated_css_is_untouched() {
    let css = "\
/* Brand palette */
@import url(\"reset.css\");

.card {
    padding: 4px 8px;   /* spacing */
    border: 1px solid #ccc;
    --accent: #FF8800;
}

#main > a:hover { text-decoration: underline }
";
    let result = run(css);
    assert_eq!(result.changed, 1);

    let block_start = result.text.find("\n    /* @constellation").unwrap();
    let block_end = result.text.find("/* @end-constellation */").unwrap()
        + "/* @end-constellation */".len();
    let mut without_block = result.text.clone();
    without_block.replace_range(block_start..block_end, "");
    assert_eq!(without_block, css);
}

#[test]
fn standard_property_redeclares_wide_gamut() {
    let result = run(".btn {\n  color: #336699 !important;\n}");
    assert!(result.text.contains("  color: oklch("));
    assert!(result.text.contains("  color: color(display-p3 "));
    assert!(!result.text.contains("color-rgb"));
    assert_eq!(result.text.matches("!important").count(), 3);
}

#[test]
fn orphaned_block_is_preserved() {
    let css = "\
.a {
  --c: #ffffff;
  width: 1px;
  /* @constellation #ffffff theme=light formats=contrast */
  --c-contrast: #000000;
  /* @end-constellation */
}
";
    let result = transform(
        css,
        &TransformOptions::default().with_formats(vec![ColorFormat::Contrast]),
    )
    .unwrap();

    assert_eq!(result.orphaned_blocks, 1);
    assert_eq!(result.colors.len(), 1);
    assert_eq!(result.colors[0].action, Action::Generate);
    assert_eq!(result.text.matches("@end-constellation").count(), 2);
    assert!(result.text.contains("  width: 1px;\n  /* @constellation #ffffff theme=light formats=contrast */\n  --c-contrast: #000000;"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn malformed_stylesheet_fails() {
    let err = transform(".a { --bg: #fff;\n", &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::MalformedStylesheet { line: 1, column: 4, .. }));
}

#[test]
fn invalid_color_fails_with_line() {
    let err = transform(":root {\n  --ok: #fff;\n  --bad: #1234567;\n}", &TransformOptions::default())
        .unwrap_err();
    match err {
        TransformError::InvalidColorFormat { value, line, .. } => {
            assert_eq!(value, "#1234567");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn missing_closing_marker_fails() {
    let css = "--c: #fff;\n/* @constellation #ffffff theme=light formats=rgb */\n--c-rgb: rgb(255, 255, 255);\n";
    assert!(matches!(
        transform(css, &TransformOptions::default()),
        Err(TransformError::MalformedStylesheet { line: 2, .. })
    ));
}

#[test]
fn invalid_color_mid_rule_is_reported_as_such() {
    let css = "@media print {\n  .a {\n    --bad: #12345;\n    --ok: #fff;\n  }\n}\n";
    match transform(css, &TransformOptions::default()).unwrap_err() {
        TransformError::InvalidColorFormat { value, line, .. } => {
            assert_eq!(value, "#12345");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn malformed_token_mid_rule_keeps_its_position() {
    let css = ":root {\n  --bg: #000;\n  .inner {\n    content: \"oops\n    color: #fff;\n  }\n}\n";
    match transform(css, &TransformOptions::default()).unwrap_err() {
        TransformError::MalformedStylesheet { line, message, .. } => {
            assert_eq!(line, 4);
            assert_eq!(message, "unterminated string");
        }
        other => panic!("unexpected error: {}", other),
    }
}
