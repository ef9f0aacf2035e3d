//! Property-based tests for the transformation pass.

use constellation_core::{transform, ColorFormat, ColorValue, ThemeMode, TransformOptions};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn hex_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "#[0-9a-fA-F]{3}",
        "#[0-9a-fA-F]{4}",
        "#[0-9a-fA-F]{6}",
        "#[0-9a-fA-F]{8}",
    ]
}

fn theme() -> impl Strategy<Value = ThemeMode> {
    prop_oneof![Just(ThemeMode::Light), Just(ThemeMode::Dark)]
}

fn formats() -> impl Strategy<Value = Vec<ColorFormat>> {
    prop::sample::subsequence(ColorFormat::ALL.to_vec(), 1..=ColorFormat::ALL.len())
}

fn declaration() -> impl Strategy<Value = String> {
    prop_oneof![
        ("[a-z]{1,8}", hex_literal()).prop_map(|(name, hex)| format!("--{}: {};", name, hex)),
        hex_literal().prop_map(|hex| format!("color: {};", hex)),
        hex_literal().prop_map(|hex| format!("background: {} !important;", hex)),
        Just("margin: 0 auto;".to_string()),
        Just("border: 1px solid #ccc;".to_string()),
    ]
}

/// Declaration lines, some holding two declarations, optionally ending with
/// one that has no `;`.
fn body() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        declaration().prop_map(|decl| format!("  {}", decl)),
        (declaration(), declaration()).prop_map(|(a, b)| format!("  {} {}", a, b)),
        Just("  /* author note */".to_string()),
    ];
    (
        prop::collection::vec(line, 0..6),
        prop::option::of(("[a-z]{1,8}", hex_literal())),
    )
        .prop_map(|(lines, last)| {
            let mut body = lines.join("\n");
            if let Some((name, hex)) = last {
                body.push_str(&format!("\n  --{}: {}", name, hex));
            }
            body
        })
}

/// A rule with a mix of color declarations and untouched CSS, optionally
/// holding a nested rule, followed by a one-line rule, optionally inside
/// `@media`.
fn stylesheet() -> impl Strategy<Value = String> {
    (
        body(),
        prop::option::of(body()),
        prop::option::of(("[a-z]{1,8}", hex_literal())),
        any::<bool>(),
    )
        .prop_map(|(card, child, chip, in_media)| {
            let child = child
                .map(|body| format!("  .child {{\n{}\n  }}\n", body))
                .unwrap_or_default();
            let mut css = format!(".card {{\n{}{}\n}}\n", child, card);
            if let Some((name, hex)) = chip {
                css.push_str(&format!(".chip {{ --{}: {} }}\n", name, hex));
            }
            if in_media {
                css = format!("@media print {{\n{}}}\n", css);
            }
            css
        })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Normalized HEX parses back to the same color.
    #[test]
    fn hex_round_trip(literal in hex_literal()) {
        let color = ColorValue::parse_hex(&literal).unwrap();
        prop_assert_eq!(ColorValue::parse_hex(&color.to_hex()).unwrap(), color);
    }

    /// A second pass over transformed output changes nothing.
    #[test]
    fn transform_is_idempotent(
        css in stylesheet(),
        theme in theme(),
        formats in formats(),
    ) {
        let options = TransformOptions::default().with_theme(theme).with_formats(formats);
        let once = transform(&css, &options).unwrap();
        let twice = transform(&once.text, &options).unwrap();
        prop_assert!(!twice.is_modified());
        prop_assert_eq!(twice.text, once.text);
    }

    /// Forcing regenerates every block but converges on the same text.
    #[test]
    fn force_is_stable(css in stylesheet(), theme in theme()) {
        let options = TransformOptions::default().with_theme(theme);
        let once = transform(&css, &options).unwrap();
        let forced = transform(&once.text, &options.clone().with_force(true)).unwrap();
        prop_assert_eq!(forced.changed, once.colors.len());
        let settled = transform(&forced.text, &options).unwrap();
        prop_assert!(!settled.is_modified());
    }

    /// Every piece of the original text survives, in order.
    #[test]
    fn original_text_is_preserved(css in stylesheet()) {
        let result = transform(&css, &TransformOptions::default()).unwrap();
        let mut remaining = result.text.as_str();
        for piece in css.split_whitespace() {
            let found = remaining.find(piece);
            prop_assert!(found.is_some(), "{:?} missing from output", piece);
            remaining = &remaining[found.unwrap() + piece.len()..];
        }
    }

    /// Generated blocks never change the number of located colors.
    #[test]
    fn derived_values_are_not_located(css in stylesheet()) {
        let once = transform(&css, &TransformOptions::default()).unwrap();
        let twice = transform(&once.text, &TransformOptions::default()).unwrap();
        prop_assert_eq!(once.colors.len(), twice.colors.len());
    }
}
