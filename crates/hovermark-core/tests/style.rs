use hovermark_core::{Color, ColorParseError, DEFAULT_HEADING_SCALE, FontHandle, StyleConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("#fff", Color::rgb(0xff, 0xff, 0xff))]
#[case("#1a4f8b", Color::rgb(0x1a, 0x4f, 0x8b))]
#[case(" #1A4F8B ", Color::rgb(0x1a, 0x4f, 0x8b))]
#[case("#00000080", Color::rgba(0, 0, 0, 0x80))]
fn parses_hex_colors(#[case] input: &str, #[case] expected: Color) {
    assert_eq!(input.parse::<Color>(), Ok(expected));
}

#[test]
fn rejects_malformed_colors() {
    assert_eq!(
        "fff".parse::<Color>(),
        Err(ColorParseError::MissingHash("fff".to_string()))
    );
    assert_eq!(
        "#ffff".parse::<Color>(),
        Err(ColorParseError::InvalidLength("#ffff".to_string()))
    );
    assert_eq!(
        "#ggg".parse::<Color>(),
        Err(ColorParseError::InvalidDigit("#ggg".to_string()))
    );
    assert_eq!(
        "#ffé".parse::<Color>(),
        Err(ColorParseError::InvalidDigit("#ffé".to_string()))
    );
}

#[test]
fn display_omits_opaque_alpha() {
    assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
}

#[test]
fn partial_toml_keeps_defaults() {
    let style: StyleConfig = toml::from_str(
        r##"
bold_color = "#000000"
monospace = "JetBrains Mono"
heading_scale = [2.0, 1.5]
"##,
    )
    .expect("valid style");
    assert_eq!(style.bold_color, Color::rgb(0, 0, 0));
    assert_eq!(style.monospace, FontHandle::new("JetBrains Mono"));
    assert_eq!(style.heading_scale, vec![2.0, 1.5]);
    assert_eq!(
        style.inline_code_color,
        StyleConfig::default().inline_code_color
    );
    assert_eq!(style.link_color, StyleConfig::default().link_color);
}

#[test]
fn invalid_color_in_toml_is_an_error() {
    let result: Result<StyleConfig, _> = toml::from_str("bold_color = \"red\"");
    assert!(result.is_err());
}

#[test]
fn style_round_trips_through_json() {
    let style = StyleConfig::default();
    let json = serde_json::to_string(&style).expect("serialize");
    let back: StyleConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, style);
}

#[test]
fn heading_scale_lookup() {
    let style = StyleConfig::default();
    for level in 1..=6u8 {
        assert_eq!(
            style.heading_scale(level),
            DEFAULT_HEADING_SCALE[usize::from(level) - 1]
        );
    }
    assert_eq!(style.heading_scale(0), DEFAULT_HEADING_SCALE[0]);
    assert_eq!(style.heading_scale(9), DEFAULT_HEADING_SCALE[5]);
}
