use hovermark_core::{Attribute, FontWeight, Span, StyleConfig, render};
use hovermark_lsp::lsp_types::{Hover, HoverContents, SignatureHelp, SignatureInformation};
use hovermark_lsp::{SignatureNavigator, hover_markdown, render_hover, render_signature};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn hover(value: serde_json::Value) -> Hover {
    serde_json::from_value(json!({ "contents": value })).expect("valid hover")
}

fn help(value: serde_json::Value) -> SignatureHelp {
    serde_json::from_value(value).expect("valid signature help")
}

fn signature(value: serde_json::Value) -> SignatureInformation {
    serde_json::from_value(value).expect("valid signature")
}

#[rstest]
#[case(json!("plain **text**"), "plain **text**")]
#[case(json!({ "language": "rust", "value": "let x = 1;" }), "```rust\nlet x = 1;\n```")]
#[case(
    json!(["first", { "language": "ts", "value": "x: number" }]),
    "first\n\n```ts\nx: number\n```"
)]
#[case(json!({ "kind": "markdown", "value": "# Doc" }), "# Doc")]
fn hover_contents_become_markdown(#[case] contents: serde_json::Value, #[case] expected: &str) {
    let contents: HoverContents = serde_json::from_value(contents).expect("valid contents");
    assert_eq!(hover_markdown(&contents), expected);
}

#[test]
fn hover_renders_through_the_pipeline() {
    let style = StyleConfig::default();
    let payload = hover(json!({ "kind": "markdown", "value": "`fn` **main**" }));
    let styled = render_hover(Some(&payload), &style);
    assert_eq!(styled, render("`fn` **main**", &style));
    assert_eq!(styled.text(), "fn main");
}

#[test]
fn language_hover_renders_as_code_block() {
    let styled = render_hover(
        Some(&hover(json!({ "language": "rust", "value": "fn main()" }))),
        &StyleConfig::default(),
    );
    assert_eq!(styled.text(), "fn main()");
    assert!(matches!(styled.attributes()[0], Attribute::Monospace(_)));
}

#[test]
fn missing_hover_is_empty() {
    let styled = render_hover(None, &StyleConfig::default());
    assert!(styled.is_empty());
}

#[test]
fn active_parameter_found_by_label_text() {
    let style = StyleConfig::default();
    let info = signature(json!({
        "label": "fn clamp(value: i32, min: i32, max: i32)",
        "parameters": [{ "label": "value: i32" }, { "label": "min: i32" }, { "label": "max: i32" }],
        "documentation": "Clamps **value**."
    }));
    let view = render_signature(&info, Some(1), &style);
    assert_eq!(view.label.text(), info.label);
    let min = Span::new(21, 29).expect("valid span");
    assert_eq!(
        view.label.annotations().map(|a| (a.range, a.attribute.clone())).collect::<Vec<_>>(),
        vec![
            (min, Attribute::Weight(FontWeight::Bold)),
            (min, Attribute::Color(style.bold_color)),
        ]
    );
    assert_eq!(view.label.slice(min), "min: i32");
    assert_eq!(view.documentation.text(), "Clamps value.");
}

#[test]
fn active_parameter_found_by_utf16_offsets() {
    let info = signature(json!({
        "label": "fn greet(😀: str, name: str)",
        "parameters": [{ "label": [9, 16] }, { "label": [18, 27] }]
    }));
    let view = render_signature(&info, Some(1), &StyleConfig::default());
    let span = view.label.ranges()[0];
    assert_eq!(view.label.slice(span), "name: str");

    let first = render_signature(&info, Some(0), &StyleConfig::default());
    assert_eq!(first.label.slice(first.label.ranges()[0]), "😀: str");
}

#[rstest]
#[case(None)]
#[case(Some(7))]
fn no_highlight_without_a_valid_parameter(#[case] active: Option<u32>) {
    let info = signature(json!({
        "label": "fn f(a)",
        "parameters": [{ "label": "a" }]
    }));
    let view = render_signature(&info, active, &StyleConfig::default());
    assert_eq!(view.label.annotations().count(), 0);
    assert!(view.documentation.is_empty());
}

#[test]
fn unmatched_parameter_label_is_ignored() {
    let info = signature(json!({
        "label": "fn f(a)",
        "parameters": [{ "label": "zzz" }, { "label": [4, 99] }]
    }));
    assert_eq!(
        render_signature(&info, Some(0), &StyleConfig::default())
            .label
            .annotations()
            .count(),
        0
    );
    assert_eq!(
        render_signature(&info, Some(1), &StyleConfig::default())
            .label
            .annotations()
            .count(),
        0
    );
}

#[test]
fn navigator_wraps_around() {
    let mut nav = SignatureNavigator::new(help(json!({
        "signatures": [{ "label": "a()" }, { "label": "b()" }, { "label": "c()" }],
        "activeSignature": 2,
        "activeParameter": 0
    })));
    assert_eq!(nav.len(), 3);
    assert_eq!(nav.position_label().as_deref(), Some("(3/3)"));
    nav.next();
    assert_eq!(nav.current().map(|s| s.label.as_str()), Some("a()"));
    nav.previous();
    nav.previous();
    assert_eq!(nav.active_index(), 1);
    assert_eq!(nav.position_label().as_deref(), Some("(2/3)"));
}

#[test]
fn navigator_clamps_out_of_range_active_signature() {
    let nav = SignatureNavigator::new(help(json!({
        "signatures": [{ "label": "only()" }],
        "activeSignature": 5
    })));
    assert_eq!(nav.active_index(), 0);
    assert_eq!(nav.position_label(), None);
}

#[test]
fn empty_navigator_renders_nothing() {
    let mut nav = SignatureNavigator::new(help(json!({ "signatures": [] })));
    nav.next();
    nav.previous();
    assert!(nav.is_empty());
    assert!(nav.render(&StyleConfig::default()).is_none());
}

#[test]
fn signature_active_parameter_overrides_response() {
    let nav = SignatureNavigator::new(help(json!({
        "signatures": [{
            "label": "f(a, b)",
            "parameters": [{ "label": "a" }, { "label": "b" }],
            "activeParameter": 1
        }],
        "activeParameter": 0
    })));
    assert_eq!(nav.active_parameter(), Some(1));
    let view = nav.render(&StyleConfig::default()).expect("signature");
    assert_eq!(view.label.slice(view.label.ranges()[0]), "b");
}
