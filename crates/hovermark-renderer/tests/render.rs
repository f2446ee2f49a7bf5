use hovermark_core::{Attribute, Color, FontHandle, Span, StyleConfig, StyledText, render};
use hovermark_renderer::{Renderer, Theme, document_colors};
use pretty_assertions::assert_eq;

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end).expect("valid span")
}

#[test]
fn plain_text_passes_through_ansi_unchanged() {
    let renderer = Renderer::new(Theme::Light);
    let styled = StyledText::plain("just words\nand lines");
    assert_eq!(renderer.to_ansi(&styled), "just words\nand lines");
}

#[test]
fn bold_runs_use_sgr_bold() {
    let renderer = Renderer::new(Theme::Dark);
    let styled = render("a **b** c", &renderer.style_config());
    let ansi = renderer.to_ansi(&styled);
    assert!(ansi.starts_with("a "));
    assert!(ansi.contains("\u{1b}[1m"), "{:?}", ansi);
    assert!(ansi.contains('b'));
    assert!(ansi.ends_with(" c"));
}

#[test]
fn true_color_foreground() {
    let mut styled = StyledText::plain("x");
    styled.annotate(span(0, 1), Attribute::Color(Color::rgb(1, 2, 3)));
    let ansi = Renderer::default().to_ansi(&styled);
    assert!(ansi.contains("38;2;1;2;3"), "{:?}", ansi);
}

#[test]
fn html_escapes_and_links() {
    let mut style = StyleConfig::default();
    style.link_color = None;
    let styled = render("a &lt;b&gt; [docs](https://x.dev/?a=1&b=2)", &style);
    let html = Renderer::new(Theme::Light).to_html(&styled);
    assert_eq!(
        html,
        "<pre class=\"hovermark\">a &lt;b&gt; <a href=\"https://x.dev/?a=1&amp;b=2\">docs</a></pre>"
    );
}

#[test]
fn html_spans_carry_inline_css() {
    let style = StyleConfig::default();
    let styled = render("## `x`", &style);
    let html = Renderer::new(Theme::Light).to_html(&styled);
    assert_eq!(
        html,
        format!(
            "<pre class=\"hovermark\"><span style=\"color:{};font-weight:bold;font-family:monospace, monospace;font-size:1.4em\">x</span></pre>",
            style.inline_code_color
        )
    );
}

#[test]
fn quote_continuations_are_indented() {
    let styled = render("> one\n> two", &StyleConfig::default());
    let html = Renderer::new(Theme::Light).to_html(&styled);
    assert!(html.contains("one\n  two"), "{}", html);
}

#[test]
fn font_override_applies_to_style_config() {
    let renderer = Renderer::new(Theme::Auto).with_font("Iosevka");
    assert_eq!(renderer.style_config().monospace, FontHandle::new("Iosevka"));
    assert_eq!(
        Renderer::new(Theme::Auto).style_config().monospace,
        FontHandle::default()
    );
}

#[test]
fn theme_style_config_is_stable() {
    let renderer = Renderer::new(Theme::Dark);
    assert_eq!(renderer.style_config(), renderer.style_config());
    assert!(renderer.style_config().link_color.is_some());
}

#[test]
fn light_and_dark_backgrounds_differ() {
    assert_ne!(document_colors(Theme::Light).0, document_colors(Theme::Dark).0);
    assert_eq!(document_colors(Theme::Auto), document_colors(Theme::Light));
}

#[test]
fn embed_html_wraps_fragment() {
    let renderer = Renderer::new(Theme::Auto);
    let fragment = renderer.to_html(&StyledText::plain("hi"));
    let page = renderer.embed_html(&fragment, true);
    assert!(page.starts_with("<!DOCTYPE html>\n"));
    assert!(page.contains("<style>"));
    assert!(page.contains("@media (prefers-color-scheme: dark)"));
    assert!(page.contains("<pre class=\"hovermark\">hi</pre>\n</body>"));

    let bare = Renderer::new(Theme::Dark).embed_html(&fragment, false);
    assert!(!bare.contains("<style>"));
}
