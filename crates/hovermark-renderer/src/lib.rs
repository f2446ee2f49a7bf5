use crossterm::style::{Attribute as TermAttribute, Attributes, Color as TermColor, ContentStyle};
use hovermark_core::{
    Color, FontHandle, FontSlant, FontWeight, ResolvedStyle, StyleConfig, StyledText,
};
use once_cell::sync::Lazy;
use syntect::highlighting::{Highlighter, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::Scope;

static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Scope candidates per style slot, tried in order until one resolves to a
/// color other than the theme's default foreground.
const BOLD_SCOPES: &[&str] = &["markup.bold", "markup.heading"];
const INLINE_CODE_SCOPES: &[&str] = &["markup.raw.inline", "markup.raw", "string.quoted"];
const BLOCK_CODE_SCOPES: &[&str] = &["markup.raw.block", "markup.raw", "support.function"];
const LINK_SCOPES: &[&str] = &["markup.underline.link", "string.other.link", "entity.name.tag"];

#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    font: Option<FontHandle>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, font: None }
    }

    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font = Some(FontHandle::new(family));
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Builds a `StyleConfig` from the markup scopes of the selected syntect
    /// theme. Falls back to the built-in palette when no theme is available.
    pub fn style_config(&self) -> StyleConfig {
        let mut config = StyleConfig::default();
        if let Some(theme) = pick_theme(self.theme, &THEMES) {
            let highlighter = Highlighter::new(theme);
            let foreground = convert_color(highlighter.get_default().foreground);
            config.bold_color = scope_color(&highlighter, BOLD_SCOPES).unwrap_or(foreground);
            config.inline_code_color =
                scope_color(&highlighter, INLINE_CODE_SCOPES).unwrap_or(foreground);
            config.block_code_color =
                scope_color(&highlighter, BLOCK_CODE_SCOPES).unwrap_or(foreground);
            config.link_color = scope_color(&highlighter, LINK_SCOPES).or(config.link_color);
        }
        if let Some(font) = &self.font {
            config.monospace = font.clone();
        }
        config
    }

    /// Writes `styled` as terminal text with SGR escapes per run.
    pub fn to_ansi(&self, styled: &StyledText) -> String {
        let mut out = String::with_capacity(styled.text().len());
        for run in styled.runs() {
            let text = indent_continuations(&styled.text()[run.bytes.clone()], &run.style);
            if run.style.is_plain() {
                out.push_str(&text);
                continue;
            }
            out.push_str(&content_style(&run.style).apply(text).to_string());
        }
        out
    }

    /// Writes `styled` as an HTML fragment, one `<span>` per styled run.
    pub fn to_html(&self, styled: &StyledText) -> String {
        let mut out = String::from("<pre class=\"hovermark\">");
        for run in styled.runs() {
            let text = indent_continuations(&styled.text()[run.bytes.clone()], &run.style);
            let escaped = escape_html(&text);
            let css = inline_css(&run.style);
            if let Some(url) = &run.style.link {
                out.push_str(&format!("<a href=\"{}\">", escape_html(url)));
            }
            if css.is_empty() {
                out.push_str(&escaped);
            } else {
                out.push_str(&format!("<span style=\"{}\">{}</span>", css, escaped));
            }
            if run.style.link.is_some() {
                out.push_str("</a>");
            }
        }
        out.push_str("</pre>");
        out
    }

    pub fn stylesheet(&self) -> String {
        let light = document_colors(Theme::Light);
        let dark = document_colors(Theme::Dark);
        let mut out = String::new();
        match self.theme {
            Theme::Auto => {
                out.push_str(&root_block(light, "  "));
                out.push_str("@media (prefers-color-scheme: dark) {\n");
                out.push_str(&root_block(dark, "    "));
                out.push_str("}\n");
            }
            Theme::Light => out.push_str(&root_block(light, "  ")),
            Theme::Dark => out.push_str(&root_block(dark, "  ")),
        }
        out.push_str(BASE_CSS);
        out
    }

    /// Wraps an HTML fragment in a standalone document.
    pub fn embed_html(&self, html: &str, with_inline_css: bool) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n");
        out.push_str("<head>\n");
        out.push_str("  <meta charset=\"utf-8\" />\n");
        if with_inline_css {
            out.push_str("  <style>\n");
            out.push_str(&self.stylesheet());
            out.push_str("  </style>\n");
        }
        out.push_str("</head>\n");
        out.push_str("<body>\n");
        out.push_str(html);
        if !html.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Theme::Auto)
    }
}

const BASE_CSS: &str = "pre.hovermark {\n  background: var(--hovermark-bg);\n  color: var(--hovermark-fg);\n  padding: 0.75em 1em;\n  white-space: pre-wrap;\n  font-family: system-ui, sans-serif;\n}\npre.hovermark a {\n  text-decoration: underline;\n}\n";

fn root_block((background, foreground): (Color, Color), indent: &str) -> String {
    let outer = &indent[..indent.len().saturating_sub(2)];
    format!(
        "{outer}:root {{\n{indent}color-scheme: light dark;\n{indent}--hovermark-bg: {background};\n{indent}--hovermark-fg: {foreground};\n{outer}}}\n"
    )
}

/// Background and foreground of a theme, used for standalone documents.
pub fn document_colors(theme: Theme) -> (Color, Color) {
    let fallback = match theme {
        Theme::Dark => (Color::rgb(0x0e, 0x11, 0x16), Color::rgb(0xe6, 0xed, 0xf3)),
        Theme::Light | Theme::Auto => (Color::rgb(0xfb, 0xfb, 0xf8), Color::rgb(0x1f, 0x23, 0x28)),
    };
    let Some(found) = pick_theme(theme, &THEMES) else {
        return fallback;
    };
    let background = found.settings.background.map(convert_color).unwrap_or(fallback.0);
    let foreground = found.settings.foreground.map(convert_color).unwrap_or(fallback.1);
    (background, foreground)
}

fn pick_theme(theme: Theme, theme_set: &ThemeSet) -> Option<&SyntectTheme> {
    let candidates = match theme {
        Theme::Dark => ["base16-ocean.dark", "base16-eighties.dark", "base16-mocha.dark"],
        Theme::Light | Theme::Auto => ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"],
    };
    candidates
        .iter()
        .find_map(|name| theme_set.themes.get(*name))
        .or_else(|| theme_set.themes.values().next())
}

fn scope_color(highlighter: &Highlighter<'_>, candidates: &[&str]) -> Option<Color> {
    let default = highlighter.get_default().foreground;
    candidates.iter().find_map(|name| {
        let scope = Scope::new(name).ok()?;
        let resolved = highlighter.style_for_stack(&[scope]).foreground;
        (resolved != default).then(|| convert_color(resolved))
    })
}

fn convert_color(color: syntect::highlighting::Color) -> Color {
    Color::rgba(color.r, color.g, color.b, color.a)
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn content_style(style: &ResolvedStyle) -> ContentStyle {
    let mut attributes = Attributes::default();
    if style.weight == FontWeight::Bold {
        attributes.set(TermAttribute::Bold);
    }
    if style.slant == FontSlant::Italic {
        attributes.set(TermAttribute::Italic);
    }
    if style.link.is_some() {
        attributes.set(TermAttribute::Underlined);
    }
    ContentStyle {
        foreground_color: style.color.map(term_color),
        attributes,
        ..Default::default()
    }
}

fn inline_css(style: &ResolvedStyle) -> String {
    let mut css = Vec::new();
    if let Some(color) = style.color {
        css.push(format!("color:{}", color));
    }
    if style.weight == FontWeight::Bold {
        css.push("font-weight:bold".to_string());
    }
    if style.slant == FontSlant::Italic {
        css.push("font-style:italic".to_string());
    }
    if let Some(font) = &style.monospace {
        css.push(format!("font-family:{}, monospace", escape_html(font.family())));
    }
    if style.relative_size != 1.0 {
        css.push(format!("font-size:{}em", style.relative_size));
    }
    css.join(";")
}

/// Newlines inside a hanging-indent run are followed by the indent width in
/// spaces so continuation lines line up with the content.
fn indent_continuations(text: &str, style: &ResolvedStyle) -> String {
    match style.hanging_indent {
        Some(width) if width > 0 && text.contains('\n') => {
            text.replace('\n', &format!("\n{}", " ".repeat(width)))
        }
        _ => text.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
