use hovermark_core::{StyleConfig, StyledText, render};
use lsp_types::{Hover, HoverContents, MarkedString, MarkupContent};

/// Flattens hover contents into one markdown document.
pub fn hover_markdown(contents: &HoverContents) -> String {
    match contents {
        HoverContents::Scalar(marked) => marked_markdown(marked),
        HoverContents::Array(parts) => parts
            .iter()
            .map(marked_markdown)
            .collect::<Vec<_>>()
            .join("\n\n"),
        HoverContents::Markup(MarkupContent { value, .. }) => value.clone(),
    }
}

fn marked_markdown(marked: &MarkedString) -> String {
    match marked {
        MarkedString::String(value) => value.clone(),
        MarkedString::LanguageString(code) => {
            format!("```{}\n{}\n```", code.language, code.value)
        }
    }
}

/// Renders a hover payload. A missing payload renders as empty text.
pub fn render_hover(hover: Option<&Hover>, style: &StyleConfig) -> StyledText {
    let markdown = hover
        .map(|hover| hover_markdown(&hover.contents))
        .unwrap_or_default();
    tracing::trace!(len = markdown.len(), "rendering hover");
    render(&markdown, style)
}
