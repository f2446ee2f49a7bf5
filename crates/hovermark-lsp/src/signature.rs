use hovermark_core::{Attribute, FontWeight, Span, StyleConfig, StyledText, render};
use lsp_types::{
    Documentation, MarkupContent, ParameterLabel, SignatureHelp, SignatureInformation,
};

/// Styled pieces of one signature: the label line and its documentation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureView {
    pub label: StyledText,
    pub documentation: StyledText,
}

/// Which signature of a help response is shown. Wraps in both directions.
#[derive(Clone, Debug, Default)]
pub struct SignatureNavigator {
    signatures: Vec<SignatureInformation>,
    active: usize,
    active_parameter: Option<u32>,
}

impl SignatureNavigator {
    pub fn new(help: SignatureHelp) -> Self {
        let active = help
            .active_signature
            .map(|idx| idx as usize)
            .filter(|idx| *idx < help.signatures.len())
            .unwrap_or(0);
        Self {
            signatures: help.signatures,
            active,
            active_parameter: help.active_parameter,
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn current(&self) -> Option<&SignatureInformation> {
        self.signatures.get(self.active)
    }

    pub fn next(&mut self) {
        if !self.signatures.is_empty() {
            self.active = (self.active + 1) % self.signatures.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.signatures.is_empty() {
            self.active = (self.active + self.signatures.len() - 1) % self.signatures.len();
        }
    }

    /// `"(2/3)"` style position, only when there is more than one signature.
    pub fn position_label(&self) -> Option<String> {
        (self.signatures.len() > 1)
            .then(|| format!("({}/{})", self.active + 1, self.signatures.len()))
    }

    /// The signature's own active parameter takes precedence over the one
    /// reported for the whole response.
    pub fn active_parameter(&self) -> Option<u32> {
        self.current()
            .and_then(|signature| signature.active_parameter)
            .or(self.active_parameter)
    }

    pub fn render(&self, style: &StyleConfig) -> Option<SignatureView> {
        let signature = self.current()?;
        Some(render_signature(signature, self.active_parameter(), style))
    }
}

/// Renders a signature label with the active parameter emphasized, plus its
/// documentation as markdown.
pub fn render_signature(
    signature: &SignatureInformation,
    active_parameter: Option<u32>,
    style: &StyleConfig,
) -> SignatureView {
    let mut label = StyledText::plain(signature.label.clone());
    let parameter = active_parameter.and_then(|idx| {
        signature
            .parameters
            .as_ref()
            .and_then(|parameters| parameters.get(idx as usize))
    });
    if let Some(parameter) = parameter {
        match parameter_span(&signature.label, &parameter.label) {
            Some(span) => {
                label.annotate(span, Attribute::Weight(FontWeight::Bold));
                label.annotate(span, Attribute::Color(style.bold_color));
            }
            None => tracing::debug!(label = %signature.label, "active parameter not found in label"),
        }
    }

    let documentation = signature
        .documentation
        .as_ref()
        .map(documentation_markdown)
        .unwrap_or_default();
    SignatureView {
        label,
        documentation: render(&documentation, style),
    }
}

pub fn documentation_markdown(documentation: &Documentation) -> String {
    match documentation {
        Documentation::String(text) => text.clone(),
        Documentation::MarkupContent(MarkupContent { value, .. }) => value.clone(),
    }
}

/// Character span of a parameter inside the signature label.
fn parameter_span(label: &str, parameter: &ParameterLabel) -> Option<Span> {
    match parameter {
        ParameterLabel::Simple(text) if !text.is_empty() => {
            let byte_start = label.find(text.as_str())?;
            let start = label[..byte_start].chars().count();
            Span::new(start, start + text.chars().count()).ok()
        }
        ParameterLabel::Simple(_) => None,
        ParameterLabel::LabelOffsets([start, end]) => {
            let start = utf16_to_char(label, *start)?;
            let end = utf16_to_char(label, *end)?;
            Span::new(start, end).ok().filter(|span| !span.is_empty())
        }
    }
}

/// Converts a UTF-16 code unit offset into a character offset. Offsets that
/// fall inside a surrogate pair or past the end are rejected.
fn utf16_to_char(text: &str, offset: u32) -> Option<usize> {
    let target = offset as usize;
    let mut units = 0;
    for (idx, ch) in text.chars().enumerate() {
        if units == target {
            return Some(idx);
        }
        if units > target {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == target).then(|| text.chars().count())
}
