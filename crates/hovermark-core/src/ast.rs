pub type InlineSeq = Vec<Inline>;

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        inlines: InlineSeq,
    },
    Paragraph {
        inlines: InlineSeq,
    },
    CodeBlock {
        // Raw fence interior, never inline-parsed.
        content: String,
    },
    List {
        ordered: bool,
        items: Vec<InlineSeq>,
        start_index: u64,
    },
    Quote {
        inlines: InlineSeq,
    },
    HorizontalRule,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Bold(InlineSeq),
    Italic(InlineSeq),
    Code(String),
    Link { label: InlineSeq, url: String },
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Concatenated visible text of this node and its children.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        push_plain_text(self, &mut out);
        out
    }
}

fn push_plain_text(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(value) | Inline::Code(value) => out.push_str(value),
        Inline::Bold(children) | Inline::Italic(children) => {
            for child in children {
                push_plain_text(child, out);
            }
        }
        Inline::Link { label, .. } => {
            for child in label {
                push_plain_text(child, out);
            }
        }
    }
}
