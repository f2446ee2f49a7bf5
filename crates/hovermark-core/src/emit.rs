use crate::ast::{Block, Inline};
use crate::parser::parse;
use crate::span::Span;
use crate::style::StyleConfig;
use crate::styled::{Attribute, FontSlant, FontWeight, StyledText};

pub const BLOCK_SEPARATOR: &str = "\n\n";
pub const QUOTE_PREFIX: &str = "│ ";
pub const BULLET: &str = "• ";
pub const HORIZONTAL_RULE: &str = "────────────────────────";

/// Parses `source` and builds its styled text in one pass.
pub fn render(source: &str, style: &StyleConfig) -> StyledText {
    let blocks = parse(source);
    build(&blocks, style)
}

/// Builds the styled text for already parsed blocks.
pub fn build(blocks: &[Block], style: &StyleConfig) -> StyledText {
    let mut writer = StyledWriter::new(style);
    // Blocks with no visible text are skipped so separators never stack.
    let visible = blocks.iter().filter(|block| !renders_empty(block));
    for (idx, block) in visible.enumerate() {
        if idx > 0 {
            writer.out.push_str(BLOCK_SEPARATOR);
        }
        emit_block(&mut writer, block);
    }
    writer.out
}

fn renders_empty(block: &Block) -> bool {
    match block {
        Block::Heading { inlines, .. } | Block::Paragraph { inlines } => {
            inlines.iter().all(|inline| inline.plain_text().is_empty())
        }
        Block::CodeBlock { content } => content.trim_matches('\n').is_empty(),
        Block::List { .. } | Block::Quote { .. } | Block::HorizontalRule => false,
    }
}

struct StyledWriter<'a> {
    out: StyledText,
    style: &'a StyleConfig,
}

impl<'a> StyledWriter<'a> {
    fn new(style: &'a StyleConfig) -> Self {
        Self {
            out: StyledText::new(),
            style,
        }
    }

    fn position(&self) -> usize {
        self.out.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            start,
            end: self.position(),
        }
    }

    fn annotate(&mut self, start: usize, attribute: Attribute) {
        let span = self.span_from(start);
        self.out.annotate(span, attribute);
    }
}

fn emit_block(writer: &mut StyledWriter<'_>, block: &Block) {
    match block {
        Block::Heading { level, inlines } => {
            let start = writer.position();
            emit_inlines(writer, inlines);
            let scale = writer.style.heading_scale(*level);
            writer.annotate(start, Attribute::Weight(FontWeight::Bold));
            writer.annotate(start, Attribute::RelativeSize(scale));
        }
        Block::Paragraph { inlines } => emit_inlines(writer, inlines),
        Block::Quote { inlines } => {
            let start = writer.position();
            writer.out.push_str(QUOTE_PREFIX);
            let content_start = writer.position();
            emit_inlines(writer, inlines);
            writer.annotate(content_start, Attribute::Slant(FontSlant::Italic));
            writer.annotate(
                start,
                Attribute::HangingIndent(QUOTE_PREFIX.chars().count()),
            );
        }
        Block::CodeBlock { content } => {
            let start = writer.position();
            // Edge newlines would stack onto the block separator.
            writer.out.push_str(content.trim_matches('\n'));
            writer.annotate(start, Attribute::Monospace(writer.style.monospace.clone()));
            writer.annotate(start, Attribute::Color(writer.style.block_code_color));
        }
        Block::List {
            ordered,
            items,
            start_index,
        } => {
            let mut counter = *start_index;
            for item in items {
                if !writer.out.is_empty() && !writer.out.ends_with_newline() {
                    writer.out.push_str("\n");
                }
                let start = writer.position();
                let label = if *ordered {
                    let label = format!("{}. ", counter);
                    counter = counter.saturating_add(1);
                    label
                } else {
                    BULLET.to_string()
                };
                writer.out.push_str(&label);
                if !*ordered {
                    writer.annotate(start, Attribute::Weight(FontWeight::Bold));
                }
                emit_inlines(writer, item);
                writer.annotate(start, Attribute::HangingIndent(label.chars().count()));
            }
        }
        Block::HorizontalRule => writer.out.push_str(HORIZONTAL_RULE),
    }
}

fn emit_inlines(writer: &mut StyledWriter<'_>, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(value) => writer.out.push_str(value),
            Inline::Bold(children) => {
                let start = writer.position();
                emit_inlines(writer, children);
                writer.annotate(start, Attribute::Weight(FontWeight::Bold));
                writer.annotate(start, Attribute::Color(writer.style.bold_color));
            }
            Inline::Italic(children) => {
                let start = writer.position();
                emit_inlines(writer, children);
                writer.annotate(start, Attribute::Slant(FontSlant::Italic));
            }
            Inline::Code(value) => {
                let start = writer.position();
                writer.out.push_str(value);
                writer.annotate(start, Attribute::Monospace(writer.style.monospace.clone()));
                writer.annotate(start, Attribute::Color(writer.style.inline_code_color));
            }
            Inline::Link { label, url } => {
                let start = writer.position();
                emit_inlines(writer, label);
                writer.annotate(start, Attribute::Link(url.clone()));
                if let Some(color) = writer.style.link_color {
                    writer.annotate(start, Attribute::Color(color));
                }
            }
        }
    }
}
