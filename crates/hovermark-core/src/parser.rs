use crate::ast::Block;
use crate::inline::{limit_newlines, parse_inlines};
use crate::normalize::normalize;

/// Normalizes `source` and splits it into blocks.
pub fn parse(source: &str) -> Vec<Block> {
    let normalized = normalize(source);
    parse_blocks(&normalized)
}

/// Splits already normalized text into blocks in document order.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let blocks = BlockParser { lines: &lines }.parse();
    tracing::trace!(lines = lines.len(), blocks = blocks.len(), "parsed blocks");
    blocks
}

struct BlockParser<'a> {
    lines: &'a [&'a str],
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ListMarker<'a> {
    ordered: bool,
    start: u64,
    content: &'a str,
}

impl<'a> BlockParser<'a> {
    fn parse(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < self.lines.len() {
            if self.lines[i].trim().is_empty() {
                i += 1;
                continue;
            }

            if let Some((block, next)) = self.parse_code_block(i) {
                blocks.push(block);
                i = next;
                continue;
            }

            if let Some((block, next)) = self.parse_heading(i) {
                blocks.push(block);
                i = next;
                continue;
            }

            if let Some((block, next)) = self.parse_horizontal_rule(i) {
                blocks.push(block);
                i = next;
                continue;
            }

            if let Some((block, next)) = self.parse_quote(i) {
                blocks.push(block);
                i = next;
                continue;
            }

            if let Some((block, next)) = self.parse_list(i) {
                blocks.push(block);
                i = next;
                continue;
            }

            let (block, next) = self.parse_paragraph(i);
            blocks.push(block);
            // A paragraph always consumes its first line.
            i = next.max(i + 1);
        }

        blocks
    }

    fn parse_code_block(&self, start: usize) -> Option<(Block, usize)> {
        let fence_len = fence_run(self.lines[start])?;
        let mut content: Vec<&str> = Vec::new();
        let mut i = start + 1;
        while i < self.lines.len() {
            let candidate = self.lines[i];
            if candidate.trim().starts_with(&"`".repeat(fence_len)) {
                i += 1;
                break;
            }
            content.push(candidate);
            i += 1;
        }
        Some((
            Block::CodeBlock {
                content: content.join("\n"),
            },
            i,
        ))
    }

    fn parse_heading(&self, start: usize) -> Option<(Block, usize)> {
        let (level, rest) = parse_atx_heading(self.lines[start])?;
        Some((
            Block::Heading {
                level,
                inlines: parse_inlines(rest),
            },
            start + 1,
        ))
    }

    fn parse_horizontal_rule(&self, start: usize) -> Option<(Block, usize)> {
        if !is_horizontal_rule(self.lines[start]) {
            return None;
        }
        Some((Block::HorizontalRule, start + 1))
    }

    fn parse_quote(&self, start: usize) -> Option<(Block, usize)> {
        quote_body(self.lines[start])?;
        let mut parts: Vec<&str> = Vec::new();
        let mut i = start;
        while i < self.lines.len() {
            let Some(body) = quote_body(self.lines[i]) else {
                break;
            };
            // Consecutive empty quote lines keep a single paragraph break.
            if !(body.is_empty() && parts.last().is_some_and(|last| last.is_empty())) {
                parts.push(body);
            }
            i += 1;
        }
        let joined = parts.join("\n");
        // Removed delimiters can leave newlines meeting across nodes.
        let mut inlines = parse_inlines(joined.trim());
        limit_newlines(&mut inlines);
        Some((Block::Quote { inlines }, i))
    }

    fn parse_list(&self, start: usize) -> Option<(Block, usize)> {
        let first = parse_list_marker(self.lines[start])?;
        let mut items = Vec::new();
        let mut i = start;

        while i < self.lines.len() {
            let Some(marker) = parse_list_marker(self.lines[i]) else {
                break;
            };
            if marker.ordered != first.ordered {
                break;
            }
            let mut text = marker.content.trim().to_string();
            i += 1;
            while i < self.lines.len() && is_continuation(self.lines[i]) {
                let extra = self.lines[i].trim();
                if !extra.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(extra);
                }
                i += 1;
            }
            items.push(parse_inlines(&text));
        }

        Some((
            Block::List {
                ordered: first.ordered,
                items,
                start_index: first.start,
            },
            i,
        ))
    }

    fn parse_paragraph(&self, start: usize) -> (Block, usize) {
        let mut parts: Vec<&str> = Vec::new();
        let mut i = start;
        while i < self.lines.len() {
            let line = self.lines[i];
            if line.trim().is_empty() {
                break;
            }
            if i > start && is_block_start(line) {
                break;
            }
            parts.push(line.trim());
            i += 1;
        }
        let joined = parts.join(" ");
        (
            Block::Paragraph {
                inlines: parse_inlines(&joined),
            },
            i,
        )
    }
}

fn is_block_start(line: &str) -> bool {
    fence_run(line).is_some()
        || parse_atx_heading(line).is_some()
        || is_horizontal_rule(line)
        || quote_body(line).is_some()
        || parse_list_marker(line).is_some()
}

/// Length of the opening backtick run, when the line opens a fence.
fn fence_run(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let run = trimmed.bytes().take_while(|b| *b == b'`').count();
    (run >= 3).then_some(run)
}

/// Heading level clamped to 1..=6 and the trimmed heading text.
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim_start();
    let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(|ch: char| ch.is_whitespace()) {
        return None;
    }
    let level = hashes.clamp(1, 6) as u8;
    Some((level, rest.trim()))
}

fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|ch| *ch != ' ' && *ch != '\t').collect();
    matches!(compact.as_str(), "***" | "---" | "___")
}

fn quote_body(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('>').map(str::trim)
}

fn parse_list_marker(line: &str) -> Option<ListMarker<'_>> {
    let trimmed = line.trim_start();
    let bytes = trimmed.as_bytes();
    let first = *bytes.first()?;

    if matches!(first, b'*' | b'-' | b'+') {
        let rest = &trimmed[1..];
        if !rest.starts_with(|ch: char| ch.is_whitespace()) {
            return None;
        }
        return Some(ListMarker {
            ordered: false,
            start: 1,
            content: rest,
        });
    }

    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || bytes.get(digits) != Some(&b'.') {
        return None;
    }
    let rest = &trimmed[digits + 1..];
    if !rest.starts_with(|ch: char| ch.is_whitespace()) {
        return None;
    }
    Some(ListMarker {
        ordered: true,
        start: trimmed[..digits].parse().unwrap_or(1),
        content: rest,
    })
}

fn is_continuation(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

#[cfg(test)]
mod tests {
    use super::{is_horizontal_rule, parse_atx_heading, parse_list_marker};

    #[test]
    fn heading_levels_clamp() {
        assert_eq!(parse_atx_heading("### Three"), Some((3, "Three")));
        assert_eq!(parse_atx_heading("######## Deep"), Some((6, "Deep")));
        assert_eq!(parse_atx_heading("#hashtag"), None);
    }

    #[test]
    fn horizontal_rules_ignore_spaces() {
        assert!(is_horizontal_rule("* * *"));
        assert!(is_horizontal_rule(" - - - "));
        assert!(is_horizontal_rule("___"));
        assert!(!is_horizontal_rule("----"));
        assert!(!is_horizontal_rule("-*-"));
    }

    #[test]
    fn list_marker_start_index() {
        let marker = parse_list_marker("7. seven").expect("ordered marker");
        assert!(marker.ordered);
        assert_eq!(marker.start, 7);

        let overflow = parse_list_marker("99999999999999999999999. big").expect("ordered marker");
        assert_eq!(overflow.start, 1);

        let bullet = parse_list_marker("+ plus").expect("bullet marker");
        assert!(!bullet.ordered);
        assert_eq!(bullet.start, 1);

        assert!(parse_list_marker("*emphasis*").is_none());
        assert!(parse_list_marker("3.14").is_none());
    }
}
