use crate::ast::{Inline, InlineSeq};

/// Nesting depth past which delimiters are no longer interpreted.
pub const MAX_NESTING: usize = 64;

const SPECIAL: &[u8] = b"`*_[";

/// Tokenizes a block's text into inline nodes.
pub fn parse_inlines(text: &str) -> InlineSeq {
    parse_nested(text, 0)
}

fn parse_nested(text: &str, depth: usize) -> InlineSeq {
    if depth >= MAX_NESTING {
        tracing::debug!(depth, len = text.len(), "inline nesting limit reached");
        return finalize(vec![Inline::text(text)]);
    }

    let bytes = text.as_bytes();
    let partners = if bytes.contains(&b'[') {
        match_brackets(bytes)
    } else {
        Vec::new()
    };
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let parsed = parse_code_span(text, i)
            .or_else(|| parse_emphasis(text, i, depth))
            .or_else(|| parse_link(text, i, depth, &partners));
        if let Some((inline, next)) = parsed {
            out.push(inline);
            i = next;
            continue;
        }
        // Consume at least the current byte so an unmatched delimiter
        // becomes literal text.
        let next = next_special(bytes, i + 1);
        out.push(Inline::text(&text[i..next]));
        i = next;
    }
    finalize(out)
}

fn next_special(bytes: &[u8], from: usize) -> usize {
    bytes
        .iter()
        .skip(from)
        .position(|b| SPECIAL.contains(b))
        .map_or(bytes.len(), |offset| from + offset)
}

fn parse_code_span(text: &str, start: usize) -> Option<(Inline, usize)> {
    if text.as_bytes().get(start) != Some(&b'`') {
        return None;
    }
    let body_start = start + 1;
    let len = text[body_start..].find('`')?;
    if len == 0 {
        return None;
    }
    let body_end = body_start + len;
    Some((Inline::Code(text[body_start..body_end].to_string()), body_end + 1))
}

fn parse_emphasis(text: &str, start: usize, depth: usize) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    let ch = *bytes.get(start)?;
    if ch != b'*' && ch != b'_' {
        return None;
    }
    let run = bytes[start..].iter().take_while(|b| **b == ch).count();

    if run >= 2 {
        let delimiter = &text[start..start + 2];
        if let Some((body, next)) = delimited(text, start + 2, delimiter) {
            return Some((Inline::Bold(parse_nested(body, depth + 1)), next));
        }
    }

    let delimiter = &text[start..start + 1];
    let (body, next) = delimited(text, start + 1, delimiter)?;
    Some((Inline::Italic(parse_nested(body, depth + 1)), next))
}

/// Non-empty body up to the nearest later `delimiter`, and the offset past it.
fn delimited<'a>(text: &'a str, body_start: usize, delimiter: &str) -> Option<(&'a str, usize)> {
    let len = text[body_start..].find(delimiter)?;
    if len == 0 {
        return None;
    }
    let body_end = body_start + len;
    Some((&text[body_start..body_end], body_end + delimiter.len()))
}

fn parse_link(
    text: &str,
    start: usize,
    depth: usize,
    partners: &[Option<usize>],
) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'[') {
        return None;
    }
    let partner = |open: usize| partners.get(open).copied().flatten();
    let label_end = partner(start)?;
    if bytes.get(label_end + 1) != Some(&b'(') {
        return None;
    }
    let url_end = partner(label_end + 1)?;
    let label = &text[start + 1..label_end];
    let url = text[label_end + 2..url_end].trim();
    Some((
        Inline::Link {
            label: parse_nested(label, depth + 1),
            url: url.to_string(),
        },
        url_end + 1,
    ))
}

/// Offset of the balancing `]` for every `[` and of the balancing `)` for
/// every `(`, found in one pass. Each bracket kind nests independently.
fn match_brackets(bytes: &[u8]) -> Vec<Option<usize>> {
    let mut partners = vec![None; bytes.len()];
    let mut squares = Vec::new();
    let mut parens = Vec::new();
    for (idx, b) in bytes.iter().enumerate() {
        match b {
            b'[' => squares.push(idx),
            b'(' => parens.push(idx),
            b']' => {
                if let Some(open) = squares.pop() {
                    partners[open] = Some(idx);
                }
            }
            b')' => {
                if let Some(open) = parens.pop() {
                    partners[open] = Some(idx);
                }
            }
            _ => {}
        }
    }
    partners
}

/// Caps newline runs at two across node boundaries and drops the trailing
/// newlines of the last visible node.
pub(crate) fn limit_newlines(inlines: &mut InlineSeq) {
    let mut run = 0;
    cap_newline_runs(inlines, &mut run);
    trim_trailing_newlines(inlines);
    drop_empty_text(inlines);
}

fn drop_empty_text(inlines: &mut InlineSeq) {
    inlines.retain(|inline| !matches!(inline, Inline::Text(value) if value.is_empty()));
    for inline in inlines {
        match inline {
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Link {
                label: children, ..
            } => drop_empty_text(children),
            Inline::Text(_) | Inline::Code(_) => {}
        }
    }
}

fn cap_newline_runs(inlines: &mut [Inline], run: &mut usize) {
    for inline in inlines {
        match inline {
            Inline::Text(value) | Inline::Code(value) => value.retain(|ch| {
                if ch == '\n' {
                    *run += 1;
                    *run <= 2
                } else {
                    *run = 0;
                    true
                }
            }),
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Link {
                label: children, ..
            } => cap_newline_runs(children, run),
        }
    }
}

/// True once a node with text other than newlines was reached.
fn trim_trailing_newlines(inlines: &mut [Inline]) -> bool {
    for inline in inlines.iter_mut().rev() {
        let reached = match inline {
            Inline::Text(value) | Inline::Code(value) => {
                let kept = value.trim_end_matches('\n').len();
                value.truncate(kept);
                !value.is_empty()
            }
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Link {
                label: children, ..
            } => trim_trailing_newlines(children),
        };
        if reached {
            return true;
        }
    }
    false
}

/// Merges adjacent text nodes and drops empty ones.
fn finalize(nodes: InlineSeq) -> InlineSeq {
    let mut out: InlineSeq = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(value) if value.is_empty() => {}
            Inline::Text(value) => {
                if let Some(Inline::Text(prev)) = out.last_mut() {
                    prev.push_str(&value);
                } else {
                    out.push(Inline::Text(value));
                }
            }
            other => out.push(other),
        }
    }
    out
}
