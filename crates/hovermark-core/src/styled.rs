use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::span::Span;
use crate::style::{Color, FontHandle};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    Normal,
    Italic,
}

/// One style attribute carried by an annotation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Attribute {
    Color(Color),
    Weight(FontWeight),
    Slant(FontSlant),
    Monospace(FontHandle),
    RelativeSize(f32),
    Link(String),
    /// Continuation lines are indented by this many characters.
    HangingIndent(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annotation<'a> {
    pub range: Span,
    pub attribute: &'a Attribute,
}

/// Text buffer plus range annotations in insertion order.
///
/// Ranges and attributes are kept in two parallel arenas; index `i` of one
/// belongs to index `i` of the other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    char_len: usize,
    ranges: Vec<Span>,
    attributes: Vec<Attribute>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            ranges: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buffer length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn push_str(&mut self, value: &str) {
        self.text.push_str(value);
        self.char_len += value.chars().count();
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Appends an annotation. Empty or inverted spans and spans past the end
    /// of the buffer are ignored.
    pub fn annotate(&mut self, range: Span, attribute: Attribute) {
        if range.start >= range.end || range.end > self.char_len {
            return;
        }
        self.ranges.push(range);
        self.attributes.push(attribute);
    }

    pub fn ranges(&self) -> &[Span] {
        &self.ranges
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn annotations(&self) -> impl Iterator<Item = Annotation<'_>> + '_ {
        self.ranges
            .iter()
            .zip(&self.attributes)
            .map(|(range, attribute)| Annotation {
                range: *range,
                attribute,
            })
    }

    /// Text covered by a character span. Out-of-range ends are clamped.
    pub fn slice(&self, range: Span) -> &str {
        let offsets = self.byte_offsets();
        let start = offsets[range.start.min(self.char_len)];
        let end = offsets[range.end.min(self.char_len)];
        &self.text[start..end.max(start)]
    }

    /// Splits the buffer into non-overlapping runs with the annotations
    /// layered in insertion order. Adjacent runs with equal styles are merged.
    pub fn runs(&self) -> Vec<Run> {
        if self.char_len == 0 {
            return Vec::new();
        }
        let offsets = self.byte_offsets();
        let mut bounds = vec![0, self.char_len];
        for range in &self.ranges {
            bounds.push(range.start);
            bounds.push(range.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut by_start: Vec<usize> = (0..self.ranges.len()).collect();
        by_start.sort_by_key(|idx| self.ranges[*idx].start);
        let mut by_end = by_start.clone();
        by_end.sort_by_key(|idx| self.ranges[*idx].end);
        let (mut next_start, mut next_end) = (0, 0);
        // Indices of the annotations covering the current run, in insertion order.
        let mut active = BTreeSet::new();

        let mut runs: Vec<Run> = Vec::new();
        for pair in bounds.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            while let Some(&idx) = by_start.get(next_start)
                && self.ranges[idx].start <= start
            {
                active.insert(idx);
                next_start += 1;
            }
            while let Some(&idx) = by_end.get(next_end)
                && self.ranges[idx].end <= start
            {
                active.remove(&idx);
                next_end += 1;
            }
            let mut style = ResolvedStyle::default();
            for idx in &active {
                style.apply(&self.attributes[*idx]);
            }
            if let Some(last) = runs.last_mut()
                && last.style == style
            {
                last.range.end = end;
                last.bytes.end = offsets[end];
                continue;
            }
            runs.push(Run {
                range: Span { start, end },
                bytes: offsets[start]..offsets[end],
                style,
            });
        }
        runs
    }

    fn byte_offsets(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self.text.char_indices().map(|(idx, _)| idx).collect();
        offsets.push(self.text.len());
        offsets
    }
}

impl Serialize for StyledText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            start: usize,
            end: usize,
            attribute: &'a Attribute,
        }

        let annotations: Vec<Entry<'_>> = self
            .annotations()
            .map(|annotation| Entry {
                start: annotation.range.start,
                end: annotation.range.end,
                attribute: annotation.attribute,
            })
            .collect();
        let mut state = serializer.serialize_struct("StyledText", 2)?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("annotations", &annotations)?;
        state.end()
    }
}

/// A maximal stretch of text sharing one resolved style.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub range: Span,
    pub bytes: Range<usize>,
    pub style: ResolvedStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub color: Option<Color>,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub monospace: Option<FontHandle>,
    pub relative_size: f32,
    pub link: Option<String>,
    pub hanging_indent: Option<usize>,
}

impl ResolvedStyle {
    fn apply(&mut self, attribute: &Attribute) {
        match attribute {
            Attribute::Color(color) => self.color = Some(*color),
            Attribute::Weight(weight) => self.weight = *weight,
            Attribute::Slant(slant) => self.slant = *slant,
            Attribute::Monospace(font) => self.monospace = Some(font.clone()),
            Attribute::RelativeSize(size) => self.relative_size = *size,
            Attribute::Link(url) => self.link = Some(url.clone()),
            Attribute::HangingIndent(width) => self.hanging_indent = Some(*width),
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            color: None,
            weight: FontWeight::Normal,
            slant: FontSlant::Normal,
            monospace: None,
            relative_size: 1.0,
            link: None,
            hanging_indent: None,
        }
    }
}
