mod ast;
mod cache;
mod emit;
mod inline;
mod normalize;
mod parser;
mod span;
mod style;
mod styled;

pub use ast::{Block, Inline, InlineSeq};
pub use cache::ParseCache;
pub use emit::{BLOCK_SEPARATOR, BULLET, HORIZONTAL_RULE, QUOTE_PREFIX, build, render};
pub use inline::{MAX_NESTING, parse_inlines};
pub use normalize::normalize;
pub use parser::{parse, parse_blocks};
pub use span::{Span, SpanError};
pub use style::{Color, ColorParseError, DEFAULT_HEADING_SCALE, FontHandle, StyleConfig};
pub use styled::{
    Annotation, Attribute, FontSlant, FontWeight, ResolvedStyle, Run, StyledText,
};
