//! Presenters for language-server hover and signature-help payloads.
//!
//! Both reduce a protocol payload to markdown, hand it to the renderer and
//! return styled text. Window placement and request lifecycles stay with the
//! host editor.

mod hover;
mod signature;

pub use hover::{hover_markdown, render_hover};
pub use lsp_types;
pub use signature::{SignatureNavigator, SignatureView, documentation_markdown, render_signature};
