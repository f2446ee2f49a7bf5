//! HTML-subset to markdown pre-pass.
//!
//! Only a fixed set of tags is translated; anything else, including
//! malformed or unmatched tags, is left in the text untouched. The rewrite
//! rules run in a fixed order and later rules rely on the earlier ones.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("hardcoded normalizer pattern is valid")
}

/// Body capture for a paired tag `name`, attributes allowed on the opener.
fn paired_tag(name: &str) -> Regex {
    pattern(&format!(r"(?is)<{name}(?:\s[^>]*)?>(.*?)</{name}\s*>"))
}

static BREAK: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)<br\s*/?>"));
static HEADINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    (1..=6)
        .map(|level| paired_tag(&format!("h{level}")))
        .collect()
});
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| paired_tag("blockquote"));
static STRONG: Lazy<Regex> = Lazy::new(|| paired_tag("strong"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| paired_tag("em"));
static CODE: Lazy<Regex> = Lazy::new(|| paired_tag("code"));
static PRE: Lazy<Regex> = Lazy::new(|| paired_tag("pre"));
static PRE_CODE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?is)\A\s*<code(?:\s[^>]*)?>(.*?)</code\s*>\s*\z"));
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?is)\s*<li(?:\s[^>]*)?>(.*?)</li\s*>"));
static LIST_WRAPPER: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)</?[ou]l(?:\s[^>]*)?>"));
static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    pattern(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
});
static PARAGRAPH_OPEN: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)<p(?:\s[^>]*)?>"));
static PARAGRAPH_CLOSE: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)</p\s*>"));
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| pattern(r"\n{3,}"));

const ENTITIES: [(&str, &str); 4] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // Last, so `&amp;lt;` decodes to `&lt;` and not `<`.
    ("&amp;", "&"),
];

/// Rewrites the supported HTML constructs into markdown.
pub fn normalize(source: &str) -> String {
    let mut text = source.replace("\r\n", "\n").replace('\r', "\n");

    text = replace(&BREAK, &text, |_| "\n".to_string());
    for (idx, heading) in HEADINGS.iter().enumerate() {
        text = replace(heading, &text, |caps| {
            format!("{} {}", "#".repeat(idx + 1), caps[1].trim())
        });
    }
    text = replace(&BLOCKQUOTE, &text, |caps| format!("> {}", caps[1].trim()));

    text = replace(&STRONG, &text, |caps| format!("**{}**", &caps[1]));
    text = replace(&EMPHASIS, &text, |caps| format!("*{}*", &caps[1]));
    text = replace(&PRE, &text, |caps| {
        let body = match PRE_CODE.captures(&caps[1]) {
            Some(inner) => inner[1].to_string(),
            None => caps[1].to_string(),
        };
        format!("\n```\n{}\n```\n", body)
    });
    text = replace(&CODE, &text, |caps| format!("`{}`", &caps[1]));

    text = replace(&LIST_ITEM, &text, |caps| format!("\n- {}", caps[1].trim()));
    text = LIST_WRAPPER.replace_all(&text, "").into_owned();

    text = replace(&ANCHOR, &text, |caps| format!("[{}]({})", &caps[2], &caps[1]));

    text = PARAGRAPH_OPEN.replace_all(&text, "").into_owned();
    text = PARAGRAPH_CLOSE.replace_all(&text, "\n\n").into_owned();

    for (entity, decoded) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, decoded);
        }
    }

    let collapsed = BLANK_RUN.replace_all(&text, "\n\n");
    collapsed.trim().to_string()
}

fn replace(re: &Regex, text: &str, rewrite: impl Fn(&Captures<'_>) -> String) -> String {
    match re.replace_all(text, |caps: &Captures<'_>| rewrite(caps)) {
        Cow::Borrowed(_) => text.to_string(),
        Cow::Owned(out) => out,
    }
}
