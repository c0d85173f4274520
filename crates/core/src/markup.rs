//! Single-pass scanner for inline `<tag>…</tag>` markup in model output.
//!
//! Models that "think out loud" wrap their reasoning in a tag pair. Both the
//! reasoning-extraction middleware and the display post-processor need to
//! split text on such pairs, so the scanner lives here.
//!
//! Matching is non-greedy: each open tag pairs with the nearest following
//! close tag, and the span may cross lines. An open tag with no close tag is
//! left in place as plain text.

/// A piece of scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any tag pair, verbatim.
    Plain(&'a str),
    /// The interior of a tag pair, untrimmed and without the tags.
    Tagged(&'a str),
}

/// Split `text` into plain and tagged segments for `<tag>…</tag>`.
///
/// Concatenating the segments (with tags re-added around `Tagged` ones)
/// reproduces the input exactly. Empty plain runs are not emitted.
pub fn scan_tagged<'a>(text: &'a str, tag: &str) -> Vec<Segment<'a>> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(&open) {
        let inner_start = start + open.len();
        let Some(len) = rest[inner_start..].find(&close) else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Plain(&rest[..start]));
        }
        segments.push(Segment::Tagged(&rest[inner_start..inner_start + len]));
        rest = &rest[inner_start + len + close.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Plain(rest));
    }
    segments
}

/// True when `text` contains at least one complete `<tag>…</tag>` pair.
pub fn has_tagged(text: &str, tag: &str) -> bool {
    scan_tagged(text, tag)
        .iter()
        .any(|s| matches!(s, Segment::Tagged(_)))
}
