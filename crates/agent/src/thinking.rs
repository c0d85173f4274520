//! Response post-processing for display.
//!
//! Models sometimes think out loud inside `<thinking>` tags. Those spans are
//! rewritten into a Markdown callout so the reasoning reads as an aside.

use praias_core::markup::{Segment, scan_tagged};

const THINKING_TAG: &str = "thinking";
const OPEN_TAG: &str = "<thinking>";
const CLOSE_TAG: &str = "</thinking>";

/// Replace each `<thinking>…</thinking>` span with a quoted callout.
///
/// Text without a complete tag pair is returned unchanged. Once a pair has
/// been rewritten no tag markup is left in the output, so applying this
/// twice gives the same result as applying it once.
pub fn annotate_thinking(text: &str) -> String {
    let segments = scan_tagged(text, THINKING_TAG);
    if !segments.iter().any(|s| matches!(s, Segment::Tagged(_))) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 32);
    for segment in segments {
        match segment {
            Segment::Plain(s) => out.push_str(&strip_tags(s)),
            Segment::Tagged(s) => {
                out.push_str("\n\n> **💭 Thinking:** ");
                out.push_str(strip_tags(s).trim());
                out.push_str("\n\n");
            }
        }
    }
    out
}

/// Drop stray open or close tags left over after pairing.
///
/// Removing one tag can splice its neighbours into a new one, so this
/// repeats until no tag remains.
fn strip_tags(s: &str) -> String {
    let mut out = s.to_string();
    while out.contains(OPEN_TAG) || out.contains(CLOSE_TAG) {
        out = out.replace(OPEN_TAG, "").replace(CLOSE_TAG, "");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_free_input_is_unchanged() {
        let text = "Yes. Praia da Luz should be fine at your time.  \n";
        assert_eq!(annotate_thinking(text), text);
        assert_eq!(annotate_thinking(""), "");
    }

    #[test]
    fn single_span_becomes_callout() {
        assert_eq!(
            annotate_thinking("<thinking>  red flag today </thinking>No. Try Praia da Torre."),
            "\n\n> **💭 Thinking:** red flag today\n\nNo. Try Praia da Torre."
        );
    }

    #[test]
    fn multiline_spans_are_matched_non_greedily() {
        let out = annotate_thinking("<thinking>a\nb</thinking>Maybe.<thinking>c</thinking> Done");
        assert_eq!(
            out,
            "\n\n> **💭 Thinking:** a\nb\n\nMaybe.\n\n> **💭 Thinking:** c\n\n Done"
        );
    }

    #[test]
    fn unterminated_tag_is_left_alone() {
        let text = "<thinking>never closed";
        assert_eq!(annotate_thinking(text), text);
    }

    #[test]
    fn other_tags_are_not_touched() {
        let text = "<think>x</think>Yes.";
        assert_eq!(annotate_thinking(text), text);
    }

    #[test]
    fn idempotent() {
        for text in [
            "plain",
            "<thinking>x</thinking>Yes.",
            "<thinking>a<thinking>b</thinking>c</thinking>",
            "before <thinking>x</thinking> after <thinking>dangling",
            "<thinking>a</thinking><thin</thinking>king>b</thin</thinking>king>",
        ] {
            let once = annotate_thinking(text);
            assert_eq!(annotate_thinking(&once), once, "input: {text:?}");
        }
    }

    #[test]
    fn spliced_tags_do_not_survive() {
        let out = annotate_thinking("<thinking>a</thinking><thin</thinking>king>b</thin</thinking>king>");
        assert_eq!(out, "\n\n> **💭 Thinking:** a\n\nb");
    }

    #[test]
    fn nested_tags_leave_no_markup() {
        let out = annotate_thinking("<thinking>a<thinking>b</thinking>c</thinking>");
        assert!(!out.contains(OPEN_TAG));
        assert!(!out.contains(CLOSE_TAG));
        assert_eq!(out, "\n\n> **💭 Thinking:** ab\n\nc");
    }
}
