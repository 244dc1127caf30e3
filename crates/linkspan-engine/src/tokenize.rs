use std::sync::OnceLock;

use regex::Regex;

use crate::segment::Segment;

fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"))
}

/// Splits `input` into plain and link segments at every `[label](target)`.
///
/// ## Emission pattern
///
/// - One plain segment before every link, even when it is empty
/// - One link segment per match, with `text` and `tag` both set to the label
/// - One trailing plain segment with the rest of the input (the whole input
///   when nothing matched)
///
/// Empty labels or targets (`[]`, `()`) never match, and there is no
/// escaping: the first `]` ends a label, the first `)` ends a target.
/// Anything that doesn't match stays in the plain text unchanged.
pub fn linkify_markdown(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in link_regex().captures_iter(input) {
        let (Some(full), Some(label), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        segments.push(Segment::plain(&input[cursor..full.start()]));
        segments.push(Segment::link(label.as_str(), label.as_str(), target.as_str()));
        cursor = full.end();
    }

    segments.push(Segment::plain(&input[cursor..]));
    segments
}

/// Rebuilds the Markdown source a segment sequence was tokenized from.
///
/// `to_markdown(&linkify_markdown(s)) == s` holds for every `s`.
pub fn to_markdown(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match &segment.link {
            Some(link) => {
                out.push('[');
                out.push_str(&segment.text);
                out.push_str("](");
                out.push_str(&link.target);
                out.push(')');
            }
            None => out.push_str(&segment.text),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_single_segment() {
        assert_eq!(
            linkify_markdown("Hello world"),
            vec![Segment::plain("Hello world")]
        );
    }

    #[test]
    fn empty_input_is_single_empty_segment() {
        assert_eq!(linkify_markdown(""), vec![Segment::plain("")]);
    }

    #[test]
    fn lone_link_is_wrapped_in_empty_plain_segments() {
        assert_eq!(
            linkify_markdown("[Terms](https://example.com/terms)"),
            vec![
                Segment::plain(""),
                Segment::link("Terms", "Terms", "https://example.com/terms"),
                Segment::plain(""),
            ]
        );
    }

    #[test]
    fn text_between_links_is_kept() {
        assert_eq!(
            linkify_markdown("See [A](u1) and [B](u2)."),
            vec![
                Segment::plain("See "),
                Segment::link("A", "A", "u1"),
                Segment::plain(" and "),
                Segment::link("B", "B", "u2"),
                Segment::plain("."),
            ]
        );
    }

    #[test]
    fn adjacent_links_get_empty_separator() {
        assert_eq!(
            linkify_markdown("[A](u1)[B](u2)"),
            vec![
                Segment::plain(""),
                Segment::link("A", "A", "u1"),
                Segment::plain(""),
                Segment::link("B", "B", "u2"),
                Segment::plain(""),
            ]
        );
    }

    #[test]
    fn empty_label_or_target_does_not_match() {
        assert_eq!(linkify_markdown("[]()"), vec![Segment::plain("[]()")]);
        assert_eq!(linkify_markdown("[x]()"), vec![Segment::plain("[x]()")]);
        assert_eq!(linkify_markdown("[](u)"), vec![Segment::plain("[](u)")]);
    }

    #[test]
    fn unbalanced_syntax_is_plain_text() {
        for input in ["[Terms(https://x)", "[Terms]", "[Terms](https://x", "Terms](x)"] {
            assert_eq!(linkify_markdown(input), vec![Segment::plain(input)]);
        }
    }

    #[test]
    fn closing_paren_in_target_ends_the_match() {
        assert_eq!(
            linkify_markdown("[Wiki](https://en.wikipedia.org/wiki/Rust_(language))"),
            vec![
                Segment::plain(""),
                Segment::link("Wiki", "Wiki", "https://en.wikipedia.org/wiki/Rust_(language"),
                Segment::plain(")"),
            ]
        );
    }

    #[test]
    fn stray_bracket_before_link_is_swallowed_into_label() {
        // `[^\]]+` happily consumes the second `[`
        assert_eq!(
            linkify_markdown("[a [b](u)"),
            vec![
                Segment::plain(""),
                Segment::link("a [b", "a [b", "u"),
                Segment::plain(""),
            ]
        );
    }

    #[test]
    fn label_may_span_lines() {
        assert_eq!(
            linkify_markdown("[two\nlines](u)"),
            vec![
                Segment::plain(""),
                Segment::link("two\nlines", "two\nlines", "u"),
                Segment::plain(""),
            ]
        );
    }

    #[test]
    fn same_label_shares_tag() {
        let segments = linkify_markdown("[x](a) [x](b)");
        assert_eq!(segments[1].tag(), segments[3].tag());
        assert_ne!(segments[1].target(), segments[3].target());
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        assert_eq!(
            linkify_markdown("Für [Bedingungen](https://example.com/agb) 😀"),
            vec![
                Segment::plain("Für "),
                Segment::link("Bedingungen", "Bedingungen", "https://example.com/agb"),
                Segment::plain(" 😀"),
            ]
        );
    }

    #[test]
    fn to_markdown_restores_source() {
        for input in [
            "",
            "Hello world",
            "[]()",
            "See [A](u1) and [B](u2).",
            "[A](u1)[B](u2)",
            "[Wiki](https://en.wikipedia.org/wiki/Rust_(language))",
            "[a [b](u) tail [",
        ] {
            assert_eq!(to_markdown(&linkify_markdown(input)), input);
        }
    }
}
