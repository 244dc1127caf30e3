use std::ops::Range;

use serde::Serialize;

use crate::{segment::Segment, unit::TextUnit};

/// A link's position in an [`AnnotatedText`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAnnotation {
    /// Range of the link text, in the unit the text was built with.
    pub range: Range<usize>,
    pub tag: String,
    pub target: String,
}

impl LinkAnnotation {
    /// Whether this annotation intersects the query `[start, end)`.
    ///
    /// A zero-length query is a caret position and matches the annotation's
    /// closed range, the same rule [`crate::resolve_link_at`] uses.
    fn intersects(&self, start: usize, end: usize) -> bool {
        if start == end {
            self.range.start <= start && start <= self.range.end
        } else {
            self.range.start.max(start) < self.range.end.min(end)
        }
    }
}

/// Rendered text plus the ranges of its links.
///
/// This is what a renderer needs to draw the text once and underline or
/// colour the annotated ranges. Styling is left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedText {
    pub text: String,
    pub annotations: Vec<LinkAnnotation>,
    pub unit: TextUnit,
}

impl AnnotatedText {
    /// Builds the annotated text from a segment sequence.
    ///
    /// Plain segments are appended as-is. Link segments are appended and get
    /// an annotation covering exactly their text. A link with an empty tag or
    /// target is treated as plain text.
    pub fn from_segments(segments: &[Segment], unit: TextUnit) -> Self {
        let mut text = String::new();
        let mut annotations = Vec::new();
        let mut len = 0;

        for segment in segments {
            text.push_str(&segment.text);
            let start = len;
            len += segment.len_in(unit);

            let Some(link) = &segment.link else { continue };
            if !link.is_clickable() {
                continue;
            }
            annotations.push(LinkAnnotation {
                range: start..len,
                tag: link.tag.clone(),
                target: link.target.clone(),
            });
        }

        Self {
            text,
            annotations,
            unit,
        }
    }

    /// Length of the rendered text in this text's unit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.unit.len(&self.text)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Annotations intersecting `[start, end)`, optionally limited to `tag`.
    pub fn annotations_at<'a>(
        &'a self,
        tag: Option<&'a str>,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &'a LinkAnnotation> + 'a {
        self.annotations
            .iter()
            .filter(move |a| tag.is_none_or(|t| t == a.tag))
            .filter(move |a| a.intersects(start, end))
    }

    /// The first annotation at a caret position.
    pub fn link_at(&self, offset: usize) -> Option<&LinkAnnotation> {
        self.annotations_at(None, offset, offset).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkify_markdown;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_text_and_link_ranges() {
        let segments = linkify_markdown("See [A](u1) and [B](u2).");
        let annotated = AnnotatedText::from_segments(&segments, TextUnit::Chars);

        assert_eq!(annotated.text, "See A and B.");
        assert_eq!(
            annotated.annotations,
            vec![
                LinkAnnotation {
                    range: 4..5,
                    tag: "A".to_string(),
                    target: "u1".to_string(),
                },
                LinkAnnotation {
                    range: 10..11,
                    tag: "B".to_string(),
                    target: "u2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn plain_text_has_no_annotations() {
        let annotated = AnnotatedText::from_segments(&linkify_markdown("Hello"), TextUnit::Chars);
        assert_eq!(annotated.text, "Hello");
        assert!(annotated.annotations.is_empty());
        assert_eq!(annotated.len(), 5);
    }

    #[test]
    fn links_with_empty_data_render_as_plain() {
        let segments = vec![
            Segment::link("a", "", "u"),
            Segment::link("b", "b", ""),
            Segment::plain("c"),
        ];
        let annotated = AnnotatedText::from_segments(&segments, TextUnit::Chars);
        assert_eq!(annotated.text, "abc");
        assert!(annotated.annotations.is_empty());
    }

    #[test]
    fn utf16_ranges_shift_after_astral_chars() {
        let segments = linkify_markdown("😀😀[A](u)");
        let chars = AnnotatedText::from_segments(&segments, TextUnit::Chars);
        let utf16 = AnnotatedText::from_segments(&segments, TextUnit::Utf16);
        assert_eq!(chars.annotations[0].range, 2..3);
        assert_eq!(utf16.annotations[0].range, 4..5);
        assert_eq!(utf16.len(), 5);
    }

    #[test]
    fn point_query_matches_closed_range() {
        let annotated = AnnotatedText::from_segments(
            &linkify_markdown("See [A](u1) and [B](u2)."),
            TextUnit::Chars,
        );
        assert_eq!(annotated.link_at(4).map(|a| a.target.as_str()), Some("u1"));
        assert_eq!(annotated.link_at(5).map(|a| a.target.as_str()), Some("u1"));
        assert!(annotated.link_at(6).is_none());
    }

    #[test]
    fn range_query_is_half_open() {
        let annotated = AnnotatedText::from_segments(
            &linkify_markdown("See [A](u1) and [B](u2)."),
            TextUnit::Chars,
        );
        assert_eq!(annotated.annotations_at(None, 0, 12).count(), 2);
        assert_eq!(annotated.annotations_at(None, 5, 10).count(), 0);
        assert_eq!(annotated.annotations_at(None, 0, 5).count(), 1);
    }

    #[test]
    fn tag_filter_applies() {
        let annotated = AnnotatedText::from_segments(
            &linkify_markdown("[x](a) [y](b) [x](c)"),
            TextUnit::Chars,
        );
        let targets: Vec<_> = annotated
            .annotations_at(Some("x"), 0, annotated.len())
            .map(|a| a.target.as_str())
            .collect();
        assert_eq!(targets, vec!["a", "c"]);
    }
}
