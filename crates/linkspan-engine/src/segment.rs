use serde::{Deserialize, Serialize};

use crate::unit::TextUnit;

/// Link data carried by a [`Segment`].
///
/// `tag` distinguishes the link for annotation lookups. It is the visible
/// label text, so two links with the same label share a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub tag: String,
    pub target: String,
}

impl Link {
    /// Whether both tag and target are non-empty. Only such links react to
    /// clicks or get annotated.
    pub fn is_clickable(&self) -> bool {
        !self.tag.is_empty() && !self.target.is_empty()
    }
}

/// One contiguous run of tokenized text, either plain or a link.
///
/// Tag and target live together in [`Link`], so a segment can never carry
/// one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// The text to display. May be empty for plain segments.
    pub text: String,
    /// Present iff this segment is a link.
    pub link: Option<Link>,
}

impl Segment {
    /// Creates a plain text segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    /// Creates a link segment.
    pub fn link(
        text: impl Into<String>,
        tag: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            link: Some(Link {
                tag: tag.into(),
                target: target.into(),
            }),
        }
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    pub fn tag(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.tag.as_str())
    }

    pub fn target(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.target.as_str())
    }

    /// Length of the rendered text measured in `unit`.
    #[must_use]
    pub fn len_in(&self, unit: TextUnit) -> usize {
        unit.len(&self.text)
    }
}

/// Concatenates the text of every segment, in order.
///
/// For segments produced by [`crate::linkify_markdown`] this reproduces the
/// display text (labels only, without Markdown syntax).
pub fn rendered_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segment_has_no_link_data() {
        let seg = Segment::plain("hello");
        assert!(!seg.is_link());
        assert_eq!(seg.tag(), None);
        assert_eq!(seg.target(), None);
    }

    #[test]
    fn link_segment_exposes_tag_and_target() {
        let seg = Segment::link("Terms", "Terms", "https://example.com/terms");
        assert!(seg.is_link());
        assert_eq!(seg.tag(), Some("Terms"));
        assert_eq!(seg.target(), Some("https://example.com/terms"));
    }

    #[test]
    fn link_needs_tag_and_target_to_be_clickable() {
        assert_eq!(Segment::link("a", "a", "u").link.map(|l| l.is_clickable()), Some(true));
        assert_eq!(Segment::link("a", "", "u").link.map(|l| l.is_clickable()), Some(false));
        assert_eq!(Segment::link("a", "a", "").link.map(|l| l.is_clickable()), Some(false));
    }

    #[test]
    fn len_in_counts_requested_unit() {
        let seg = Segment::plain("a😀");
        assert_eq!(seg.len_in(TextUnit::Chars), 2);
        assert_eq!(seg.len_in(TextUnit::Utf16), 3);
    }

    #[test]
    fn rendered_text_concatenates_in_order() {
        let segments = vec![
            Segment::plain("See "),
            Segment::link("A", "A", "u1"),
            Segment::plain("."),
        ];
        assert_eq!(rendered_text(&segments), "See A.");
    }

    #[test]
    fn rendered_text_of_nothing_is_empty() {
        assert_eq!(rendered_text(&[]), "");
    }
}
