use crate::{segment::Segment, unit::TextUnit};

/// Returns the link segment rendered at `offset`, counted in chars.
///
/// See [`resolve_link_at_in`].
pub fn resolve_link_at<'a>(
    segments: &'a [Segment],
    tag: Option<&str>,
    offset: usize,
) -> Option<&'a Segment> {
    resolve_link_at_in(segments, tag, offset, TextUnit::Chars)
}

/// Returns the link segment rendered at `offset`.
///
/// Segments are laid out back to back in the rendered string. `offset` is a
/// caret position from the host's hit test, so a link occupying `start..end`
/// answers for every offset in `start..=end`; a click on the right half of
/// its last glyph lands on `end`. Segments are scanned in order and the
/// first link that contains the offset wins.
///
/// When `tag` is given only links carrying exactly that tag qualify. Tags
/// are label text and may repeat; the offset is what picks the occurrence.
/// Links with an empty tag or target are never clickable.
pub fn resolve_link_at_in<'a>(
    segments: &'a [Segment],
    tag: Option<&str>,
    offset: usize,
    unit: TextUnit,
) -> Option<&'a Segment> {
    find_link(segments, tag, unit, |start, end| (start..=end).contains(&offset))
}

/// Returns the link segment drawing the glyph at `index`.
///
/// Unlike [`resolve_link_at_in`], `index` names a glyph rather than a caret
/// position, so a link occupying `start..end` only answers for `start..end`.
/// Use this when the host reports the cell under the pointer.
pub fn resolve_link_covering<'a>(
    segments: &'a [Segment],
    tag: Option<&str>,
    index: usize,
    unit: TextUnit,
) -> Option<&'a Segment> {
    find_link(segments, tag, unit, |start, end| (start..end).contains(&index))
}

fn find_link<'a>(
    segments: &'a [Segment],
    tag: Option<&str>,
    unit: TextUnit,
    hit: impl Fn(usize, usize) -> bool,
) -> Option<&'a Segment> {
    let mut start = 0;
    for segment in segments {
        let end = start + segment.len_in(unit);
        if let Some(link) = &segment.link
            && link.is_clickable()
            && tag.is_none_or(|t| t == link.tag)
            && hit(start, end)
        {
            return Some(segment);
        }
        start = end;
    }
    None
}
