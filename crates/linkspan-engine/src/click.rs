use std::sync::Arc;

use crate::{
    resolve::{resolve_link_at_in, resolve_link_covering},
    segment::Segment,
    unit::TextUnit,
};

/// A click that resolved to a link.
///
/// Returned by [`LinkClickHandler::click`] so the caller can log or record
/// it; the engine itself never logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClick {
    pub offset: usize,
    pub tag: String,
    pub target: String,
}

/// Dispatches clicks on rendered text to a `(target, tag)` callback.
pub struct LinkClickHandler<F> {
    segments: Arc<[Segment]>,
    unit: TextUnit,
    on_link: F,
}

impl<F> LinkClickHandler<F>
where
    F: FnMut(&str, &str),
{
    /// Creates a handler counting offsets in chars.
    pub fn new(segments: impl Into<Arc<[Segment]>>, on_link: F) -> Self {
        Self::with_unit(segments, TextUnit::Chars, on_link)
    }

    pub fn with_unit(segments: impl Into<Arc<[Segment]>>, unit: TextUnit, on_link: F) -> Self {
        Self {
            segments: segments.into(),
            unit,
            on_link,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn unit(&self) -> TextUnit {
        self.unit
    }

    /// Replaces the segments clicks are resolved against.
    pub fn set_segments(&mut self, segments: impl Into<Arc<[Segment]>>) {
        self.segments = segments.into();
    }

    /// Handles a click at caret `offset`.
    ///
    /// Calls the callback once with `(target, tag)` if the offset lands on a
    /// link, and returns the click. Returns `None` and leaves the callback
    /// alone otherwise.
    pub fn click(&mut self, offset: usize) -> Option<LinkClick> {
        let segment = resolve_link_at_in(&self.segments, None, offset, self.unit)?;
        let link = segment.link.as_ref()?;
        (self.on_link)(&link.target, &link.tag);
        Some(LinkClick {
            offset,
            tag: link.tag.clone(),
            target: link.target.clone(),
        })
    }

    /// Handles a click on the glyph at `index`, as reported by hosts that
    /// hit-test cells rather than caret positions.
    pub fn click_glyph(&mut self, index: usize) -> Option<LinkClick> {
        let segment = resolve_link_covering(&self.segments, None, index, self.unit)?;
        let link = segment.link.as_ref()?;
        (self.on_link)(&link.target, &link.tag);
        Some(LinkClick {
            offset: index,
            tag: link.tag.clone(),
            target: link.target.clone(),
        })
    }
}
