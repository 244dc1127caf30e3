//! UniFFI bindings for linkspan mobile apps
//!
//! Lets the Android app tokenize Markdown-linked strings (terms and privacy
//! blurbs from string resources), hit-test clicks reported by the text
//! layout, and pull the code out of a retrieved OTP SMS.
//!
//! All offsets crossing this boundary are UTF-16 code units, which is what
//! Android text layout reports.

use linkspan_engine::{
    LinkClickHandler, LinkifyCache, Segment, TextUnit, rendered_text, resolve_link_at_in,
};
use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

uniffi::setup_scaffolding!();

const HANDLE_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(cap) => cap,
    None => NonZeroUsize::MIN,
};

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid segment: {reason}")]
    InvalidSegment { reason: String },
}

// ============ DTOs ============

/// A segment of linkified text.
///
/// `tag` and `target` are both set (and non-empty) for links and both null
/// for plain text.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct SegmentDto {
    pub text: String,
    pub tag: Option<String>,
    pub target: Option<String>,
}

impl SegmentDto {
    fn from_engine(segment: &Segment) -> Self {
        Self {
            text: segment.text.clone(),
            tag: segment.tag().map(str::to_string),
            target: segment.target().map(str::to_string),
        }
    }
}

impl TryFrom<SegmentDto> for Segment {
    type Error = FfiError;

    fn try_from(dto: SegmentDto) -> Result<Self, Self::Error> {
        match (dto.tag, dto.target) {
            (None, None) => Ok(Segment::plain(dto.text)),
            (Some(tag), _) if tag.is_empty() => Err(FfiError::InvalidSegment {
                reason: format!("segment {:?} has an empty tag", dto.text),
            }),
            (_, Some(target)) if target.is_empty() => Err(FfiError::InvalidSegment {
                reason: format!("segment {:?} has an empty target", dto.text),
            }),
            (Some(tag), Some(target)) => Ok(Segment::link(dto.text, tag, target)),
            (Some(_), None) => Err(FfiError::InvalidSegment {
                reason: format!("segment {:?} has a tag but no target", dto.text),
            }),
            (None, Some(_)) => Err(FfiError::InvalidSegment {
                reason: format!("segment {:?} has a target but no tag", dto.text),
            }),
        }
    }
}

// ============ Click Listener ============

/// Receives link clicks. Implemented on the Kotlin side.
#[uniffi::export(with_foreign)]
pub trait LinkClickListener: Send + Sync {
    fn on_link_clicked(&self, target: String, tag: String);
}

// ============ Linkified Text Handle ============

/// A linkified string bound to a click listener.
///
/// Mirrors a clickable text view: set the (possibly changing) input, render
/// `segments()`, and forward click offsets to `click()`.
#[derive(uniffi::Object)]
pub struct LinkifiedTextHandle {
    listener: Arc<dyn LinkClickListener>,
    cache: LinkifyCache,
    segments: Mutex<Arc<[Segment]>>,
}

#[uniffi::export]
impl LinkifiedTextHandle {
    #[uniffi::constructor]
    pub fn new(input: String, listener: Arc<dyn LinkClickListener>) -> Self {
        let cache = LinkifyCache::new(HANDLE_CACHE_CAPACITY);
        let segments = Mutex::new(cache.get_or_tokenize(&input));
        Self {
            listener,
            cache,
            segments,
        }
    }

    /// Switch to a different input, e.g. when a checkbox toggles the text.
    /// Inputs seen recently are not tokenized again.
    pub fn set_input(&self, input: String) {
        let segments = self.cache.get_or_tokenize(&input);
        // Recover from poisoned mutex (another thread panicked while holding lock)
        *self.segments.lock().unwrap_or_else(|e| e.into_inner()) = segments;
    }

    pub fn segments(&self) -> Vec<SegmentDto> {
        self.current_segments()
            .iter()
            .map(SegmentDto::from_engine)
            .collect()
    }

    /// The rendered text, with Markdown link syntax stripped.
    pub fn text(&self) -> String {
        rendered_text(&self.current_segments())
    }

    /// Handle a click at a UTF-16 caret offset.
    ///
    /// Notifies the listener and returns true if the offset is on a link.
    pub fn click(&self, offset: u32) -> bool {
        // Listener runs without the lock held so it may call back into us
        let segments = self.current_segments();
        let listener = Arc::clone(&self.listener);
        let mut handler =
            LinkClickHandler::with_unit(segments, TextUnit::Utf16, |target: &str, tag: &str| {
                listener.on_link_clicked(target.to_string(), tag.to_string());
            });

        match handler.click(offset as usize) {
            Some(click) => {
                log::debug!("Clicked on {} (tag: {})", click.target, click.tag);
                true
            }
            None => false,
        }
    }
}

impl LinkifiedTextHandle {
    fn current_segments(&self) -> Arc<[Segment]> {
        Arc::clone(&self.segments.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

// ============ Standalone Functions ============

/// Split text into plain and link segments.
#[uniffi::export]
pub fn linkify_markdown(input: String) -> Vec<SegmentDto> {
    linkspan_engine::linkify_markdown(&input)
        .iter()
        .map(SegmentDto::from_engine)
        .collect()
}

/// Find the link segment at a UTF-16 caret offset, optionally limited to one tag.
#[uniffi::export]
pub fn resolve_link_at(
    segments: Vec<SegmentDto>,
    tag: Option<String>,
    offset: u32,
) -> Result<Option<SegmentDto>, FfiError> {
    let segments = segments
        .into_iter()
        .map(Segment::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(
        resolve_link_at_in(&segments, tag.as_deref(), offset as usize, TextUnit::Utf16)
            .map(SegmentDto::from_engine),
    )
}

/// Pull the one-time password out of a retrieved SMS body.
#[uniffi::export]
pub fn extract_otp(message: String) -> Option<String> {
    linkspan_engine::extract_otp(&message).map(str::to_string)
}

/// Route `log` output to logcat on Android and stderr elsewhere.
/// Safe to call more than once.
#[uniffi::export]
pub fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("Linkspan"),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();
    }
}
