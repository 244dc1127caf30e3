use std::{num::NonZeroUsize, sync::Arc};

use moka::{policy::EvictionPolicy, sync::Cache};

use crate::{segment::Segment, tokenize::linkify_markdown};

/// Bounded memo of [`linkify_markdown`] results keyed by input string.
///
/// Tokenizing is pure, so a hit returns the sequence computed earlier for
/// the identical string. When full, the least recently used entry goes.
/// Clones share the same entries and the cache can be used from any thread.
#[derive(Clone)]
pub struct LinkifyCache {
    cap: NonZeroUsize,
    inner: Cache<String, Arc<[Segment]>>,
}

impl std::fmt::Debug for LinkifyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkifyCache")
            .field("cap", &self.cap)
            .finish()
    }
}

impl LinkifyCache {
    pub fn new(cap: NonZeroUsize) -> Self {
        Self {
            cap,
            inner: Cache::builder()
                .max_capacity(cap.get() as u64)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.cap
    }

    /// Number of cached inputs, after applying pending evictions.
    pub fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.inner.iter().next().is_none()
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    /// Returns the segments for `input`, tokenizing on a miss.
    pub fn get_or_tokenize(&self, input: &str) -> Arc<[Segment]> {
        self.inner
            .get_with_by_ref(input, || linkify_markdown(input).into())
    }
}
