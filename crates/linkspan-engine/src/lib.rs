//! # linkspan engine
//!
//! Turns text containing Markdown-style `[label](target)` links into an
//! ordered list of plain and link [`Segment`]s, and maps click offsets in the
//! rendered text back to the link under them.
//!
//! ## Modules
//!
//! - **`tokenize`**: `linkify_markdown()` splits text into segments
//! - **`resolve`**: `resolve_link_at()` hit-tests a caret offset
//! - **`annotated`**: rendered text plus link ranges for a renderer
//! - **`click`**: `LinkClickHandler` drives a `(target, tag)` callback
//! - **`cache`**: bounded memo of tokenized inputs
//! - **`otp`**: one-time password extraction from SMS bodies
//!
//! Everything here is pure and synchronous. Nothing logs; callers get a
//! [`LinkClick`] back and decide what to record.

pub mod annotated;
pub mod cache;
pub mod click;
pub mod otp;
pub mod resolve;
pub mod segment;
pub mod tokenize;
pub mod unit;

// Re-export key types for easier usage
pub use annotated::*;
pub use cache::*;
pub use click::*;
pub use otp::*;
pub use resolve::*;
pub use segment::*;
pub use tokenize::*;
pub use unit::*;
