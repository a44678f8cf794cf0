//! Content module - display projections, rich text and reading time

mod post;
mod reading_time;
pub mod richtext;

pub use post::{ContentBlock, Post, PostDetail};
pub use reading_time::{estimate_minutes, estimate_minutes_at, WORDS_PER_MINUTE};
