//! Reading time estimate

use crate::content::post::ContentBlock;
use crate::content::richtext;

/// Default reading speed used for the estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimate reading time in minutes at the default speed
pub fn estimate_minutes(content: &[ContentBlock]) -> usize {
    estimate_minutes_at(content, WORDS_PER_MINUTE)
}

/// Estimate reading time in minutes at a configurable speed.
///
/// Concatenates every section's heading with the plain text of its body,
/// counts whitespace-separated tokens and rounds up. Empty content is 0
/// minutes, not an error.
pub fn estimate_minutes_at(content: &[ContentBlock], words_per_minute: usize) -> usize {
    let words: usize = content
        .iter()
        .map(|block| {
            block.heading.split_whitespace().count()
                + richtext::as_text(&block.body).split_whitespace().count()
        })
        .sum();

    words.div_ceil(words_per_minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::richtext::{Block, TextNode};

    fn section(heading: &str, words: usize) -> ContentBlock {
        ContentBlock {
            heading: heading.to_string(),
            body: vec![Block::Paragraph(TextNode {
                text: vec!["word"; words].join(" "),
                spans: Vec::new(),
            })],
        }
    }

    #[test]
    fn test_empty_content_is_zero() {
        assert_eq!(estimate_minutes(&[]), 0);
    }

    #[test]
    fn test_single_heading_plus_199_words_is_one_minute() {
        // "A" + 199 body words = 200 tokens, exactly one minute
        assert_eq!(estimate_minutes(&[section("A", 199)]), 1);
    }

    #[test]
    fn test_ceil_boundary() {
        // 201 tokens round up to two minutes
        assert_eq!(estimate_minutes(&[section("", 201)]), 2);
    }

    #[test]
    fn test_tokens_accumulate_across_sections() {
        let content = vec![section("Intro", 100), section("Outro", 150)];
        // 1 + 100 + 1 + 150 = 252 tokens
        assert_eq!(estimate_minutes(&content), 2);
    }

    #[test]
    fn test_custom_speed() {
        assert_eq!(estimate_minutes_at(&[section("", 100)], 50), 2);
    }
}
