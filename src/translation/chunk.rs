/*!
 * Token estimation and paragraph chunking.
 *
 * The estimator is a deterministic heuristic used only to size translation
 * requests; it is never load-bearing for correctness. The chunker partitions
 * paragraphs into ordered batches under a paragraph-count cap and a token
 * budget, without ever dropping, splitting, or reordering a paragraph.
 */

use crate::document_processor::Paragraph;

/// Fixed safety margin added to every estimate
const ESTIMATE_MARGIN: usize = 10;

/// Estimate the token cost of a text span.
///
/// CJK ideographs weigh in at ~1.5 tokens per character, everything else at
/// ~0.25. Conservative on purpose so chunks stay under provider limits.
pub fn estimate_tokens(text: &str) -> usize {
    let wide = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count();
    let narrow = text.chars().count() - wide;

    (wide as f64 * 1.5 + narrow as f64 * 0.25).round() as usize + ESTIMATE_MARGIN
}

/// Paragraph chunker respecting a count cap and a token budget
pub struct Chunker {
    /// Maximum paragraphs per chunk
    max_paragraphs: usize,

    /// Maximum estimated tokens per chunk
    max_tokens: usize,
}

impl Chunker {
    /// Create a chunker with the given caps
    pub fn new(max_paragraphs: usize, max_tokens: usize) -> Self {
        Self {
            max_paragraphs,
            max_tokens,
        }
    }

    /// Partition paragraphs into ordered chunks of (index, paragraph) pairs.
    ///
    /// Chunks are non-overlapping, ordered, and exhaustive. A single
    /// paragraph whose own estimate exceeds the budget still lands alone in
    /// its own chunk; paragraphs are never split.
    pub fn chunk<'a>(&self, paragraphs: &'a [Paragraph]) -> Vec<Vec<(usize, &'a Paragraph)>> {
        let mut chunks = Vec::new();
        let mut current: Vec<(usize, &Paragraph)> = Vec::new();
        let mut current_tokens = 0usize;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let paragraph_tokens = estimate_tokens(&paragraph.text());

            let over_count = current.len() >= self.max_paragraphs;
            let over_budget =
                !current.is_empty() && current_tokens + paragraph_tokens > self.max_tokens;

            if over_count || over_budget {
                chunks.push(std::mem::take(&mut current));
                current_tokens = 0;
            }

            current.push((index, paragraph));
            current_tokens += paragraph_tokens;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}
