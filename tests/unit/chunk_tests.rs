/*!
 * Tests for token estimation and paragraph chunking
 */

use doctran::translation::chunk::{estimate_tokens, Chunker};

use crate::common::plain_paragraphs;

/// Test the estimate for empty text is just the margin
#[test]
fn test_estimateTokens_withEmptyText_shouldReturnMargin() {
    assert_eq!(estimate_tokens(""), 10);
}

/// Test the estimate for plain ASCII text
#[test]
fn test_estimateTokens_withNarrowText_shouldWeighQuarterToken() {
    // 5 narrow chars: round(1.25) = 1, plus margin
    assert_eq!(estimate_tokens("Hello"), 11);
}

/// Test the estimate for mixed CJK and ASCII text
#[test]
fn test_estimateTokens_withMixedText_shouldRoundHalfUp() {
    // 2 wide + 2 narrow: round(3.0 + 0.5) = 4, plus margin
    assert_eq!(estimate_tokens("你好ab"), 14);
}

/// Test that the paragraph-count cap splits chunks
#[test]
fn test_chunk_withCountCap_shouldSplitAtCap() {
    let paragraphs = plain_paragraphs(&["a", "b", "c", "d", "e"]);
    let chunker = Chunker::new(2, 10_000);

    let chunks = chunker.chunk(&paragraphs);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
}

/// Test that the token budget splits chunks
#[test]
fn test_chunk_withTokenBudget_shouldFlushBeforeOverflow() {
    // Each "Hello" estimates to 11 tokens; budget of 25 fits two
    let paragraphs = plain_paragraphs(&["Hello", "Hello", "Hello", "Hello"]);
    let chunker = Chunker::new(100, 25);

    let chunks = chunker.chunk(&paragraphs);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![2, 2]);
}

/// Test that an oversized paragraph still lands alone in its own chunk
#[test]
fn test_chunk_withOversizedParagraph_shouldPlaceItAlone() {
    let long_text = "x".repeat(200);
    let paragraphs = plain_paragraphs(&["Hello", &long_text, "Hello"]);
    let chunker = Chunker::new(100, 12);

    let chunks = chunker.chunk(&paragraphs);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].len(), 1);
    assert_eq!(chunks[1][0].0, 1);
}

/// Test that chunking is exhaustive and order-preserving
#[test]
fn test_chunk_withManyParagraphs_shouldBeExhaustiveAndOrdered() {
    let texts: Vec<String> = (0..23).map(|i| format!("paragraph {}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
    let paragraphs = plain_paragraphs(&refs);

    let chunker = Chunker::new(4, 60);
    let chunks = chunker.chunk(&paragraphs);

    let indices: Vec<usize> = chunks
        .iter()
        .flat_map(|chunk| chunk.iter().map(|&(index, _)| index))
        .collect();
    let expected: Vec<usize> = (0..23).collect();
    assert_eq!(indices, expected);
}

/// Test that a single paragraph produces a single chunk
#[test]
fn test_chunk_withOneParagraph_shouldProduceOneChunk() {
    let paragraphs = plain_paragraphs(&["only"]);
    let chunker = Chunker::new(10, 2000);

    let chunks = chunker.chunk(&paragraphs);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 1);
}

/// Test that no paragraphs yields no chunks
#[test]
fn test_chunk_withNoParagraphs_shouldProduceNoChunks() {
    let chunker = Chunker::new(10, 2000);
    let chunks = chunker.chunk(&[]);
    assert!(chunks.is_empty());
}
