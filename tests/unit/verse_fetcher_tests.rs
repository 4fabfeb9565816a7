/*!
 * Tests for verse reference detection and passage parsing
 */

use doctran::verse_fetcher::{format_verse_table, parse_passage_html, VerseFetcher};

fn fetcher() -> VerseFetcher {
    VerseFetcher::new("CCB", "https://example.invalid/passage/")
}

/// Test detection of common reference shapes
#[test]
fn test_detectReferences_withVariousShapes_shouldMatchAll() {
    let text = "See John 3:16 and 1 Corinthians 13:4-7, also Psalm 23:1-6.";
    let references = fetcher().detect_references(text);

    assert_eq!(
        references,
        vec!["John 3:16", "1 Corinthians 13:4-7", "Psalm 23:1-6"]
    );
}

/// Test case-insensitive deduplication keeping first occurrence
#[test]
fn test_detectReferences_withDuplicates_shouldKeepFirstOccurrence() {
    let text = "John 3:16 is quoted later as john 3:16 again.";
    let references = fetcher().detect_references(text);

    assert_eq!(references, vec!["John 3:16"]);
}

/// Test whitespace normalization inside references
#[test]
fn test_detectReferences_withExtraWhitespace_shouldNormalize() {
    let text = "Compare 1   Corinthians 13:4 with the rest.";
    let references = fetcher().detect_references(text);

    assert_eq!(references, vec!["1 Corinthians 13:4"]);
}

/// Test that plain numbers and non-book words do not match
#[test]
fn test_detectReferences_withNoReferences_shouldReturnEmpty() {
    let text = "Meeting at 3:16 pm in room 13:4.";
    assert!(fetcher().detect_references(text).is_empty());
}

/// Test passage extraction skips verse and chapter number labels
#[test]
fn test_parsePassageHtml_withNumberLabels_shouldSkipThem() {
    let html = r#"<html><body>
      <div class="passage-text">
        <p>
          <span class="text John-3-16"><sup class="versenum">16</sup>For God so loved the world</span>
          <span class="text John-3-17"><sup class="versenum">17</sup>For God did not send his Son</span>
        </p>
      </div>
    </body></html>"#;

    let passage = parse_passage_html(html).unwrap();
    assert_eq!(
        passage,
        "For God so loved the world For God did not send his Son"
    );
}

/// Test that chapter number labels are skipped too
#[test]
fn test_parsePassageHtml_withChapterNumber_shouldSkipIt() {
    let html = r#"<div class="passage-text">
      <span class="text"><span class="chapternum">3</span>In those days</span>
    </div>"#;

    assert_eq!(parse_passage_html(html).unwrap(), "In those days");
}

/// Test that a page without a passage container yields nothing
#[test]
fn test_parsePassageHtml_withNoPassage_shouldReturnNone() {
    let html = "<html><body><p>No results found.</p></body></html>";
    assert!(parse_passage_html(html).is_none());
}

/// Test that an empty passage container yields nothing
#[test]
fn test_parsePassageHtml_withEmptyPassage_shouldReturnNone() {
    let html = r#"<div class="passage-text"><p></p></div>"#;
    assert!(parse_passage_html(html).is_none());
}

/// Test the verse table format
#[test]
fn test_formatVerseTable_withVerses_shouldListEach() {
    let verses = vec![(
        "John 3:16".to_string(),
        "For God so loved the world".to_string(),
    )];

    let table = format_verse_table(&verses);
    assert!(table.starts_with("[BIBLE VERSE REFERENCE TABLE]"));
    assert!(table.contains("- John 3:16: For God so loved the world"));
}

/// Test the verse table is empty when nothing resolved
#[test]
fn test_formatVerseTable_withNoVerses_shouldBeEmpty() {
    assert_eq!(format_verse_table(&[]), "");
}

/// Test that unreachable lookup hosts degrade to no verses, not errors
#[tokio::test]
async fn test_fetchAll_withUnreachableHost_shouldReturnEmpty() {
    let fetcher = fetcher();
    let verses = fetcher.fetch_all("As John 3:16 says.").await;
    assert!(verses.is_empty());
}
