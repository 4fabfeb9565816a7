/*!
 * Tests for the paragraph marker protocol
 */

use doctran::translation::markers::MarkerCodec;

/// Test that markers display 1-based numbers
#[test]
fn test_marker_withZeroBasedIndex_shouldDisplayOneBased() {
    assert_eq!(MarkerCodec::marker(0), "[P1]");
    assert_eq!(MarkerCodec::marker(9), "[P10]");
}

/// Test encoding of a simple sequence
#[test]
fn test_encode_withTexts_shouldTagEachLine() {
    let encoded = MarkerCodec::encode(vec![(0, "Alpha"), (1, "Beta")]);
    assert_eq!(encoded, "[P1] Alpha\n[P2] Beta");
}

/// Test that whitespace-only text encodes as a bare marker
#[test]
fn test_encode_withEmptyText_shouldEmitBareMarker() {
    let encoded = MarkerCodec::encode(vec![(0, "Alpha"), (1, "   "), (2, "Gamma")]);
    assert_eq!(encoded, "[P1] Alpha\n[P2]\n[P3] Gamma");
}

/// Test encoding with non-zero starting indices, as mid-document chunks use
#[test]
fn test_encode_withOffsetIndices_shouldNumberFromIndex() {
    let encoded = MarkerCodec::encode(vec![(3, "D"), (4, "E")]);
    assert_eq!(encoded, "[P4] D\n[P5] E");
}

/// Test decoding a well-formed response
#[test]
fn test_decode_withAllMarkersPresent_shouldRecoverEachParagraph() {
    let decoded = MarkerCodec::decode("[P1] A\n[P2] B\n[P3] C", &[0, 1, 2]);
    assert_eq!(decoded, vec!["A", "B", "C"]);
}

/// Test that a dropped marker decodes to the empty string at its position
#[test]
fn test_decode_withMissingMarker_shouldYieldEmptyString() {
    let decoded = MarkerCodec::decode("[P1] A\n[P3] C", &[0, 1, 2]);
    assert_eq!(decoded, vec!["A", "", "C"]);
}

/// Test that output order follows the expected indices, not response order
#[test]
fn test_decode_withReorderedResponse_shouldFollowExpectedOrder() {
    let decoded = MarkerCodec::decode("[P2] B\n[P1] A", &[0, 1]);
    assert_eq!(decoded, vec!["A", "B"]);
}

/// Test that preamble text before the first marker is ignored
#[test]
fn test_decode_withPreamble_shouldIgnoreLeadingText() {
    let response = "Here is the translation:\n[P1] A\n[P2] B";
    let decoded = MarkerCodec::decode(response, &[0, 1]);
    assert_eq!(decoded, vec!["A", "B"]);
}

/// Test that captured text spanning multiple lines is kept intact
#[test]
fn test_decode_withMultilineParagraph_shouldKeepInnerNewlines() {
    let response = "[P1] first line\nsecond line\n[P2] B";
    let decoded = MarkerCodec::decode(response, &[0, 1]);
    assert_eq!(decoded, vec!["first line\nsecond line", "B"]);
}

/// Test the full-array convenience encoder round-trips through decode
#[test]
fn test_encodeAll_withDecode_shouldRoundTrip() {
    let texts = vec![
        "One".to_string(),
        String::new(),
        "Three".to_string(),
    ];
    let encoded = MarkerCodec::encode_all(&texts);
    let decoded = MarkerCodec::decode(&encoded, &[0, 1, 2]);
    assert_eq!(decoded, texts);
}
