/*!
 * Paragraph marker encoding and decoding.
 *
 * Prompt text exchanged with the model carries positional `[P1]`, `[P2]`, ...
 * markers so a multi-paragraph response can be split back into per-paragraph
 * text. Decoding is positional and total: every requested index produces an
 * entry, with the empty string standing in for a marker the model dropped.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for locating paragraph markers in model output
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[P(\d+)\]").expect("Invalid paragraph marker regex")
});

/// Codec for the paragraph marker protocol
pub struct MarkerCodec;

impl MarkerCodec {
    /// The marker tag for a 0-based paragraph index (displayed 1-based)
    pub fn marker(index: usize) -> String {
        format!("[P{}]", index + 1)
    }

    /// Encode indexed paragraph texts into marker-tagged prompt text.
    ///
    /// Each paragraph becomes one line: the marker followed by the trimmed
    /// text, or just the marker when the text is empty.
    pub fn encode<'a, I>(items: I) -> String
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let lines: Vec<String> = items
            .into_iter()
            .map(|(index, text)| {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Self::marker(index)
                } else {
                    format!("{} {}", Self::marker(index), trimmed)
                }
            })
            .collect();

        lines.join("\n")
    }

    /// Encode a full translation array, one marker per element in order
    pub fn encode_all(texts: &[String]) -> String {
        Self::encode(texts.iter().enumerate().map(|(i, t)| (i, t.as_str())))
    }

    /// Decode marker-tagged model output against the requested indices.
    ///
    /// For each expected index the capture runs from its marker to the next
    /// marker in the response (or end of input), trimmed. A missing marker
    /// yields the empty string. Output positions follow `expected_indices`,
    /// not the order markers happen to appear in the response.
    pub fn decode(response: &str, expected_indices: &[usize]) -> Vec<String> {
        // All markers in response order, with their display number and span
        let markers: Vec<(usize, usize, usize)> = MARKER_REGEX
            .captures_iter(response)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let number: usize = cap.get(1)?.as_str().parse().ok()?;
                Some((number, whole.start(), whole.end()))
            })
            .collect();

        expected_indices
            .iter()
            .map(|&index| {
                let display_number = index + 1;
                let position = markers.iter().position(|&(n, _, _)| n == display_number);

                match position {
                    Some(at) => {
                        let start = markers[at].2;
                        let end = markers
                            .get(at + 1)
                            .map(|&(_, next_start, _)| next_start)
                            .unwrap_or(response.len());
                        response[start..end].trim().to_string()
                    }
                    None => String::new(),
                }
            })
            .collect()
    }
}
