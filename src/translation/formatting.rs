/*!
 * Proportional formatting remapping.
 *
 * Translation changes text length, so the original run boundaries cannot be
 * carried over directly. Each original run instead claims a slice of the
 * translated text proportional to its share of the original character count.
 * The final run absorbs whatever remains, so the translated text is always
 * emitted exactly once.
 */

use crate::document_processor::{Paragraph, Run};

/// Remaps original run formatting onto translated text
pub struct FormattingRemapper;

impl FormattingRemapper {
    /// Compute the run layout for one translated paragraph.
    ///
    /// The emitted run texts always concatenate back to `translated`. The
    /// result is empty only when the paragraph is empty on both sides.
    pub fn remap(paragraph: &Paragraph, translated: &str) -> Vec<Run> {
        if paragraph.is_empty() && translated.trim().is_empty() {
            return Vec::new();
        }

        match paragraph.runs.len() {
            // Structurally empty paragraph that still produced text
            0 => vec![Run::plain(translated)],

            // Single run: the whole translation inherits its formatting
            1 => vec![Run::new(
                translated,
                paragraph.runs[0].bold,
                paragraph.runs[0].italic,
            )],

            _ => Self::remap_proportional(&paragraph.runs, translated),
        }
    }

    /// Distribute translated text over multiple runs by character-length share
    fn remap_proportional(runs: &[Run], translated: &str) -> Vec<Run> {
        let total_original: usize = runs.iter().map(|r| r.text.chars().count()).sum();
        if total_original == 0 {
            return vec![Run::plain(translated)];
        }

        // Slice on characters, not bytes: the output is typically CJK
        let translated_chars: Vec<char> = translated.chars().collect();
        let translated_len = translated_chars.len();

        let mut result = Vec::with_capacity(runs.len());
        let mut position = 0usize;

        for (index, run) in runs.iter().enumerate() {
            let take = if index == runs.len() - 1 {
                // Last run absorbs the remainder, guarding rounding drift
                translated_len - position
            } else {
                let share = run.text.chars().count() as f64 / total_original as f64;
                let sized = (share * translated_len as f64).round() as usize;
                sized.min(translated_len - position)
            };

            let text: String = translated_chars[position..position + take].iter().collect();
            position += take;

            if !text.is_empty() {
                result.push(Run::new(text, run.bold, run.italic));
            }
        }

        result
    }
}
