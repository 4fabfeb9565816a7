/*!
 * Chunked translation pipeline.
 *
 * Drives per-chunk translation requests, decodes marker-tagged responses,
 * and recovers individually any paragraph the model dropped from a chunk
 * response. Chunks execute strictly in source order; the output array always
 * has one entry per source paragraph.
 */

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

use crate::document_processor::Paragraph;
use crate::providers::{ChatProvider, ChatRequest};

use super::chunk::Chunker;
use super::markers::MarkerCodec;
use super::prompts::PromptTemplate;

/// Maximum individual retry attempts per dropped paragraph
const MAX_RETRY_ATTEMPTS: u32 = 2;

/// Per-paragraph recovery state when a chunk response dropped a marker
#[derive(Debug)]
enum RetryState {
    /// Marker missing from the chunk response, retry not yet attempted
    Pending,

    /// Individual retry in flight (attempt number, 1-based)
    Retrying(u32),

    /// Retry produced usable marker-tagged text
    Resolved(String),

    /// Attempts exhausted; the raw response text is used verbatim, trimmed
    Fallback(String),
}

/// Translation pipeline for paragraph-structured documents
pub struct TranslationPipeline {
    /// Chat provider used for translation requests
    provider: Arc<dyn ChatProvider>,

    /// Model identifier for the translation role
    model: String,

    /// Sampling temperature for translation requests
    temperature: f32,

    /// Paragraph chunker
    chunker: Chunker,

    /// Translator prompt template
    template: PromptTemplate,
}

impl TranslationPipeline {
    /// Create a new pipeline over the given provider
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        model: impl Into<String>,
        temperature: f32,
        chunker: Chunker,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            chunker,
            template: PromptTemplate::translator(),
        }
    }

    /// Translate all paragraphs, returning one string per source paragraph.
    ///
    /// The progress callback fires once per completed chunk with
    /// `(completed, total)`; it has no effect on control flow.
    pub async fn translate(
        &self,
        paragraphs: &[Paragraph],
        verse_table: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<String>> {
        let system_prompt = self.template.render_translator(verse_table);
        let chunks = self.chunker.chunk(paragraphs);
        let total_chunks = chunks.len();

        let mut translations: Vec<String> = Vec::with_capacity(paragraphs.len());

        for (chunk_number, chunk) in chunks.iter().enumerate() {
            debug!(
                "Translating chunk {}/{} ({} paragraphs)",
                chunk_number + 1,
                total_chunks,
                chunk.len()
            );

            let results = self.translate_chunk(chunk, &system_prompt).await?;
            translations.extend(results);

            progress_callback(chunk_number + 1, total_chunks);
        }

        // The chunker is exhaustive, so this holds by construction
        debug_assert_eq!(translations.len(), paragraphs.len());

        Ok(translations)
    }

    /// Translate one chunk and recover any dropped paragraphs individually
    async fn translate_chunk(
        &self,
        chunk: &[(usize, &Paragraph)],
        system_prompt: &str,
    ) -> Result<Vec<String>> {
        let texts: Vec<(usize, String)> = chunk
            .iter()
            .map(|&(index, paragraph)| (index, paragraph.text()))
            .collect();

        let encoded = MarkerCodec::encode(texts.iter().map(|(i, t)| (*i, t.as_str())));
        let response = self.request(system_prompt, &encoded).await?;

        let indices: Vec<usize> = chunk.iter().map(|&(index, _)| index).collect();
        let mut results = MarkerCodec::decode(&response, &indices);

        for (slot, &(index, paragraph)) in chunk.iter().enumerate() {
            if paragraph.is_empty() || !results[slot].is_empty() {
                continue;
            }

            warn!(
                "Paragraph {} missing from chunk response, retrying individually",
                index + 1
            );
            results[slot] = self.recover_paragraph(index, paragraph, system_prompt).await?;
        }

        Ok(results)
    }

    /// Run the bounded retry-then-fallback state machine for one paragraph
    async fn recover_paragraph(
        &self,
        index: usize,
        paragraph: &Paragraph,
        system_prompt: &str,
    ) -> Result<String> {
        let text = paragraph.text();
        let encoded = MarkerCodec::encode([(index, text.as_str())]);

        let mut state = RetryState::Pending;

        loop {
            state = match state {
                RetryState::Pending => RetryState::Retrying(1),

                RetryState::Retrying(attempt) => {
                    debug!(
                        "Retry attempt {}/{} for paragraph {}",
                        attempt,
                        MAX_RETRY_ATTEMPTS,
                        index + 1
                    );

                    let response = self.request(system_prompt, &encoded).await?;
                    let decoded = MarkerCodec::decode(&response, &[index])
                        .pop()
                        .unwrap_or_default();

                    if !decoded.is_empty() {
                        RetryState::Resolved(decoded)
                    } else if attempt < MAX_RETRY_ATTEMPTS {
                        RetryState::Retrying(attempt + 1)
                    } else {
                        RetryState::Fallback(response.trim().to_string())
                    }
                }

                RetryState::Resolved(result) => return Ok(result),

                RetryState::Fallback(raw) => {
                    warn!(
                        "Paragraph {} still missing after {} attempts, using raw response",
                        index + 1,
                        MAX_RETRY_ATTEMPTS
                    );
                    return Ok(raw);
                }
            };
        }
    }

    /// Issue one translation request
    async fn request(&self, system: &str, user: &str) -> Result<String> {
        let request =
            ChatRequest::new(&self.model, system, user).temperature(self.temperature);
        let response = self.provider.chat(request).await?;
        Ok(response)
    }
}
