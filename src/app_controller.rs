use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document_processor::{self, OutputStyle, Paragraph};
use crate::providers::ChatProvider;
use crate::translation::{
    format_review_report, Chunker, MarkerCodec, ReviewLoop, TranslationPipeline,
};
use crate::verse_fetcher::{format_verse_table, VerseFetcher};

// @module: Application controller for document translation

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Chat provider shared by both roles
    provider: Arc<dyn ChatProvider>,
}

impl Controller {
    // @method: Create a new controller with the given configuration and provider
    pub fn with_provider(config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        Self { config, provider }
    }

    /// Default output path next to the input file
    pub fn default_output_path(input_file: &Path) -> PathBuf {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());

        input_file
            .with_file_name(format!("{}-ChineseTranslation.docx", stem))
    }

    /// Run the main workflow: read, resolve verses, translate, review, write
    pub async fn run(
        &self,
        input_file: &Path,
        output_file: Option<PathBuf>,
        skip_review: bool,
    ) -> Result<()> {
        let output_file = output_file.unwrap_or_else(|| Self::default_output_path(input_file));

        info!("Reading: {}", input_file.display());
        info!("Output will be: {}", output_file.display());

        let paragraphs = document_processor::read_docx(input_file)
            .with_context(|| format!("Error reading DOCX file: {}", input_file.display()))?;
        info!("Found {} paragraphs", paragraphs.len());

        let verse_table = self.resolve_verses(&paragraphs).await;

        let mut translated_texts = self.translate(&paragraphs, &verse_table).await?;

        if skip_review {
            info!("Skipping review (--skip-review)");
        } else {
            translated_texts = self
                .review(&paragraphs, translated_texts, &verse_table)
                .await?;
        }

        info!("Writing: {}", output_file.display());
        let style = OutputStyle {
            latin_font: self.config.latin_font.clone(),
            east_asian_font: self.config.east_asian_font.clone(),
            font_size_pt: self.config.font_size_pt,
        };
        document_processor::write_docx(&paragraphs, &translated_texts, &output_file, &style)
            .with_context(|| format!("Error writing DOCX file: {}", output_file.display()))?;

        info!("Done!");
        Ok(())
    }

    /// Detect and fetch verse references, returning the formatted table
    async fn resolve_verses(&self, paragraphs: &[Paragraph]) -> String {
        info!("Detecting Bible verse references...");

        let fetcher = VerseFetcher::new(
            &self.config.bible_version,
            &self.config.biblegateway_url,
        );

        let full_text = full_text_with_markers(paragraphs);
        let verses = fetcher.fetch_all(&full_text).await;

        if verses.is_empty() {
            info!("No Bible verse references detected");
        } else {
            info!("Found {} Bible verse reference(s)", verses.len());
            for (reference, _) in &verses {
                info!("  - {}", reference);
            }
        }

        format_verse_table(&verses)
    }

    /// Translate all paragraphs with chunk progress reporting
    async fn translate(
        &self,
        paragraphs: &[Paragraph],
        verse_table: &str,
    ) -> Result<Vec<String>> {
        info!("Translating with {}...", self.config.model);

        let chunker = Chunker::new(
            self.config.max_paragraphs_per_chunk,
            self.config.max_tokens_per_chunk,
        );
        let pipeline = TranslationPipeline::new(
            self.provider.clone(),
            &self.config.model,
            self.config.translation_temperature,
            chunker,
        );

        let progress = progress_bar("Translating");
        let translated = pipeline
            .translate(paragraphs, verse_table, |completed, total| {
                progress.set_length(total as u64);
                progress.set_position(completed as u64);
            })
            .await?;
        progress.finish_and_clear();

        Ok(translated)
    }

    /// Run the review loop and decode any correction back into the array
    async fn review(
        &self,
        paragraphs: &[Paragraph],
        translated_texts: Vec<String>,
        verse_table: &str,
    ) -> Result<Vec<String>> {
        info!("Reviewing translation with {}...", self.config.review_model);

        let original_text = full_text_with_markers(paragraphs);
        let translated_with_markers = MarkerCodec::encode_all(&translated_texts);

        let review_loop = ReviewLoop::new(
            self.provider.clone(),
            &self.config.review_model,
            self.config.review_temperature,
            self.config.max_review_iterations,
        );

        let progress = progress_bar("Reviewing");
        let (final_translation, issues) = review_loop
            .run(
                &original_text,
                &translated_with_markers,
                verse_table,
                |round, total| {
                    progress.set_length(total as u64);
                    progress.set_position(round as u64);
                },
            )
            .await?;
        progress.finish_and_clear();

        if issues.is_empty() {
            info!("Translation approved - no issues found");
            return Ok(translated_texts);
        }

        warn!("{}", format_review_report(&issues));

        // A correction rewrites the whole array; indices the reviewer
        // dropped decode to empty strings, never to missing slots
        let all_indices: Vec<usize> = (0..paragraphs.len()).collect();
        let decoded = MarkerCodec::decode(&final_translation, &all_indices);

        // Every non-empty source paragraph must still have text
        let dropped: Vec<usize> = paragraphs
            .iter()
            .enumerate()
            .filter(|(index, paragraph)| !paragraph.is_empty() && decoded[*index].is_empty())
            .map(|(index, _)| index + 1)
            .collect();

        if !dropped.is_empty() {
            return Err(anyhow!(
                "Corrected translation dropped paragraph(s) {:?}",
                dropped
            ));
        }

        Ok(decoded)
    }
}

/// Full document text with paragraph markers, as shown to the reviewer
pub fn full_text_with_markers(paragraphs: &[Paragraph]) -> String {
    let texts: Vec<String> = paragraphs.iter().map(|p| p.text()).collect();
    MarkerCodec::encode(texts.iter().enumerate().map(|(i, t)| (i, t.as_str())))
}

/// Standard progress bar used for chunk and review progress
fn progress_bar(label: &str) -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar.set_message(label.to_string());
    bar
}
