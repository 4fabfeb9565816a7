/*!
 * Document translation using AI providers.
 *
 * This module contains the core of the translation/review pipeline, split
 * into several submodules:
 *
 * - `markers`: Paragraph marker protocol for prompt text
 * - `chunk`: Token estimation and paragraph chunking
 * - `pipeline`: Chunked translation with per-paragraph recovery
 * - `review`: Bounded review-and-correction loop
 * - `formatting`: Proportional formatting remapping
 * - `prompts`: Prompt templates for both roles
 */

// Re-export main types for easier usage
pub use self::chunk::{estimate_tokens, Chunker};
pub use self::formatting::FormattingRemapper;
pub use self::markers::MarkerCodec;
pub use self::pipeline::TranslationPipeline;
pub use self::review::{format_review_report, ReviewIssue, ReviewLoop, ReviewOutcome};

// Submodules
pub mod chunk;
pub mod formatting;
pub mod markers;
pub mod pipeline;
pub mod prompts;
pub mod review;
