/*!
 * # doctran - AI-powered DOCX translation
 *
 * A Rust library for translating Word documents with AI while preserving
 * paragraph structure and inline formatting.
 *
 * ## Features
 *
 * - Read and write DOCX documents (paragraphs, bold/italic runs)
 * - Translate paragraph-by-paragraph through OpenRouter chat models
 * - Paragraph marker protocol keeps a 1:1 source/translation alignment
 * - Automatic recovery of paragraphs the model dropped
 * - Bounded review-and-correction loop with a second model
 * - Bible verse reference lookup via BibleGateway
 * - Proportional remapping of run formatting onto translated text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document_processor`: DOCX file handling and processing
 * - `translation`: AI-powered translation services:
 *   - `translation::markers`: Paragraph marker protocol
 *   - `translation::chunk`: Token estimation and chunking
 *   - `translation::pipeline`: Chunked translation with recovery
 *   - `translation::review`: Review-and-correction loop
 *   - `translation::formatting`: Format preservation and remapping
 *   - `translation::prompts`: Prompt templates
 * - `verse_fetcher`: Bible verse detection and lookup
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openrouter`: OpenRouter API client
 *   - `providers::mock`: Scriptable provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document_processor;
pub mod translation;
pub mod verse_fetcher;
pub mod app_controller;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document_processor::{Paragraph, Run};
pub use translation::{Chunker, MarkerCodec, ReviewLoop, TranslationPipeline};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
