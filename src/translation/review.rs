/*!
 * Bounded review-and-correction loop.
 *
 * A reviewer model critiques the full original/translated text pair and
 * either approves it or returns a structured issue list with an optional
 * corrected translation. Issues whose suggestion is identical to the flagged
 * text are reviewer false positives and are filtered out. An unreadable
 * critique never blocks output: it is treated as approval.
 */

use anyhow::Result;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use crate::providers::{ChatProvider, ChatRequest};

use super::prompts::PromptTemplate;

/// Regex for locating a JSON object embedded in reviewer prose
static JSON_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{.*\}").expect("Invalid JSON block regex")
});

/// Exact-match approval token
const APPROVED_TOKEN: &str = "APPROVED";

/// An issue found during review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewIssue {
    /// Paragraph display number the issue refers to
    pub paragraph: usize,

    /// The flagged output text
    pub original_text: String,

    /// Issue category (accuracy, naturalness, consistency, pronoun, name)
    pub issue_type: String,

    /// Suggested replacement text
    pub suggestion: String,
}

/// Outcome of a single review round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Reviewer approved the translation (or every issue was filtered out)
    Approved,

    /// Reviewer found issues and supplied a full corrected translation
    IssuesWithCorrection {
        /// The surviving issues
        issues: Vec<ReviewIssue>,
        /// Full corrected translation with paragraph markers
        corrected: String,
    },

    /// Reviewer found issues but supplied no corrected translation
    IssuesWithoutCorrection(Vec<ReviewIssue>),

    /// Response matched neither the approval token nor a structured block
    Unparseable,
}

/// Raw issue shape inside the reviewer's JSON block
#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    paragraph: usize,

    #[serde(default)]
    original_text: String,

    #[serde(default = "default_issue_type")]
    issue_type: String,

    #[serde(default)]
    suggestion: String,
}

fn default_issue_type() -> String {
    "unknown".to_string()
}

/// Raw shape of the reviewer's JSON block
#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(default)]
    issues: Vec<RawIssue>,

    #[serde(default)]
    corrected_translation: Option<String>,
}

/// Review loop over a full original/translated text pair
pub struct ReviewLoop {
    /// Chat provider used for review requests
    provider: Arc<dyn ChatProvider>,

    /// Model identifier for the review role
    model: String,

    /// Sampling temperature for review requests
    temperature: f32,

    /// Maximum review-and-correct rounds
    max_iterations: usize,

    /// Reviewer prompt template
    template: PromptTemplate,
}

impl ReviewLoop {
    /// Create a new review loop over the given provider
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        model: impl Into<String>,
        temperature: f32,
        max_iterations: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_iterations,
            template: PromptTemplate::reviewer(),
        }
    }

    /// Review and potentially correct a marker-tagged translation.
    ///
    /// Returns the final translation text (still marker-tagged) and every
    /// issue accumulated across rounds. The loop always terminates within
    /// the configured iteration cap.
    pub async fn run(
        &self,
        original_text: &str,
        translated_text: &str,
        verse_table: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<(String, Vec<ReviewIssue>)> {
        let mut current_translation = translated_text.to_string();
        let mut all_issues: Vec<ReviewIssue> = Vec::new();

        for iteration in 0..self.max_iterations {
            progress_callback(iteration + 1, self.max_iterations);

            let prompt =
                self.template
                    .render_reviewer(original_text, &current_translation, verse_table);

            let request = ChatRequest::new(
                &self.model,
                "You are a translation quality reviewer.",
                prompt,
            )
            .temperature(self.temperature);

            let response = self.provider.chat(request).await?;

            match Self::parse_response(&response) {
                ReviewOutcome::Approved => {
                    debug!("Review round {} approved the translation", iteration + 1);
                    return Ok((current_translation, all_issues));
                }
                ReviewOutcome::Unparseable => {
                    // Fail-open: an unreadable critique does not block progress
                    warn!(
                        "Review round {} response was not parseable, treating as approved",
                        iteration + 1
                    );
                    return Ok((current_translation, all_issues));
                }
                ReviewOutcome::IssuesWithCorrection { issues, corrected } => {
                    all_issues.extend(issues);
                    current_translation = corrected;
                }
                ReviewOutcome::IssuesWithoutCorrection(issues) => {
                    all_issues.extend(issues);
                    // No correction to apply; keep the last good translation
                    break;
                }
            }
        }

        Ok((current_translation, all_issues))
    }

    /// Parse a reviewer response into an outcome.
    ///
    /// Two-stage parse: exact approval match first, then structured block
    /// extraction, else `Unparseable`.
    pub fn parse_response(response: &str) -> ReviewOutcome {
        if response.trim().eq_ignore_ascii_case(APPROVED_TOKEN) {
            return ReviewOutcome::Approved;
        }

        let Some(block) = JSON_BLOCK_REGEX.find(response) else {
            return ReviewOutcome::Unparseable;
        };

        let Ok(raw) = serde_json::from_str::<RawReview>(block.as_str()) else {
            return ReviewOutcome::Unparseable;
        };

        // Drop false positives where the suggestion changes nothing
        let issues: Vec<ReviewIssue> = raw
            .issues
            .into_iter()
            .filter(|issue| issue.original_text.trim() != issue.suggestion.trim())
            .map(|issue| ReviewIssue {
                paragraph: issue.paragraph,
                original_text: issue.original_text,
                issue_type: issue.issue_type,
                suggestion: issue.suggestion,
            })
            .collect();

        if issues.is_empty() {
            return ReviewOutcome::Approved;
        }

        match raw.corrected_translation {
            Some(corrected) if !corrected.trim().is_empty() => {
                ReviewOutcome::IssuesWithCorrection { issues, corrected }
            }
            _ => ReviewOutcome::IssuesWithoutCorrection(issues),
        }
    }
}

/// Format review issues as a human-readable report
pub fn format_review_report(issues: &[ReviewIssue]) -> String {
    if issues.is_empty() {
        return "No issues found during review.".to_string();
    }

    let mut lines = vec![format!("Review found {} issue(s):", issues.len()), String::new()];

    for (number, issue) in issues.iter().enumerate() {
        lines.push(format!(
            "{}. Paragraph {} - {}",
            number + 1,
            issue.paragraph,
            issue.issue_type
        ));
        lines.push(format!("   Original: {}", issue.original_text));
        lines.push(format!("   Suggestion: {}", issue.suggestion));
        lines.push(String::new());
    }

    lines.join("\n")
}
