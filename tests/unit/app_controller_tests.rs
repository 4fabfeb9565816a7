/*!
 * Tests for the application controller
 */

use std::path::Path;
use std::sync::Arc;

use doctran::app_config::Config;
use doctran::app_controller::{full_text_with_markers, Controller};
use doctran::document_processor::{read_docx, write_docx, OutputStyle};
use doctran::providers::mock::{MockChatProvider, ScriptedReply};

use crate::common::{create_temp_dir, plain_paragraphs};

fn test_config() -> Config {
    let mut config = Config::default();
    config.api_key = "test-key".to_string();
    config
}

/// Seeds a two-paragraph input document and returns (input, output) paths
fn seed_input(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let input = dir.join("input.docx");
    let output = dir.join("output.docx");

    let paragraphs = plain_paragraphs(&["Good morning everyone.", "Welcome back."]);
    let texts: Vec<String> = paragraphs.iter().map(|p| p.text()).collect();
    write_docx(&paragraphs, &texts, &input, &OutputStyle::default()).unwrap();

    (input, output)
}

/// Test the default output path derivation
#[test]
fn test_defaultOutputPath_withDocxInput_shouldAppendSuffix() {
    let output = Controller::default_output_path(Path::new("/docs/sermon.docx"));
    assert_eq!(
        output,
        Path::new("/docs/sermon-ChineseTranslation.docx")
    );
}

/// Test the marker-tagged full text used for review
#[test]
fn test_fullTextWithMarkers_withParagraphs_shouldTagEach() {
    let paragraphs = plain_paragraphs(&["First", "Second"]);
    assert_eq!(
        full_text_with_markers(&paragraphs),
        "[P1] First\n[P2] Second"
    );
}

/// Test the end-to-end workflow over a real package with a mock provider
#[tokio::test]
async fn test_run_withEchoProvider_shouldProduceReadableOutput() {
    let temp_dir = create_temp_dir().unwrap();
    let (input, output) = seed_input(temp_dir.path());

    let provider = Arc::new(MockChatProvider::echo());
    let controller = Controller::with_provider(test_config(), provider);

    controller
        .run(&input, Some(output.clone()), true)
        .await
        .unwrap();

    let result = read_docx(&output).unwrap();
    let result_texts: Vec<String> = result.iter().map(|p| p.text()).collect();
    assert_eq!(result_texts, vec!["Good morning everyone.", "Welcome back."]);
}

/// Test that a reviewer correction flows through to the output document
#[tokio::test]
async fn test_run_withReviewCorrection_shouldWriteCorrectedText() {
    let temp_dir = create_temp_dir().unwrap();
    let (input, output) = seed_input(temp_dir.path());

    let review_response = r#"{
        "issues": [
            {"paragraph": 1, "original_text": "你好", "issue_type": "naturalness", "suggestion": "早安"}
        ],
        "corrected_translation": "[P1] 早安\n[P2] 世界"
    }"#;
    let provider = Arc::new(MockChatProvider::script(vec![
        ScriptedReply::text("[P1] 你好\n[P2] 世界"),
        ScriptedReply::text(review_response),
        ScriptedReply::text("APPROVED"),
    ]));
    let controller = Controller::with_provider(test_config(), provider);

    controller
        .run(&input, Some(output.clone()), false)
        .await
        .unwrap();

    let result = read_docx(&output).unwrap();
    let result_texts: Vec<String> = result.iter().map(|p| p.text()).collect();
    assert_eq!(result_texts, vec!["早安", "世界"]);
}

/// Test that a correction missing a non-empty paragraph fails the run
#[tokio::test]
async fn test_run_withCorrectionDroppingParagraph_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let (input, output) = seed_input(temp_dir.path());

    // The corrected translation lost the [P2] marker
    let review_response = r#"{
        "issues": [
            {"paragraph": 1, "original_text": "你好", "issue_type": "naturalness", "suggestion": "早安"}
        ],
        "corrected_translation": "[P1] 早安"
    }"#;
    let provider = Arc::new(MockChatProvider::script(vec![
        ScriptedReply::text("[P1] 你好\n[P2] 世界"),
        ScriptedReply::text(review_response),
        ScriptedReply::text("APPROVED"),
    ]));
    let controller = Controller::with_provider(test_config(), provider);

    let result = controller.run(&input, Some(output), false).await;
    assert!(result.is_err());
}

/// Test that a missing input file fails the run
#[tokio::test]
async fn test_run_withMissingInput_shouldReturnError() {
    let temp_dir = create_temp_dir().unwrap();
    let input = temp_dir.path().join("absent.docx");

    let controller = Controller::with_provider(test_config(), Arc::new(MockChatProvider::echo()));
    let result = controller.run(&input, None, true).await;

    assert!(result.is_err());
}
