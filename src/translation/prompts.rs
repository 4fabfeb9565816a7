/*!
 * Prompt templates for document translation and review.
 *
 * Both roles share the same rule set so the reviewer checks exactly what the
 * translator was asked to do.
 */

/// Placeholder appendix used when no verse references were resolved
pub const NO_VERSES_PLACEHOLDER: &str = "[No Bible verse references]";

/// Translation rules shared between the translator and reviewer roles
const TRANSLATION_RULES: &str = r#"1. When "he/He/Him/His" refers to God, translate to 祂
2. Translate "God" to 上帝, not 神 (unless it's a direct Bible quote from that specific Chinese version)
3. For names:
   - Biblical names SHOULD be translated (e.g., "Peter" → "彼得", "Paul" → "保罗", "Moses" → "摩西")
   - Non-biblical names (authors, modern people) should be kept in English
4. Do not paraphrase - preserve original paragraph structure and meaning
5. Use natural, native Chinese expressions
6. For Bible verse quotations, use the EXACT Chinese text provided in the reference table below (if provided)"#;

/// System prompt template for the translation role.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The system prompt for the translator role.
    pub const TRANSLATOR: &'static str = r#"You are translating Christian sermon notes from English to Mandarin Chinese (Simplified).

Rules:
{rules}

{verse_table}

IMPORTANT:
- Maintain the same number of paragraphs as the input
- Each paragraph in your output should correspond to the same paragraph in the input
- Use the markers [P1], [P2], etc. to indicate paragraph boundaries
- Only output the translated text with paragraph markers, no explanations"#;

    /// The prompt for the reviewer role.
    pub const REVIEWER: &'static str = r#"You are reviewing a Chinese translation of English sermon notes.

The translation MUST follow these rules:
{rules}

Check for:
1. Accuracy: Does the translation preserve the original meaning?
2. Naturalness: Does it sound like native Mandarin Chinese?
3. Consistency: Are theological terms translated consistently?
4. Pronouns: Is 祂 used for God's pronouns? Is 上帝 used (not 神)?
5. Names: Are biblical names translated to Chinese? Are non-biblical names kept in English?

IMPORTANT: Do NOT review or modify direct Bible quotations. Bible verses from the reference table below are from an authoritative source (BibleGateway) and must be kept exactly as provided. Skip any text that matches a Bible verse reference.

Original English:
{original}

Translated Chinese:
{translated}

Bible Verse References (exempt from review - do not modify these):
{verse_table}

If the translation is perfect, respond with exactly: APPROVED

If there are issues, respond in this JSON format:
{
    "issues": [
        {
            "paragraph": 1,
            "original_text": "problematic text",
            "issue_type": "accuracy|naturalness|consistency|pronoun|name",
            "suggestion": "corrected text"
        }
    ],
    "corrected_translation": "full corrected translation with [P1], [P2] markers"
}"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the translator system prompt template.
    pub fn translator() -> Self {
        Self::new(Self::TRANSLATOR)
    }

    /// Create the reviewer prompt template.
    pub fn reviewer() -> Self {
        Self::new(Self::REVIEWER)
    }

    /// Render the translator template with the verse table appendix.
    pub fn render_translator(&self, verse_table: &str) -> String {
        self.template
            .replace("{rules}", TRANSLATION_RULES)
            .replace("{verse_table}", non_empty_or_placeholder(verse_table))
    }

    /// Render the reviewer template with the text pair and verse table.
    pub fn render_reviewer(&self, original: &str, translated: &str, verse_table: &str) -> String {
        self.template
            .replace("{rules}", TRANSLATION_RULES)
            .replace("{original}", original)
            .replace("{translated}", translated)
            .replace("{verse_table}", non_empty_or_placeholder(verse_table))
    }
}

/// Substitute the explicit placeholder when the verse table is empty
fn non_empty_or_placeholder(verse_table: &str) -> &str {
    if verse_table.trim().is_empty() {
        NO_VERSES_PLACEHOLDER
    } else {
        verse_table
    }
}
