use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

// @module: Bible verse detection and lookup via BibleGateway

// @const: Verse reference regex
// Matches patterns like: John 3:16, 1 Corinthians 13:4-7, Psalm 23:1-6
static VERSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:[123]\s*)?(?:Genesis|Exodus|Leviticus|Numbers|Deuteronomy|Joshua|Judges|Ruth|Samuel|Kings|Chronicles|Ezra|Nehemiah|Esther|Job|Psalms?|Proverbs|Ecclesiastes|Song\s+of\s+Solomon|Isaiah|Jeremiah|Lamentations|Ezekiel|Daniel|Hosea|Joel|Amos|Obadiah|Jonah|Micah|Nahum|Habakkuk|Zephaniah|Haggai|Zechariah|Malachi|Matthew|Mark|Luke|John|Acts|Romans|Corinthians|Galatians|Ephesians|Philippians|Colossians|Thessalonians|Timothy|Titus|Philemon|Hebrews|James|Peter|Jude|Revelation)\s+\d+:\d+(?:-\d+)?(?:,\s*\d+(?:-\d+)?)*)\b",
    )
    .expect("Invalid verse reference regex")
});

/// Selector for the passage container in a BibleGateway page
static PASSAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.passage-text").expect("Invalid passage selector")
});

/// Selector for verse text spans inside the passage container
static VERSE_SPAN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.text").expect("Invalid verse span selector")
});

/// A node in the extracted passage markup.
///
/// The lookup page mixes verse text with number labels and markup we do not
/// want; reducing the HTML to this tagged tree keeps the traversal
/// exhaustive instead of probing node attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassageNode {
    /// Plain text content
    Text(String),

    /// An element with its class list and children
    Element {
        /// CSS classes on the element
        classes: Vec<String>,
        /// Child nodes in document order
        children: Vec<PassageNode>,
    },
}

impl PassageNode {
    /// Append this node's verse text, skipping verse and chapter numbers
    fn collect_text(&self, out: &mut String) {
        match self {
            PassageNode::Text(text) => out.push_str(text),
            PassageNode::Element { classes, children } => {
                if classes.iter().any(|c| c == "versenum" || c == "chapternum") {
                    return;
                }
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Convert a scraper DOM node into a [`PassageNode`], dropping comments and
/// other markup that carries no text
fn passage_node(node: ego_tree::NodeRef<'_, scraper::Node>) -> Option<PassageNode> {
    match node.value() {
        scraper::Node::Text(text) => Some(PassageNode::Text(text.to_string())),
        scraper::Node::Element(element) => Some(PassageNode::Element {
            classes: element.classes().map(String::from).collect(),
            children: node.children().filter_map(passage_node).collect(),
        }),
        _ => None,
    }
}

/// Extract the verse text from a BibleGateway passage page.
///
/// Returns `None` when the page has no passage container or no verse text
/// (typically an unknown reference or version).
pub fn parse_passage_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let passage = document.select(&PASSAGE_SELECTOR).next()?;

    let mut verses: Vec<String> = Vec::new();
    for span in passage.select(&VERSE_SPAN_SELECTOR) {
        let mut text = String::new();
        for child in span.children() {
            if let Some(node) = passage_node(child) {
                node.collect_text(&mut text);
            }
        }

        let text = text.trim();
        if !text.is_empty() {
            verses.push(text.to_string());
        }
    }

    if verses.is_empty() {
        None
    } else {
        Some(verses.join(" "))
    }
}

/// Fetches Bible verses from BibleGateway, with a per-run lookup cache
pub struct VerseFetcher {
    /// Bible version code (e.g. "CCB")
    version: String,

    /// Passage lookup URL
    lookup_url: String,

    /// HTTP client for lookups
    client: Client,

    /// Session-scoped cache, written at most once per reference
    cache: RwLock<HashMap<String, String>>,
}

impl VerseFetcher {
    /// Create a new fetcher for the given version and lookup URL
    pub fn new(version: impl Into<String>, lookup_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            lookup_url: lookup_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Detect verse references in the given text.
    ///
    /// References are whitespace-normalized and deduplicated
    /// case-insensitively, preserving first-occurrence order.
    pub fn detect_references(&self, text: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut references = Vec::new();

        for capture in VERSE_PATTERN.captures_iter(text) {
            let Some(matched) = capture.get(1) else {
                continue;
            };

            let normalized = matched
                .as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");

            if seen.insert(normalized.to_lowercase()) {
                references.push(normalized);
            }
        }

        references
    }

    /// Fetch the authoritative text for one verse reference.
    ///
    /// Lookup failures are logged and produce `None`; the reference then
    /// gets translated like ordinary text instead of substituted.
    pub async fn fetch_verse(&self, reference: &str) -> Option<String> {
        if let Some(cached) = self.cache.read().get(reference) {
            debug!("Verse cache hit for {}", reference);
            return Some(cached.clone());
        }

        let response = match self
            .client
            .get(&self.lookup_url)
            .query(&[("search", reference), ("version", &self.version)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {}: {}", reference, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Failed to fetch {}: HTTP {}",
                reference,
                response.status()
            );
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read passage page for {}: {}", reference, e);
                return None;
            }
        };

        let Some(verse) = parse_passage_html(&html) else {
            warn!("No verse text found for {}", reference);
            return None;
        };

        self.cache
            .write()
            .insert(reference.to_string(), verse.clone());
        Some(verse)
    }

    /// Detect and fetch every verse referenced in the text.
    ///
    /// Returns (reference, text) pairs in first-occurrence order; references
    /// that could not be resolved are omitted.
    pub async fn fetch_all(&self, text: &str) -> Vec<(String, String)> {
        let mut verses = Vec::new();

        for reference in self.detect_references(text) {
            if let Some(verse) = self.fetch_verse(&reference).await {
                verses.push((reference, verse));
            }
        }

        verses
    }
}

/// Format resolved verses as a lookup table for the prompt appendix.
///
/// Returns an empty string when there are no verses; the prompt templates
/// substitute their explicit placeholder in that case.
pub fn format_verse_table(verses: &[(String, String)]) -> String {
    if verses.is_empty() {
        return String::new();
    }

    let mut lines = vec!["[BIBLE VERSE REFERENCE TABLE]".to_string()];
    for (reference, text) in verses {
        lines.push(format!("- {}: {}", reference, text));
    }

    lines.join("\n")
}
