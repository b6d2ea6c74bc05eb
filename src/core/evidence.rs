//! Evidence types and the pure helpers that turn them into prompt context

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phrases that mark a generated answer as unsupported by its evidence.
pub const DEFAULT_UNCERTAINTY_PHRASES: &[&str] = &[
    "i don't know",
    "not sure",
    "no information",
    "cannot find",
    "don't have enough",
    "unable to find",
    "not mentioned",
    "no data",
];

const SNIPPET_SEPARATOR: &str = "\n\n";
const WEB_RESULT_SEPARATOR: &str = "\n\n---\n\n";

/// A relevance-ranked passage from the knowledge store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentSnippet {
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl DocumentSnippet {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A single hit from the domain-restricted web search, surfaced to users as a citation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl WebResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Pure: Concatenate snippet text separated by blank lines
pub fn join_snippets(docs: &[DocumentSnippet]) -> String {
    docs.iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR)
}

/// Pure: Render web results as title / source / content blocks
///
/// Returns an empty string when there are no results, which callers use to
/// pick the knowledge-only prompt.
pub fn format_web_results(results: &[WebResult]) -> String {
    results
        .iter()
        .map(|r| {
            let title = if r.title.trim().is_empty() {
                "No title"
            } else {
                r.title.as_str()
            };
            format!("**{}**\nSource: {}\n{}", title, r.url, r.content)
        })
        .collect::<Vec<_>>()
        .join(WEB_RESULT_SEPARATOR)
}

/// Pure: Whether retrieved knowledge is worth a generation call
///
/// Length is measured in characters, not bytes.
pub fn has_sufficient_context(docs: &[DocumentSnippet], joined: &str, min_length: usize) -> bool {
    !docs.is_empty() && joined.chars().count() >= min_length
}

/// Pure: Check an answer for any configured uncertainty phrase (case-insensitive)
pub fn contains_uncertainty(answer: &str, phrases: &[String]) -> bool {
    let lowered = answer.to_lowercase();
    phrases
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()))
}
