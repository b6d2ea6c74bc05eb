//! Offline retriever over a directory of text files
//!
//! Files are split into overlapping character windows when the retriever is
//! built. A chunk's relevance is the fraction of distinct query terms it
//! contains, so the configured score threshold reads the same way as a
//! similarity cut-off: 0.5 means at least half of the query terms matched.

use super::KnowledgeRetriever;
use crate::config::KnowledgeSettings;
use crate::core::evidence::DocumentSnippet;
use crate::error::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

static TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid term regex"));

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "what", "when", "where", "which", "who", "how", "can",
    "does", "did", "you", "your", "with", "about", "this", "that", "there", "from", "have", "has",
    "will", "would", "could", "should", "into", "any", "all", "tell", "please",
];

const INDEXED_EXTENSIONS: &[&str] = &["txt", "md"];

struct Chunk {
    source: String,
    text: String,
    terms: HashSet<String>,
}

pub struct LexicalRetriever {
    chunks: Vec<Chunk>,
    top_k: usize,
    score_threshold: f32,
}

impl LexicalRetriever {
    /// Retriever with nothing indexed; every lookup returns no snippets.
    pub fn empty(settings: &KnowledgeSettings) -> Self {
        Self {
            chunks: Vec::new(),
            top_k: settings.top_k,
            score_threshold: settings.score_threshold,
        }
    }

    /// Index `(source, text)` pairs already in memory.
    pub fn from_documents<I>(documents: I, settings: &KnowledgeSettings) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut retriever = Self::empty(settings);
        for (source, text) in documents {
            for piece in chunk_text(&text, settings.chunk_size, settings.chunk_overlap) {
                retriever.chunks.push(Chunk {
                    source: source.clone(),
                    terms: terms(&piece),
                    text: piece,
                });
            }
        }
        retriever
    }

    /// Index every `.txt` and `.md` file under `dir`.
    pub fn from_dir(dir: &Path, settings: &KnowledgeSettings) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "Knowledge directory {} does not exist",
                dir.display()
            )));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Retrieval(e.to_string()))?;
            let path = entry.path();
            let indexed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| INDEXED_EXTENSIONS.contains(&ext));

            if entry.file_type().is_file() && indexed {
                let text = std::fs::read_to_string(path)?;
                let source = path
                    .strip_prefix(dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_string();
                documents.push((source, text));
            }
        }

        let retriever = Self::from_documents(documents, settings);
        info!(
            "Indexed {} chunks from {}",
            retriever.len(),
            dir.display()
        );
        Ok(retriever)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn search(&self, query: &str) -> Vec<DocumentSnippet> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let hits = query_terms.intersection(&chunk.terms).count();
                (hits as f32 / query_terms.len() as f32, chunk)
            })
            .filter(|(score, _)| *score > 0.0 && *score >= self.score_threshold)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(self.top_k)
            .map(|(score, chunk)| {
                DocumentSnippet::new(chunk.text.clone())
                    .with_metadata("source", serde_json::Value::String(chunk.source.clone()))
                    .with_metadata("score", serde_json::Value::from(score))
            })
            .collect()
    }
}

#[async_trait]
impl KnowledgeRetriever for LexicalRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentSnippet>> {
        let snippets = self.search(query);
        debug!("Lexical index matched {} chunks", snippets.len());
        Ok(snippets)
    }
}

/// Pure: Significant lower-cased terms of `text`
fn terms(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= 3 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Pure: Split text into windows of at most `size` characters overlapping by `overlap`
///
/// A window is cut back to its last whitespace when that keeps more than
/// half of it, so words are rarely split.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    if size == 0 {
        return chunks;
    }

    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + size).min(chars.len());
        if end < chars.len() {
            if let Some(ws) = chars[start..end].iter().rposition(|c| c.is_whitespace()) {
                if ws > size / 2 {
                    end = start + ws;
                }
            }
        }

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(overlap).max(start + 1);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings() -> KnowledgeSettings {
        KnowledgeSettings::default()
    }

    #[test]
    fn test_chunk_text_windows_overlap() {
        let text = "a".repeat(1200);
        let chunks = chunk_text(&text, 500, 50);

        let lengths: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lengths, vec![500, 500, 300]);
    }

    #[test]
    fn test_chunk_text_prefers_whitespace() {
        let text = format!("{} {}", "x".repeat(400), "y".repeat(300));
        let chunks = chunk_text(&text, 500, 50);

        assert_eq!(chunks[0], "x".repeat(400));
        assert!(chunks[1].ends_with('y'));
    }

    #[test]
    fn test_chunk_text_short_and_empty() {
        assert_eq!(chunk_text("hello", 500, 50), vec!["hello".to_string()]);
        assert!(chunk_text("   ", 500, 50).is_empty());
        assert!(chunk_text("", 500, 50).is_empty());
    }

    #[test]
    fn test_terms_drop_stopwords_and_short_tokens() {
        let t = terms("What are the tuition fees for BS Computer Science?");
        let mut sorted: Vec<_> = t.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["computer", "fees", "science", "tuition"]);
    }

    #[tokio::test]
    async fn test_retrieve_ranks_and_thresholds() {
        let retriever = LexicalRetriever::from_documents(
            vec![
                (
                    "fees.txt".to_string(),
                    "Tuition fees for computer science are charged per semester.".to_string(),
                ),
                (
                    "library.txt".to_string(),
                    "The library is open to computer users all week.".to_string(),
                ),
                (
                    "sports.txt".to_string(),
                    "The sports complex hosts football matches.".to_string(),
                ),
            ],
            &settings(),
        );

        let docs = retriever
            .retrieve("tuition fees for computer science")
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.starts_with("Tuition fees"));
        assert_eq!(docs[0].metadata["source"], serde_json::json!("fees.txt"));
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let docs = (0..5).map(|i| (format!("d{i}.txt"), "scholarship deadline".to_string()));
        let retriever = LexicalRetriever::from_documents(docs, &settings());

        assert_eq!(retriever.retrieve("scholarship").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stopword_only_query_matches_nothing() {
        let retriever = LexicalRetriever::from_documents(
            vec![("a.txt".to_string(), "what are the rules".to_string())],
            &settings(),
        );
        assert!(retriever.retrieve("what are the").await.unwrap().is_empty());
    }

    #[test]
    fn test_from_dir_indexes_text_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("admissions.txt"), "Admissions open in June.").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/programs.md"), "BS Physics program.").unwrap();
        fs::write(dir.path().join("logo.png"), [0u8, 1, 2]).unwrap();

        let retriever = LexicalRetriever::from_dir(dir.path(), &settings()).unwrap();
        assert_eq!(retriever.len(), 2);
    }

    #[test]
    fn test_from_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(LexicalRetriever::from_dir(&dir.path().join("missing"), &settings()).is_err());
    }
}
