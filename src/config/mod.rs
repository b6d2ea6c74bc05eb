//! Desk configuration
//!
//! Configuration is layered with increasing precedence:
//!
//! 1. Compiled defaults
//! 2. A TOML file (`--config`, `UNIDESK_CONFIG`, or the platform config dir)
//! 3. Environment variables
//!
//! Credentials are read but never serialized back out.

use crate::core::classify::KeywordRules;
use crate::core::evidence::DEFAULT_UNCERTAINTY_PHRASES;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod loader;


/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Location of the user-level config file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "unidesk", "unidesk").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Default log level when neither `-v` nor `RUST_LOG` is given.
    pub log_level: String,

    /// Lower-cased phrases marking a knowledge-only answer as uncertain.
    pub uncertainty_phrases: Vec<String>,

    pub classifier: ClassifierSettings,
    pub synthesis: SynthesisSettings,
    pub web_search: WebSearchSettings,
    pub knowledge: KnowledgeSettings,
    pub thresholds: Thresholds,
    pub keywords: KeywordRules,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            uncertainty_phrases: DEFAULT_UNCERTAINTY_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            classifier: ClassifierSettings::default(),
            synthesis: SynthesisSettings::default(),
            web_search: WebSearchSettings::default(),
            knowledge: KnowledgeSettings::default(),
            thresholds: Thresholds::default(),
            keywords: KeywordRules::default(),
        }
    }
}

/// Remote zero-shot classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub endpoint: String,
    pub model: String,
    /// Absent token means keyword-only classification for the whole process.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub min_confidence: f64,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: "MoritzLaurer/deberta-v3-xsmall-zeroshot-v1.1-all-33".to_string(),
            api_token: None,
            min_confidence: 0.4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// OpenAI-compatible chat completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: None,
            temperature: 0.0,
            max_retries: 2,
            retry_delay_ms: 500,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Domain-restricted web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchSettings {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub domain: String,
    pub max_results: usize,
    pub search_depth: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.tavily.com/search".to_string(),
            api_key: None,
            domain: "example.edu.pk".to_string(),
            max_results: 3,
            search_depth: "basic".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Knowledge store: a hosted vector index, or a local directory of text files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    #[serde(skip_serializing)]
    pub pinecone_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinecone_index_host: Option<String>,
    pub embedding_endpoint: String,
    pub embedding_model: String,
    pub top_k: usize,
    pub score_threshold: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_dir: Option<PathBuf>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            pinecone_api_key: None,
            pinecone_index_host: None,
            embedding_endpoint: "https://router.huggingface.co/hf-inference/models".to_string(),
            embedding_model: "sentence-transformers/all-mpnet-base-v2".to_string(),
            top_k: 3,
            score_threshold: 0.5,
            knowledge_dir: None,
            chunk_size: 500,
            chunk_overlap: 50,
            timeout: Duration::from_secs(30),
        }
    }
}

impl KnowledgeSettings {
    /// Both Pinecone settings are needed to use the hosted index.
    pub fn pinecone(&self) -> Option<(&str, &str)> {
        match (&self.pinecone_api_key, &self.pinecone_index_host) {
            (Some(key), Some(host)) => Some((key.as_str(), host.as_str())),
            _ => None,
        }
    }
}

/// Length gates applied by the generation and escalation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Knowledge text shorter than this skips generation and goes to web fallback.
    pub min_context_length: usize,
    /// Final answers shorter than this escalate.
    pub min_answer_length: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_context_length: 50,
            min_answer_length: 40,
        }
    }
}
