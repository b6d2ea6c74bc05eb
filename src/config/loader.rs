use super::{default_config_path, DeskConfig, VALID_LOG_LEVELS};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "UNIDESK_CONFIG";

impl DeskConfig {
    /// Load configuration from the real process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Load configuration with a custom environment lookup.
    ///
    /// An explicit path (argument or `UNIDESK_CONFIG`) must exist; the
    /// platform default path is only read when present.
    pub fn load_with<F>(explicit_path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| non_empty(&env, CONFIG_PATH_VAR).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.merge_env_vars(env);
        config.keywords = config.keywords.normalized();
        config.uncertainty_phrases = config
            .uncertainty_phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded config file {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Effective configuration as TOML, credentials omitted.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment overrides. Empty values count as unset.
    pub fn merge_env_vars<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = non_empty(&env, "HUGGINGFACEHUB_API_TOKEN") {
            self.classifier.api_token = Some(token);
        }

        if let Some(key) = non_empty(&env, "GROQ_API_KEY") {
            self.synthesis.api_key = Some(key);
        }

        if let Some(model) = non_empty(&env, "GROQ_MODEL") {
            self.synthesis.model = model;
        }

        if let Some(key) = non_empty(&env, "TAVILY_API_KEY") {
            self.web_search.api_key = Some(key);
        }

        if let Some(domain) = non_empty(&env, "UNIVERSITY_DOMAIN") {
            self.web_search.domain = domain;
        }

        if let Some(key) = non_empty(&env, "PINECONE_API_KEY") {
            self.knowledge.pinecone_api_key = Some(key);
        }

        if let Some(host) = non_empty(&env, "PINECONE_INDEX_HOST") {
            self.knowledge.pinecone_index_host = Some(host);
        }

        if let Some(dir) = non_empty(&env, "UNIDESK_KNOWLEDGE_DIR") {
            self.knowledge.knowledge_dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = non_empty(&env, "UNIDESK_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Check every setting and report all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            problems.push(format!(
                "log_level '{}' must be one of {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !(0.0..=1.0).contains(&self.classifier.min_confidence) {
            problems.push(format!(
                "classifier.min_confidence {} must be within [0, 1]",
                self.classifier.min_confidence
            ));
        }

        if self.web_search.max_results == 0 {
            problems.push("web_search.max_results must be at least 1".to_string());
        }

        if self.web_search.domain.trim().is_empty() {
            problems.push("web_search.domain must not be empty".to_string());
        }

        if self.knowledge.top_k == 0 {
            problems.push("knowledge.top_k must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.knowledge.score_threshold) {
            problems.push(format!(
                "knowledge.score_threshold {} must be within [0, 1]",
                self.knowledge.score_threshold
            ));
        }

        if self.knowledge.chunk_size == 0 {
            problems.push("knowledge.chunk_size must be at least 1".to_string());
        } else if self.knowledge.chunk_overlap >= self.knowledge.chunk_size {
            problems.push(format!(
                "knowledge.chunk_overlap {} must be smaller than chunk_size {}",
                self.knowledge.chunk_overlap, self.knowledge.chunk_size
            ));
        }

        if self.keywords.casual.is_empty() {
            problems.push("keywords.casual must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }
}

fn non_empty<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).filter(|value| !value.trim().is_empty())
}
