//! Hosted vector index retriever
//!
//! Embeds the query through the HuggingFace feature-extraction pipeline and
//! runs a similarity query against a Pinecone index whose records carry the
//! chunk text under the `text` metadata key.

use super::KnowledgeRetriever;
use crate::config::KnowledgeSettings;
use crate::core::evidence::DocumentSnippet;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

const TEXT_KEY: &str = "text";

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    #[serde(default)]
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Map<String, Value>,
}

pub struct PineconeRetriever {
    client: Client,
    embed_url: String,
    embed_token: String,
    query_url: String,
    api_key: String,
    top_k: usize,
    score_threshold: f32,
}

impl PineconeRetriever {
    pub fn new(
        settings: &KnowledgeSettings,
        api_key: String,
        index_host: &str,
        embed_token: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let host = index_host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Ok(Self {
            client,
            embed_url: format!(
                "{}/{}/pipeline/feature-extraction",
                settings.embedding_endpoint.trim_end_matches('/'),
                settings.embedding_model
            ),
            embed_token,
            query_url: format!("{}/query", host),
            api_key,
            top_k: settings.top_k,
            score_threshold: settings.score_threshold,
        })
    }

    async fn embed(&self, query: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.embed_url)
            .bearer_auth(&self.embed_token)
            .json(&EmbedRequest { inputs: query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Retrieval(format!(
                "embedding request returned {}",
                response.status()
            )));
        }

        parse_embedding(response.json().await?)
    }

    async fn query(&self, vector: &[f32]) -> Result<QueryResponse> {
        let response = self
            .client
            .post(&self.query_url)
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k: self.top_k,
                include_metadata: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Retrieval(format!(
                "index query returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl KnowledgeRetriever for PineconeRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentSnippet>> {
        let vector = self.embed(query).await?;
        let response = self.query(&vector).await?;
        let total = response.matches.len();
        let snippets = matches_to_snippets(response.matches, self.score_threshold);
        debug!(
            "Index returned {} matches, {} above threshold {}",
            total,
            snippets.len(),
            self.score_threshold
        );
        Ok(snippets)
    }
}

/// Pure: Accept a pooled vector, or a batch holding exactly one pooled vector
fn parse_embedding(value: Value) -> Result<Vec<f32>> {
    fn as_vector(items: &[Value]) -> Option<Vec<f32>> {
        items
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect()
    }

    let Value::Array(items) = value else {
        return Err(Error::Retrieval("embedding response is not an array".to_string()));
    };

    let vector = match items.as_slice() {
        [Value::Array(inner)] => as_vector(inner),
        _ => as_vector(&items),
    };

    match vector {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Retrieval(
            "embedding response is not a single numeric vector".to_string(),
        )),
    }
}

/// Pure: Keep matches at or above `threshold`, best first
fn matches_to_snippets(mut matches: Vec<Match>, threshold: f32) -> Vec<DocumentSnippet> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    matches
        .into_iter()
        .filter(|m| m.score >= threshold)
        .filter_map(|mut m| {
            let content = match m.metadata.remove(TEXT_KEY) {
                Some(Value::String(text)) => text,
                _ => return None,
            };

            let mut snippet = DocumentSnippet::new(content)
                .with_metadata("id", Value::String(m.id))
                .with_metadata("score", Value::from(m.score));
            for (key, value) in m.metadata {
                snippet = snippet.with_metadata(key, value);
            }
            Some(snippet)
        })
        .collect()
}
