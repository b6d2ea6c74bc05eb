//! Web search abstraction
//!
//! Searches are restricted to a single configured domain and never fail
//! from the caller's point of view: any problem yields an empty result list.

use crate::config::WebSearchSettings;
use crate::core::evidence::WebResult;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Trait for domain-restricted web search
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Return at most `max_results` ranked results. Never errors.
    async fn search(&self, query: &str, max_results: usize) -> Vec<WebResult>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    include_domains: [&'a str; 1],
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WebResult>,
}

/// Tavily search client restricted to the university domain
pub struct TavilySearch {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    domain: String,
    search_depth: String,
}

impl TavilySearch {
    pub fn new(settings: &WebSearchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            endpoint: settings.endpoint.clone(),
            domain: settings.domain.clone(),
            search_depth: settings.search_depth.clone(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_search(&self, api_key: &str, query: &str, max_results: usize) -> Result<Vec<WebResult>> {
        let request = SearchRequest {
            query,
            include_domains: [self.domain.as_str()],
            max_results,
            search_depth: &self.search_depth,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::WebSearch(format!("{}: {}", status, body)));
        }

        let body: SearchResponse = response.json().await?;
        let mut results = body.results;
        results.truncate(max_results);
        Ok(results)
    }
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<WebResult> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("TAVILY_API_KEY not set, skipping web search");
            return Vec::new();
        };

        match self.try_search(api_key, query, max_results).await {
            Ok(results) => {
                debug!("Web search on {} returned {} results", self.domain, results.len());
                results
            }
            Err(e) => {
                warn!("Web search error: {}", e);
                Vec::new()
            }
        }
    }
}

/// Mock web search for testing
///
/// Returns the same configured results for every query, capped at
/// `max_results`, and records each query.
#[derive(Clone, Default)]
pub struct MockWebSearch {
    results: Vec<WebResult>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockWebSearch {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_results(results: Vec<WebResult>) -> Self {
        Self {
            results,
            queries: Arc::default(),
        }
    }

    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<WebResult> {
        self.queries.lock().await.push(query.to_string());
        self.results.iter().take(max_results).cloned().collect()
    }
}
