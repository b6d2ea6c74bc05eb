//! Remote zero-shot classifier abstraction
//!
//! Implementations only rank candidate labels. Deciding what to do with a
//! weak or failed ranking belongs to the caller.

use crate::config::ClassifierSettings;
use crate::core::classify::LabelScore;
use crate::error::{ClassifierError, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// Trait for remote label ranking
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Rank `labels` for `query`, best first.
    async fn rank(
        &self,
        query: &str,
        labels: &[&str],
    ) -> std::result::Result<Vec<LabelScore>, ClassifierError>;
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
}

/// The inference router answers in one of two shapes depending on the backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Ranked(Vec<LabelScore>),
    Columns { labels: Vec<String>, scores: Vec<f64> },
}

/// Pure: Normalise either response shape into a best-first ranking
fn into_ranking(
    response: ZeroShotResponse,
) -> std::result::Result<Vec<LabelScore>, ClassifierError> {
    let mut ranking = match response {
        ZeroShotResponse::Ranked(ranking) => ranking,
        ZeroShotResponse::Columns { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(ClassifierError::Malformed(format!(
                    "{} labels but {} scores",
                    labels.len(),
                    scores.len()
                )));
            }
            labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect()
        }
    };

    if ranking.is_empty() {
        return Err(ClassifierError::Malformed("empty ranking".to_string()));
    }

    ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranking)
}

/// HuggingFace inference router client for zero-shot classification
pub struct HuggingFaceClassifier {
    client: Client,
    url: String,
    api_token: String,
}

impl HuggingFaceClassifier {
    pub fn new(settings: &ClassifierSettings, api_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!(
                "{}/{}",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
            api_token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteClassifier for HuggingFaceClassifier {
    async fn rank(
        &self,
        query: &str,
        labels: &[&str],
    ) -> std::result::Result<Vec<LabelScore>, ClassifierError> {
        let request = ZeroShotRequest {
            inputs: query,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status().as_u16()));
        }

        let body: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let ranking = into_ranking(body)?;
        trace!("Zero-shot ranking: {:?}", ranking);
        Ok(ranking)
    }
}

/// Mock remote classifier for testing
#[derive(Clone, Default)]
pub struct MockRemoteClassifier {
    responses: Arc<Mutex<VecDeque<std::result::Result<Vec<LabelScore>, ClassifierError>>>>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockRemoteClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a ranking with a single label at `score`.
    pub async fn add_label(&self, label: &str, score: f64) {
        self.add_ranking(vec![LabelScore {
            label: label.to_string(),
            score,
        }])
        .await;
    }

    pub async fn add_ranking(&self, ranking: Vec<LabelScore>) {
        self.responses.lock().await.push_back(Ok(ranking));
    }

    pub async fn add_error(&self, error: ClassifierError) {
        self.responses.lock().await.push_back(Err(error));
    }

    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

#[async_trait]
impl RemoteClassifier for MockRemoteClassifier {
    async fn rank(
        &self,
        query: &str,
        _labels: &[&str],
    ) -> std::result::Result<Vec<LabelScore>, ClassifierError> {
        self.queries.lock().await.push(query.to_string());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ClassifierError::Request("No mock response configured".to_string())))
    }
}
