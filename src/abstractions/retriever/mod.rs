//! Knowledge retrieval abstraction
//!
//! A retriever turns a query into relevance-ordered snippets from a
//! pre-built index. "No match" is an empty list, not an error.

use crate::core::evidence::DocumentSnippet;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod lexical;
pub mod pinecone;

pub use lexical::LexicalRetriever;
pub use pinecone::PineconeRetriever;

/// Trait for knowledge store lookups
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Snippets ordered from most to least relevant.
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentSnippet>>;
}

/// Mock retriever for testing
///
/// Queued responses are consumed first; afterwards every call returns the
/// default snippets.
#[derive(Clone, Default)]
pub struct MockRetriever {
    default_docs: Vec<DocumentSnippet>,
    queued: Arc<Mutex<VecDeque<Result<Vec<DocumentSnippet>>>>>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockRetriever {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_docs(docs: Vec<DocumentSnippet>) -> Self {
        Self {
            default_docs: docs,
            ..Self::default()
        }
    }

    pub async fn add_error(&self, message: impl Into<String>) {
        self.queued
            .lock()
            .await
            .push_back(Err(Error::Retrieval(message.into())));
    }

    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

#[async_trait]
impl KnowledgeRetriever for MockRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentSnippet>> {
        self.queries.lock().await.push(query.to_string());

        if let Some(queued) = self.queued.lock().await.pop_front() {
            return queued;
        }
        Ok(self.default_docs.clone())
    }
}
