use crate::core::classify::{Classification, Intent};
use crate::core::evidence::{DocumentSnippet, WebResult};
use serde::Serialize;

/// Everything one request accumulates on its way through the stage graph.
///
/// Each stage takes the context by value and hands it back, so a context is
/// never shared between requests or stages running at the same time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContext {
    query: String,
    classification: Option<Classification>,
    knowledge_docs: Vec<DocumentSnippet>,
    web_results: Vec<WebResult>,
    low_confidence: bool,
    answer: Option<String>,
}

impl RequestContext {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            classification: None,
            knowledge_docs: Vec::new(),
            web_results: Vec::new(),
            low_confidence: false,
            answer: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn intent(&self) -> Option<Intent> {
        self.classification.map(|c| c.intent)
    }

    pub fn is_casual(&self) -> bool {
        self.classification.is_some_and(|c| c.is_casual)
    }

    pub fn needs_web_search(&self) -> bool {
        self.classification.is_some_and(|c| c.needs_web_search)
    }

    pub fn knowledge_docs(&self) -> &[DocumentSnippet] {
        &self.knowledge_docs
    }

    pub fn web_results(&self) -> &[WebResult] {
        &self.web_results
    }

    pub fn low_confidence(&self) -> bool {
        self.low_confidence
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Record the classifier decision. Only the first call has any effect.
    pub fn classified(mut self, classification: Classification) -> Self {
        debug_assert!(
            self.classification.is_none(),
            "classification is write-once"
        );
        self.classification.get_or_insert(classification);
        self
    }

    /// Append knowledge snippets; earlier snippets are never removed.
    pub fn with_knowledge(mut self, docs: Vec<DocumentSnippet>) -> Self {
        self.knowledge_docs.extend(docs);
        self
    }

    /// Replace web results; the most recent search wins.
    pub fn with_web_results(mut self, results: Vec<WebResult>) -> Self {
        self.web_results = results;
        self
    }

    pub fn with_low_confidence(mut self, low_confidence: bool) -> Self {
        self.low_confidence = low_confidence;
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn without_answer(mut self) -> Self {
        self.answer = None;
        self
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<Classification>,
        Vec<DocumentSnippet>,
        Vec<WebResult>,
        bool,
        Option<String>,
    ) {
        (
            self.classification,
            self.knowledge_docs,
            self.web_results,
            self.low_confidence,
            self.answer,
        )
    }
}
