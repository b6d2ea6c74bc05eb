//! Intent classifier adapter
//!
//! Wraps the optional remote zero-shot classifier and the keyword rules.
//! The remote path reports failure as a [`ClassifierError`]; the decision to
//! fall back to keywords is made by [`IntentClassifier::classify`] and is
//! recorded in the returned [`ClassifierOutcome`].

use crate::abstractions::RemoteClassifier;
use crate::core::classify::{
    classify_by_keywords, select_label, Classification, IntentLabel, KeywordRules,
};
use crate::error::ClassifierError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Remote,
    Keywords,
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationSource::Remote => write!(f, "remote"),
            ClassificationSource::Keywords => write!(f, "keywords"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutcome {
    pub classification: Classification,
    pub source: ClassificationSource,
    /// Why the remote path was not used, when it wasn't.
    pub fallback_reason: Option<ClassifierError>,
}

impl ClassifierOutcome {
    pub fn remote(classification: Classification) -> Self {
        Self {
            classification,
            source: ClassificationSource::Remote,
            fallback_reason: None,
        }
    }

    pub fn keywords(classification: Classification, reason: ClassifierError) -> Self {
        Self {
            classification,
            source: ClassificationSource::Keywords,
            fallback_reason: Some(reason),
        }
    }
}

/// Classifier built once at startup and shared by every request.
///
/// Without a remote backend it stays in keyword-only mode for its whole
/// lifetime; the remote call is never retried per request.
#[derive(Clone)]
pub struct IntentClassifier {
    remote: Option<Arc<dyn RemoteClassifier>>,
    rules: KeywordRules,
    min_confidence: f64,
}

impl IntentClassifier {
    pub fn new(
        remote: Option<Arc<dyn RemoteClassifier>>,
        rules: KeywordRules,
        min_confidence: f64,
    ) -> Self {
        Self {
            remote,
            rules: rules.normalized(),
            min_confidence,
        }
    }

    pub fn keyword_only(rules: KeywordRules) -> Self {
        Self::new(None, rules, 0.4)
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn rules(&self) -> &KeywordRules {
        &self.rules
    }

    /// Remote path only: rank labels and apply the confidence threshold.
    pub async fn classify_remote(&self, query: &str) -> Result<Classification, ClassifierError> {
        let remote = self.remote.as_ref().ok_or(ClassifierError::Unavailable)?;
        let labels = IntentLabel::candidate_texts();
        let ranking = remote.rank(query, &labels).await?;
        select_label(&ranking, self.min_confidence)
    }

    /// Keyword path only.
    pub fn classify_keywords(&self, query: &str) -> Classification {
        classify_by_keywords(query, &self.rules)
    }

    /// Remote classification, falling back to keywords on any error.
    pub async fn classify(&self, query: &str) -> ClassifierOutcome {
        match self.classify_remote(query).await {
            Ok(classification) => ClassifierOutcome::remote(classification),
            Err(reason) => {
                match &reason {
                    ClassifierError::Unavailable => {
                        debug!("Keyword-only mode, classifying with keywords")
                    }
                    ClassifierError::LowConfidence { .. } => {
                        debug!("Remote classification not confident: {}", reason)
                    }
                    _ => warn!("Remote classification failed: {}, using keywords", reason),
                }
                ClassifierOutcome::keywords(self.classify_keywords(query), reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstractions::MockRemoteClassifier;
    use crate::core::classify::Intent;

    fn with_mock(mock: &MockRemoteClassifier) -> IntentClassifier {
        IntentClassifier::new(
            Some(Arc::new(mock.clone())),
            KeywordRules::default(),
            0.4,
        )
    }

    #[tokio::test]
    async fn test_keyword_only_mode_never_calls_remote() {
        let classifier = IntentClassifier::keyword_only(KeywordRules::default());
        assert!(!classifier.is_remote_enabled());

        let outcome = classifier.classify("hi").await;
        assert_eq!(outcome.source, ClassificationSource::Keywords);
        assert_eq!(outcome.fallback_reason, Some(ClassifierError::Unavailable));
        assert_eq!(outcome.classification, Classification::casual());
    }

    #[tokio::test]
    async fn test_confident_remote_label_wins() {
        let mock = MockRemoteClassifier::new();
        mock.add_label(IntentLabel::TimeSensitive.text(), 0.8).await;

        let outcome = with_mock(&mock).classify("hi").await;
        assert_eq!(outcome.source, ClassificationSource::Remote);
        assert_eq!(outcome.classification.intent, Intent::TimeSensitive);
        assert!(outcome.classification.needs_web_search);
    }

    #[tokio::test]
    async fn test_low_confidence_falls_back_to_keywords() {
        let mock = MockRemoteClassifier::new();
        mock.add_label(IntentLabel::Admissions.text(), 0.2).await;

        let outcome = with_mock(&mock).classify("hello").await;
        assert_eq!(outcome.source, ClassificationSource::Keywords);
        assert!(matches!(
            outcome.fallback_reason,
            Some(ClassifierError::LowConfidence { .. })
        ));
        assert_eq!(outcome.classification, Classification::casual());
    }

    #[tokio::test]
    async fn test_remote_error_falls_back_to_keywords() {
        let mock = MockRemoteClassifier::new();
        mock.add_error(ClassifierError::Status(500)).await;

        let outcome = with_mock(&mock)
            .classify("what is the admission deadline this week")
            .await;
        assert_eq!(outcome.fallback_reason, Some(ClassifierError::Status(500)));
        assert_eq!(outcome.classification.intent, Intent::Admissions);
        assert!(outcome.classification.needs_web_search);
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_classify_remote_reports_unavailable() {
        let classifier = IntentClassifier::keyword_only(KeywordRules::default());
        assert_eq!(
            classifier.classify_remote("hi").await,
            Err(ClassifierError::Unavailable)
        );
    }
}
