//! Engine entry point
//!
//! The engine owns one handle to each adapter and drives a fresh
//! [`RequestContext`] through the stage graph for every call to
//! [`Engine::invoke`]. Nothing is shared between requests except the
//! adapters themselves, which must tolerate concurrent use.

use super::context::RequestContext;
use super::response::DeskResponse;
use super::routing::{route_after_classify, route_after_fallback_check, route_after_vector_retrieval};
use super::stage::Stage;
use crate::abstractions::{AnswerSynthesizer, KnowledgeRetriever, WebSearch};
use crate::classifier::{ClassifierOutcome, IntentClassifier};
use crate::config::DeskConfig;
use crate::core::evidence::DEFAULT_UNCERTAINTY_PHRASES;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// Thresholds the stage bodies consult.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Joined knowledge text shorter than this skips generation.
    pub min_context_length: usize,
    /// Final answers shorter than this escalate.
    pub min_answer_length: usize,
    pub max_web_results: usize,
    /// Lower-cased phrases marking a knowledge-only answer as uncertain.
    pub uncertainty_phrases: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_context_length: 50,
            min_answer_length: 40,
            max_web_results: 3,
            uncertainty_phrases: DEFAULT_UNCERTAINTY_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl From<&DeskConfig> for EngineSettings {
    fn from(config: &DeskConfig) -> Self {
        Self {
            min_context_length: config.thresholds.min_context_length,
            min_answer_length: config.thresholds.min_answer_length,
            max_web_results: config.web_search.max_results,
            uncertainty_phrases: config
                .uncertainty_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }
}

pub struct Engine {
    pub(super) classifier: IntentClassifier,
    pub(super) retriever: Arc<dyn KnowledgeRetriever>,
    pub(super) web_search: Arc<dyn WebSearch>,
    pub(super) synthesizer: Arc<dyn AnswerSynthesizer>,
    pub(super) settings: EngineSettings,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Classification only, without running the rest of the graph.
    pub async fn classify(&self, query: &str) -> ClassifierOutcome {
        self.classifier.classify(query).await
    }

    /// Answer one query.
    ///
    /// Only an answer synthesis failure is returned as an error. Every other
    /// adapter problem degrades to empty evidence and the request continues.
    pub async fn invoke(&self, query: &str) -> Result<DeskResponse> {
        let span = tracing::info_span!(
            "desk_request",
            request_id = %Uuid::new_v4(),
            query_len = query.chars().count()
        );

        self.run(query).instrument(span).await
    }

    async fn run(&self, query: &str) -> Result<DeskResponse> {
        let started = Instant::now();
        let mut ctx = RequestContext::new(query);
        let mut visited = Vec::with_capacity(Stage::ALL.len());
        let mut current = Some(Stage::ENTRY);

        while let Some(stage) = current {
            debug!("Entering stage {}", stage);
            ctx = self.run_stage(stage, ctx).await?;
            visited.push(stage);
            log_route(stage, &ctx);
            current = stage.next(&ctx);
            if let Some(next) = current {
                debug!("Routing {} -> {}", stage, next);
            }
        }

        let response = DeskResponse::from_context(ctx, visited, started.elapsed());
        info!(
            intent = %response.intent,
            escalated = response.escalated,
            web_results = response.web_results.len(),
            "Request finished after {} stages in {:?}",
            response.stages.len(),
            response.elapsed
        );
        Ok(response)
    }

    async fn run_stage(&self, stage: Stage, ctx: RequestContext) -> Result<RequestContext> {
        match stage {
            Stage::Classify => Ok(self.classify_stage(ctx).await),
            Stage::HandleCasual => self.handle_casual(ctx).await,
            Stage::RetrieveKnowledge => Ok(self.retrieve_knowledge(ctx).await),
            Stage::CheckParallel => Ok(ctx),
            Stage::RetrieveWeb => Ok(self.retrieve_web(ctx).await),
            Stage::ResolveHybrid => self.resolve_hybrid(ctx).await,
            Stage::ResolveWithFallbackCheck => self.resolve_with_fallback_check(ctx).await,
            Stage::WebFallback => self.web_fallback(ctx).await,
            Stage::Escalate => Ok(self.escalate(ctx)),
        }
    }
}

/// Junction decisions, logged under the same labels the routing enums print.
fn log_route(stage: Stage, ctx: &RequestContext) {
    match stage {
        Stage::Classify => info!("Route after classify: {}", route_after_classify(ctx)),
        Stage::CheckParallel => {
            debug!("Route after retrieval: {}", route_after_vector_retrieval(ctx))
        }
        Stage::ResolveWithFallbackCheck => {
            debug!("Route after fallback check: {}", route_after_fallback_check(ctx))
        }
        _ => {}
    }
}

/// Assembles an [`Engine`] from adapter handles.
#[derive(Default)]
pub struct EngineBuilder {
    classifier: Option<IntentClassifier>,
    retriever: Option<Arc<dyn KnowledgeRetriever>>,
    web_search: Option<Arc<dyn WebSearch>>,
    synthesizer: Option<Arc<dyn AnswerSynthesizer>>,
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn web_search(mut self, web_search: Arc<dyn WebSearch>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn AnswerSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<Engine> {
        let missing = |what: &str| Error::Config(format!("Engine requires a {what}"));

        Ok(Engine {
            classifier: self.classifier.ok_or_else(|| missing("classifier"))?,
            retriever: self.retriever.ok_or_else(|| missing("knowledge retriever"))?,
            web_search: self.web_search.ok_or_else(|| missing("web search adapter"))?,
            synthesizer: self.synthesizer.ok_or_else(|| missing("answer synthesizer"))?,
            settings: self.settings,
        })
    }
}
