//! Composition root
//!
//! Every adapter is constructed exactly once here and handed to the engine.
//! Missing optional credentials select a degraded adapter instead of failing.

use crate::abstractions::{
    AnswerSynthesizer, GroqSynthesizer, HuggingFaceClassifier, KnowledgeRetriever,
    LexicalRetriever, PineconeRetriever, RemoteClassifier, TavilySearch, WebSearch,
};
use crate::classifier::IntentClassifier;
use crate::config::DeskConfig;
use crate::error::{Error, Result};
use crate::workflow::{Engine, EngineSettings};
use std::sync::Arc;
use tracing::{info, warn};

/// Adapter handles an engine is assembled from.
pub struct Adapters {
    pub classifier: IntentClassifier,
    pub retriever: Arc<dyn KnowledgeRetriever>,
    pub web_search: Arc<dyn WebSearch>,
    pub synthesizer: Arc<dyn AnswerSynthesizer>,
}

/// Intent classifier for the process; keyword-only when no token is configured.
pub fn build_classifier(config: &DeskConfig) -> Result<IntentClassifier> {
    let remote: Option<Arc<dyn RemoteClassifier>> = match &config.classifier.api_token {
        Some(token) => {
            let client = HuggingFaceClassifier::new(&config.classifier, token.clone())?;
            info!("Zero-shot classifier enabled ({})", client.url());
            Some(Arc::new(client))
        }
        None => {
            warn!("HUGGINGFACEHUB_API_TOKEN not set, using keyword classification only");
            None
        }
    };

    Ok(IntentClassifier::new(
        remote,
        config.keywords.clone(),
        config.classifier.min_confidence,
    ))
}

/// Knowledge retriever: Pinecone when fully configured, else a local
/// directory index, else an empty index.
pub fn build_retriever(config: &DeskConfig) -> Result<Arc<dyn KnowledgeRetriever>> {
    let knowledge = &config.knowledge;

    if let Some((api_key, host)) = knowledge.pinecone() {
        match &config.classifier.api_token {
            Some(token) => {
                let retriever =
                    PineconeRetriever::new(knowledge, api_key.to_string(), host, token.clone())?;
                info!("Using Pinecone index at {}", host);
                return Ok(Arc::new(retriever));
            }
            None => warn!(
                "Pinecone is configured but HUGGINGFACEHUB_API_TOKEN is missing for query embeddings"
            ),
        }
    }

    if let Some(dir) = &knowledge.knowledge_dir {
        return Ok(Arc::new(LexicalRetriever::from_dir(dir, knowledge)?));
    }

    warn!("No knowledge store configured, retrieval will return no documents");
    Ok(Arc::new(LexicalRetriever::empty(knowledge)))
}

pub fn build_adapters(config: &DeskConfig) -> Result<Adapters> {
    let api_key = config.synthesis.api_key.clone().ok_or_else(|| {
        Error::Config("GROQ_API_KEY is required for answer generation".to_string())
    })?;

    let web_search = TavilySearch::new(&config.web_search)?;
    if web_search.is_enabled() {
        info!("Web search restricted to {}", web_search.domain());
    }

    Ok(Adapters {
        classifier: build_classifier(config)?,
        retriever: build_retriever(config)?,
        web_search: Arc::new(web_search),
        synthesizer: Arc::new(GroqSynthesizer::new(&config.synthesis, api_key)?),
    })
}

/// Engine from already-built adapters.
pub fn build_engine_with(adapters: Adapters, config: &DeskConfig) -> Result<Engine> {
    Engine::builder()
        .classifier(adapters.classifier)
        .retriever(adapters.retriever)
        .web_search(adapters.web_search)
        .synthesizer(adapters.synthesizer)
        .settings(EngineSettings::from(config))
        .build()
}

pub fn build_engine(config: &DeskConfig) -> Result<Engine> {
    build_engine_with(build_adapters(config)?, config)
}
