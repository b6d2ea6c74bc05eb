//! Stage bodies
//!
//! Each body takes the request context by value and returns the updated
//! context. Bodies never choose the next stage; see [`super::stage`].

use super::context::RequestContext;
use super::engine::Engine;
use crate::core::escalation::{should_escalate, ESCALATION_SENTINEL, NO_INFORMATION_ANSWER};
use crate::core::evidence::{
    contains_uncertainty, format_web_results, has_sufficient_context, join_snippets,
};
use crate::core::prompts::{
    casual_prompt, hybrid_prompt, knowledge_prompt, knowledge_with_fallback_prompt,
    web_fallback_prompt, CASUAL_FALLBACK_ANSWER,
};
use crate::error::Result;
use tracing::{debug, info, warn};

impl Engine {
    pub(super) async fn classify_stage(&self, ctx: RequestContext) -> RequestContext {
        let outcome = self.classifier.classify(ctx.query()).await;
        let c = outcome.classification;
        info!(
            "Classified as {} (casual={}, web={}) via {}",
            c.intent, c.is_casual, c.needs_web_search, outcome.source
        );
        ctx.classified(c)
    }

    pub(super) async fn handle_casual(&self, ctx: RequestContext) -> Result<RequestContext> {
        let answer = self
            .synthesizer
            .generate(&casual_prompt(), ctx.query())
            .await?;

        if answer.trim().is_empty() {
            debug!("Empty casual reply, using canned greeting");
            return Ok(ctx.with_answer(CASUAL_FALLBACK_ANSWER));
        }
        Ok(ctx.with_answer(answer))
    }

    pub(super) async fn retrieve_knowledge(&self, ctx: RequestContext) -> RequestContext {
        let docs = match self.retriever.retrieve(ctx.query()).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Knowledge retrieval failed: {}, continuing without documents", e);
                Vec::new()
            }
        };
        debug!("Retrieved {} knowledge snippets", docs.len());
        ctx.with_knowledge(docs)
    }

    pub(super) async fn retrieve_web(&self, ctx: RequestContext) -> RequestContext {
        let results = self
            .web_search
            .search(ctx.query(), self.settings.max_web_results)
            .await;
        debug!("Web search returned {} results", results.len());
        ctx.with_web_results(results)
    }

    pub(super) async fn resolve_hybrid(&self, ctx: RequestContext) -> Result<RequestContext> {
        let knowledge = join_snippets(ctx.knowledge_docs());
        let web = format_web_results(ctx.web_results());

        let instructions = if web.is_empty() {
            debug!("No web evidence, answering from knowledge only");
            knowledge_prompt(&knowledge)
        } else {
            hybrid_prompt(&knowledge, &web)
        };

        let answer = self
            .synthesizer
            .generate(&instructions, ctx.query())
            .await?;
        Ok(ctx.with_answer(answer))
    }

    pub(super) async fn resolve_with_fallback_check(
        &self,
        ctx: RequestContext,
    ) -> Result<RequestContext> {
        let knowledge = join_snippets(ctx.knowledge_docs());

        if !has_sufficient_context(
            ctx.knowledge_docs(),
            &knowledge,
            self.settings.min_context_length,
        ) {
            info!(
                "Insufficient knowledge context ({} docs, {} chars), skipping generation",
                ctx.knowledge_docs().len(),
                knowledge.chars().count()
            );
            return Ok(ctx.with_low_confidence(true));
        }

        let answer = self
            .synthesizer
            .generate(&knowledge_with_fallback_prompt(&knowledge), ctx.query())
            .await?;

        let uncertain = contains_uncertainty(&answer, &self.settings.uncertainty_phrases);
        if uncertain {
            info!("Knowledge-only answer is uncertain");
        }
        Ok(ctx.with_answer(answer).with_low_confidence(uncertain))
    }

    pub(super) async fn web_fallback(&self, ctx: RequestContext) -> Result<RequestContext> {
        let results = self
            .web_search
            .search(ctx.query(), self.settings.max_web_results)
            .await;
        let ctx = ctx.with_web_results(results);

        if ctx.web_results().is_empty() {
            info!("Web fallback found nothing");
            if ctx.answer().is_none() {
                return Ok(ctx.with_answer(NO_INFORMATION_ANSWER));
            }
            return Ok(ctx);
        }

        let knowledge = join_snippets(ctx.knowledge_docs());
        let web = format_web_results(ctx.web_results());
        let answer = self
            .synthesizer
            .generate(&web_fallback_prompt(&knowledge, &web), ctx.query())
            .await?;

        Ok(ctx.with_answer(answer).with_low_confidence(false))
    }

    pub(super) fn escalate(&self, ctx: RequestContext) -> RequestContext {
        if should_escalate(
            ctx.answer(),
            ctx.low_confidence(),
            self.settings.min_answer_length,
        ) {
            info!("Escalating to a human");
            return ctx.with_answer(ESCALATION_SENTINEL);
        }
        ctx
    }
}
