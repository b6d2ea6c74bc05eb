//! End-to-end runs of the answering workflow against in-memory adapters
//!
//! Every adapter is a mock, so these tests exercise routing, stage bodies
//! and escalation without network access.

use std::sync::Arc;
use unidesk::abstractions::{MockRemoteClassifier, MockRetriever, MockSynthesizer, MockWebSearch};
use unidesk::classifier::IntentClassifier;
use unidesk::core::classify::{Intent, IntentLabel, KeywordRules};
use unidesk::core::evidence::{DocumentSnippet, WebResult};
use unidesk::core::ESCALATION_SENTINEL;
use unidesk::workflow::{Engine, Stage};
use unidesk::{ClassifierError, Error};

const CONFIDENT_ANSWER: &str =
    "Transcript verification requires a copy of your CNIC and the original transcript.";
const KNOWLEDGE_TEXT: &str =
    "Transcript verification: submit the original transcript and a CNIC copy at the registrar office.";
const GENERAL_QUERY: &str =
    "Which documents are required for transcript verification by the registrar office?";

struct Desk {
    engine: Engine,
    retriever: MockRetriever,
    web: MockWebSearch,
    synthesizer: MockSynthesizer,
}

fn desk_with(
    classifier: IntentClassifier,
    retriever: MockRetriever,
    web: MockWebSearch,
    synthesizer: MockSynthesizer,
) -> Desk {
    let engine = Engine::builder()
        .classifier(classifier)
        .retriever(Arc::new(retriever.clone()))
        .web_search(Arc::new(web.clone()))
        .synthesizer(Arc::new(synthesizer.clone()))
        .build()
        .unwrap();

    Desk {
        engine,
        retriever,
        web,
        synthesizer,
    }
}

fn keyword_desk(retriever: MockRetriever, web: MockWebSearch, synthesizer: MockSynthesizer) -> Desk {
    desk_with(
        IntentClassifier::keyword_only(KeywordRules::default()),
        retriever,
        web,
        synthesizer,
    )
}

fn scholarship_page() -> WebResult {
    WebResult::new(
        "Scholarships 2025",
        "https://example.edu.pk/scholarships",
        "Applications for merit scholarships close on 30 June.",
    )
}

#[tokio::test]
async fn test_casual_greeting_answers_directly() {
    let desk = keyword_desk(
        MockRetriever::with_docs(vec![DocumentSnippet::new(KNOWLEDGE_TEXT)]),
        MockWebSearch::with_results(vec![scholarship_page()]),
        MockSynthesizer::always("Hello! How can I help you today?"),
    );

    let response = desk.engine.invoke("Hello!").await.unwrap();

    assert_eq!(response.stages, vec![Stage::Classify, Stage::HandleCasual]);
    assert_eq!(response.answer, "Hello! How can I help you today?");
    assert!(!response.is_escalation());
    assert!(response.is_casual);
    assert_eq!(response.intent, Intent::Casual);
    assert!(response.knowledge_docs.is_empty());
    assert!(response.web_results.is_empty());
    assert_eq!(desk.retriever.call_count().await, 0);
    assert_eq!(desk.web.call_count().await, 0);
}

#[tokio::test]
async fn test_time_sensitive_query_takes_hybrid_path() {
    let remote = MockRemoteClassifier::new();
    remote.add_label(IntentLabel::TimeSensitive.text(), 0.92).await;

    let desk = desk_with(
        IntentClassifier::new(Some(Arc::new(remote.clone())), KeywordRules::default(), 0.4),
        MockRetriever::with_docs(vec![DocumentSnippet::new(
            "Merit scholarships are awarded each fall semester.",
        )]),
        MockWebSearch::with_results(vec![scholarship_page()]),
        MockSynthesizer::always("Merit scholarship applications close on 30 June this year."),
    );

    let response = desk
        .engine
        .invoke("When is the scholarship deadline?")
        .await
        .unwrap();

    assert_eq!(
        response.stages,
        vec![
            Stage::Classify,
            Stage::RetrieveKnowledge,
            Stage::CheckParallel,
            Stage::RetrieveWeb,
            Stage::ResolveHybrid,
            Stage::Escalate,
        ]
    );
    assert_eq!(response.intent, Intent::TimeSensitive);
    assert!(response.needs_web_search);
    assert_eq!(response.web_results, vec![scholarship_page()]);
    assert!(!response.is_escalation());

    let prompts = desk.synthesizer.called_prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].0.contains("Latest from the University Website"));
    assert!(prompts[0].0.contains("Merit scholarships are awarded"));
    assert_eq!(prompts[0].1, "When is the scholarship deadline?");
    assert_eq!(remote.call_count().await, 1);
}

#[tokio::test]
async fn test_no_evidence_anywhere_escalates() {
    let desk = keyword_desk(
        MockRetriever::empty(),
        MockWebSearch::empty(),
        MockSynthesizer::always(CONFIDENT_ANSWER),
    );

    let response = desk.engine.invoke(GENERAL_QUERY).await.unwrap();

    assert_eq!(
        response.stages,
        vec![
            Stage::Classify,
            Stage::RetrieveKnowledge,
            Stage::CheckParallel,
            Stage::ResolveWithFallbackCheck,
            Stage::WebFallback,
            Stage::Escalate,
        ]
    );
    assert_eq!(response.answer, ESCALATION_SENTINEL);
    assert!(response.escalated);
    assert!(response.low_confidence);
    assert_eq!(desk.synthesizer.call_count().await, 0);
    assert_eq!(desk.web.call_count().await, 1);
}

#[tokio::test]
async fn test_confident_knowledge_answer_skips_fallback() {
    let desk = keyword_desk(
        MockRetriever::with_docs(vec![DocumentSnippet::new(KNOWLEDGE_TEXT)]),
        MockWebSearch::with_results(vec![scholarship_page()]),
        MockSynthesizer::always(CONFIDENT_ANSWER),
    );

    let response = desk.engine.invoke(GENERAL_QUERY).await.unwrap();

    assert_eq!(
        response.stages,
        vec![
            Stage::Classify,
            Stage::RetrieveKnowledge,
            Stage::CheckParallel,
            Stage::ResolveWithFallbackCheck,
            Stage::Escalate,
        ]
    );
    assert_eq!(response.answer, CONFIDENT_ANSWER);
    assert!(response.web_results.is_empty());
    assert_eq!(desk.web.call_count().await, 0);
}

#[tokio::test]
async fn test_uncertain_answer_recovered_by_web_fallback() {
    let synthesizer = MockSynthesizer::new();
    synthesizer
        .add_response("I don't have enough information to answer this question.")
        .await;
    synthesizer
        .add_response("Bring your original transcript and CNIC copy to the registrar office.")
        .await;

    let desk = keyword_desk(
        MockRetriever::with_docs(vec![DocumentSnippet::new(KNOWLEDGE_TEXT)]),
        MockWebSearch::with_results(vec![scholarship_page()]),
        synthesizer,
    );

    let response = desk.engine.invoke(GENERAL_QUERY).await.unwrap();

    assert_eq!(response.stages.len(), 6);
    assert_eq!(response.stages[4], Stage::WebFallback);
    assert!(!response.low_confidence);
    assert!(!response.is_escalation());
    assert_eq!(response.web_results.len(), 1);
    assert_eq!(desk.synthesizer.call_count().await, 2);
}

#[tokio::test]
async fn test_fallback_answer_admitting_ignorance_still_escalates() {
    let synthesizer = MockSynthesizer::new();
    synthesizer
        .add_response("Honestly, I don't know where that is listed on the website.")
        .await;

    let desk = keyword_desk(
        MockRetriever::empty(),
        MockWebSearch::with_results(vec![scholarship_page()]),
        synthesizer,
    );

    let response = desk.engine.invoke(GENERAL_QUERY).await.unwrap();

    assert!(!response.low_confidence);
    assert_eq!(response.answer, ESCALATION_SENTINEL);
}

#[tokio::test]
async fn test_retrieval_failure_is_not_fatal() {
    let retriever = MockRetriever::empty();
    retriever.add_error("index unreachable").await;

    let desk = keyword_desk(
        retriever,
        MockWebSearch::empty(),
        MockSynthesizer::always(CONFIDENT_ANSWER),
    );

    let response = desk.engine.invoke(GENERAL_QUERY).await.unwrap();
    assert!(response.knowledge_docs.is_empty());
    assert!(response.is_escalation());
}

#[tokio::test]
async fn test_synthesis_failure_propagates() {
    let synthesizer = MockSynthesizer::new();
    synthesizer.add_error("service unavailable").await;

    let desk = keyword_desk(MockRetriever::empty(), MockWebSearch::empty(), synthesizer);

    match desk.engine.invoke("hi").await {
        Err(Error::Synthesis(msg)) => assert!(msg.contains("service unavailable")),
        other => panic!("expected synthesis error, got {:?}", other.map(|r| r.answer)),
    }
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_keywords() {
    let remote = MockRemoteClassifier::new();
    remote.add_error(ClassifierError::Status(503)).await;

    let desk = desk_with(
        IntentClassifier::new(Some(Arc::new(remote)), KeywordRules::default(), 0.4),
        MockRetriever::empty(),
        MockWebSearch::empty(),
        MockSynthesizer::always("Hi there, what would you like to know?"),
    );

    let response = desk.engine.invoke("Hello!").await.unwrap();
    assert_eq!(response.stages, vec![Stage::Classify, Stage::HandleCasual]);
}

#[tokio::test]
async fn test_concurrent_requests_do_not_share_context() {
    let desk = keyword_desk(
        MockRetriever::with_docs(vec![DocumentSnippet::new(KNOWLEDGE_TEXT)]),
        MockWebSearch::empty(),
        MockSynthesizer::always(CONFIDENT_ANSWER),
    );

    let (casual, general) = tokio::join!(desk.engine.invoke("hi"), desk.engine.invoke(GENERAL_QUERY));
    let (casual, general) = (casual.unwrap(), general.unwrap());

    assert!(casual.knowledge_docs.is_empty());
    assert_eq!(casual.stages.len(), 2);
    assert_eq!(general.knowledge_docs.len(), 1);
    assert_eq!(general.intent, Intent::General);
}
