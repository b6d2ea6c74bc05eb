//! Abstraction layers for external collaborators
//!
//! Every service the desk depends on (intent classifier, knowledge store,
//! web search, answer synthesis) sits behind a trait with one real HTTP
//! implementation and one in-memory mock, so the workflow can be driven
//! end to end in tests without network access.

pub mod classifier;
pub mod retriever;
pub mod synthesis;
pub mod web;

pub use classifier::{HuggingFaceClassifier, MockRemoteClassifier, RemoteClassifier};
pub use retriever::{KnowledgeRetriever, LexicalRetriever, MockRetriever, PineconeRetriever};
pub use synthesis::{AnswerSynthesizer, GroqSynthesizer, MockSynthesizer};
pub use web::{MockWebSearch, TavilySearch, WebSearch};
