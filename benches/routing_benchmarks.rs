//! Benchmarks for query routing
//!
//! Measures keyword classification on its own and a full invocation of the
//! stage graph against in-memory adapters.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use unidesk::abstractions::{MockRetriever, MockSynthesizer, MockWebSearch};
use unidesk::classifier::IntentClassifier;
use unidesk::core::classify::{classify_by_keywords, KeywordRules};
use unidesk::core::evidence::{DocumentSnippet, WebResult};
use unidesk::workflow::Engine;

const QUERIES: &[(&str, &str)] = &[
    ("casual", "Hello!"),
    ("time_sensitive", "When is the scholarship deadline?"),
    (
        "long_general",
        "Which documents are required for transcript verification by the registrar office?",
    ),
];

fn bench_keyword_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyword_classification");
    let rules = KeywordRules::default().normalized();

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| classify_by_keywords(black_box(query), &rules))
        });
    }

    group.finish();
}

fn bench_invoke(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let engine = Engine::builder()
        .classifier(IntentClassifier::keyword_only(KeywordRules::default()))
        .retriever(Arc::new(MockRetriever::with_docs(vec![DocumentSnippet::new(
            "Transcript verification requires the original transcript and a CNIC copy.",
        )])))
        .web_search(Arc::new(MockWebSearch::with_results(vec![WebResult::new(
            "Scholarships",
            "https://example.edu.pk/scholarships",
            "Applications close on 30 June.",
        )])))
        .synthesizer(Arc::new(MockSynthesizer::always(
            "Bring your original transcript and a CNIC copy to the registrar office.",
        )))
        .build()
        .unwrap();

    let mut group = c.benchmark_group("invoke");
    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.to_async(&runtime)
                .iter(|| async { engine.invoke(black_box(query)).await.unwrap() })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_keyword_classification, bench_invoke);
criterion_main!(benches);
