//! Latency benchmarks for the rule classifier
//!
//! Classification runs inline on the ingestion path, once per event, so it
//! has to stay well under a millisecond for post-sized input.
//!
//! Run with: cargo bench -p harmwatch-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use harmwatch_classifiers::{extract_domains, Classifier, RuleClassifier};

fn benchmark_rule_classifier(c: &mut Criterion) {
    let classifier = RuleClassifier::new().expect("Failed to create rule classifier");

    let test_cases = vec![
        ("short_clean", "Hello, how are you today?"),
        ("short_scam", "Claim your free prize now"),
        ("short_shortlink", "look at this bit.ly/3abcd"),
        (
            "medium_clean",
            "The quick brown fox jumps over the lazy dog's kennel. This is a test sentence without any harm.",
        ),
        (
            "medium_multi",
            "You racist loser, this is fake news. Urgent: verify your account at tinyurl.com/x or I will doxx you.",
        ),
    ];

    let mut group = c.benchmark_group("Rule_Classifier");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| classifier.classify(black_box(text), &[]))
        });
    }

    group.finish();
}

fn benchmark_long_post(c: &mut Criterion) {
    let classifier = RuleClassifier::new().expect("Failed to create rule classifier");
    let text = "Just sharing some thoughts about my weekend and the weather. ".repeat(40);

    c.bench_function("classify_long_clean_post", |b| {
        b.iter(|| classifier.classify(black_box(&text), &[]))
    });
}

fn benchmark_domain_extraction(c: &mut Criterion) {
    let text = "Read https://www.example.com/a then https://bit.ly/xyz and (www.tinyurl.com/q).";

    c.bench_function("extract_domains", |b| {
        b.iter(|| extract_domains(black_box(text)))
    });
}

criterion_group!(
    benches,
    benchmark_rule_classifier,
    benchmark_long_post,
    benchmark_domain_extraction
);
criterion_main!(benches);
