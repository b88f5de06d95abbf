use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use promptlab::{apply_technique, evaluate_output, ParameterMap, TechniqueRegistry};
use serde_json::json;

const REFERENCE: &str = "The quarterly report shows revenue growth of twelve percent, \
    driven by strong demand in the European market and improved margins on services.";

fn candidate(words: usize) -> String {
    let vocabulary = [
        "the", "report", "revenue", "growth", "market", "demand", "strong", "services",
        "margins", "quarterly", "european", "improved",
    ];
    (0..words)
        .map(|i| vocabulary[(i * 7) % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn evaluation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let keywords: Vec<String> = ["revenue", "growth", "margins", "outlook"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for words in [10usize, 100, 1000] {
        let text = candidate(words);
        group.bench_with_input(BenchmarkId::new("with_reference", words), &text, |b, text| {
            b.iter(|| evaluate_output(black_box(text), Some(REFERENCE), Some(&keywords)))
        });
        group.bench_with_input(BenchmarkId::new("candidate_only", words), &text, |b, text| {
            b.iter(|| evaluate_output(black_box(text), None, None))
        });
    }
    group.finish();
}

fn technique_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_technique");
    let registry = TechniqueRegistry::standard();

    let single_shot = ParameterMap::new()
        .with("task_description", "Translate English to French")
        .with("example_input", "Hello")
        .with("example_output", "Bonjour")
        .with("actual_input", "Good morning");
    group.bench_function("single_shot", |b| {
        b.iter(|| apply_technique(&registry, "single-shot", black_box(&single_shot)))
    });

    let examples: Vec<_> = (0..20)
        .map(|i| json!({"input": format!("input {}", i), "output": format!("output {}", i)}))
        .collect();
    let few_shot = ParameterMap::new()
        .with("task_description", "Echo the number")
        .with("examples", examples)
        .with("actual_input", "input 21");
    group.bench_function("few_shot_20", |b| {
        b.iter(|| apply_technique(&registry, "few-shot", black_box(&few_shot)))
    });

    group.finish();
}

criterion_group!(benches, evaluation_benchmarks, technique_benchmarks);
criterion_main!(benches);
