use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use permitdrill::bank::question::{AnswerChoice, Question};
use permitdrill::engine::attempt::{Attempt, AttemptHistory};
use permitdrill::engine::performance::PerformanceAggregator;
use permitdrill::engine::readiness::ReadinessEngine;
use permitdrill::engine::selector::AdaptiveSelector;

const CATEGORIES: [&str; 8] = [
    "Road Signs",
    "Right of Way",
    "Speed Limits",
    "Parking",
    "Alcohol and Drugs",
    "Traffic Signals",
    "Safe Driving",
    "Sharing the Road",
];

fn make_history(attempt_count: usize, question_count: usize) -> AttemptHistory {
    let now = Utc::now();
    let attempts = (0..attempt_count)
        .map(|i| {
            let q = i % question_count;
            Attempt {
                question_id: format!("q-{q:03}"),
                category: CATEGORIES[q % CATEGORIES.len()].to_string(),
                correct: i % 4 != 0, // ~75% accuracy
                timestamp: now,
                time_taken_secs: 4.0 + (i % 10) as f64,
            }
        })
        .collect();
    AttemptHistory::from_attempts(attempts)
}

fn make_pool(question_count: usize) -> Vec<Question> {
    (0..question_count)
        .map(|q| Question {
            id: format!("q-{q:03}"),
            text: format!("question {q}"),
            choices: vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
            answer: AnswerChoice::A,
            category: CATEGORIES[q % CATEGORIES.len()].to_string(),
            explanation: None,
        })
        .collect()
}

fn bench_category_aggregation(c: &mut Criterion) {
    let history = make_history(20_000, 400);
    let aggregator = PerformanceAggregator::new(&history);

    c.bench_function("all_category_performance (20K attempts)", |b| {
        b.iter(|| black_box(&aggregator).all_category_performance())
    });
}

fn bench_question_performance(c: &mut Criterion) {
    let history = make_history(20_000, 400);
    let aggregator = PerformanceAggregator::new(&history);

    c.bench_function("performance_for (20K attempts)", |b| {
        b.iter(|| black_box(&aggregator).performance_for(black_box("q-123"), "Parking"))
    });
}

fn bench_readiness(c: &mut Criterion) {
    let history = make_history(20_000, 400);
    let aggregator = PerformanceAggregator::new(&history);
    let engine = ReadinessEngine::new(&aggregator, 400);

    c.bench_function("calculate_readiness (20K attempts)", |b| {
        b.iter(|| black_box(&engine).calculate_readiness())
    });
}

fn bench_selection(c: &mut Criterion) {
    let history = make_history(20_000, 400);
    let aggregator = PerformanceAggregator::new(&history);
    let selector = AdaptiveSelector::new(&aggregator);
    let pool = make_pool(400);
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("select_questions 36 of 400 (20K attempts)", |b| {
        b.iter(|| selector.select_questions(&mut rng, black_box(&pool), 36, None))
    });
}

criterion_group!(
    benches,
    bench_category_aggregation,
    bench_question_performance,
    bench_readiness,
    bench_selection
);
criterion_main!(benches);
