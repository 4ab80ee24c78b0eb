use criterion::{black_box, criterion_group, criterion_main, Criterion};

use testcraft_core::model::{
    ChoiceOption, ChoiceQuestion, NewQuestion, QuestionKind, QuestionResponse, ResponseValue,
};
use testcraft_core::DocumentStore;

fn build_store(questions: usize, submissions: usize) -> (DocumentStore, String) {
    let mut store = DocumentStore::new();
    let test = store
        .create_test("Benchmark", None)
        .expect("non-empty title");

    let mut answers = Vec::new();
    for i in 0..questions {
        let options = vec![
            ChoiceOption::correct(format!("right {i}")),
            ChoiceOption::correct(format!("also right {i}")),
            ChoiceOption::new(format!("wrong {i}")),
        ];
        let picks = vec![options[0].id.clone(), options[2].id.clone()];
        let q = NewQuestion::new(
            format!("Question {i}"),
            QuestionKind::Choice(ChoiceQuestion {
                options,
                allow_multiple: true,
            }),
        )
        .with_score(10);
        if let Some(id) = store.add_question(&test.id, q) {
            answers.push(QuestionResponse::new(id, ResponseValue::List(picks)));
        }
    }

    for _ in 0..submissions {
        store.save_response(&test.id, answers.clone());
    }
    (store, test.id)
}

fn bench_save_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_response");

    for n in [10usize, 100] {
        let (store, test_id) = build_store(n, 1);
        let answers = store.responses()[0].responses.clone();
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter_batched(
                || (store.clone(), answers.clone()),
                |(mut store, answers)| store.save_response(black_box(&test_id), answers),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let (store, _) = build_store(20, 500);

    c.bench_function("analytics_500_responses", |b| {
        b.iter(|| black_box(&store).analytics(10))
    });
}

criterion_group!(benches, bench_save_response, bench_analytics);
criterion_main!(benches);
