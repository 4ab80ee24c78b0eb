use criterion::{black_box, criterion_group, criterion_main, Criterion};

use testcraft_core::parser::{parse_answers_str, parse_test_str};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_test_toml(5);
    let medium_toml = generate_test_toml(50);
    let large_toml = generate_test_toml(200);

    group.bench_function("5_questions", |b| {
        b.iter(|| parse_test_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| parse_test_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| parse_test_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_answers_parsing(c: &mut Criterion) {
    let answers = {
        let entries: Vec<String> = (0..200)
            .map(|i| format!(r#""q{i}": ["opt-{i}-0", "opt-{i}-1"]"#))
            .collect();
        format!("{{{}}}", entries.join(","))
    };

    c.bench_function("answers_map_200", |b| {
        b.iter(|| parse_answers_str(black_box(&answers)))
    });
}

fn generate_test_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[test]
id = "bench"
title = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "q{i}"
type = "choice"
title = "Question {i}"
score = 10
allowMultiple = true

[[questions.options]]
id = "opt-{i}-0"
text = "Right"
correct = true

[[questions.options]]
id = "opt-{i}-1"
text = "Wrong"
"#
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_answers_parsing);
criterion_main!(benches);
