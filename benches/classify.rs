//! Classification throughput.
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench classify
//! cargo bench --bench classify -- decide
//! ```

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use labeler::classify::decide;
use labeler::config::Configuration;
use labeler::glob::Glob;
use labeler::model::ChangedFile;

const CONFIG: &str = r#"
dir: demo/contributions/**
categories:
  essay:
    glob: demo/contributions/essay/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "**"
    proposal: README.md
  presentation:
    glob: demo/contributions/presentation/week[1-9]/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "**"
    proposal: README.md
  demo:
    glob: demo/contributions/demo/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "*"
    proposal: README.md
"#;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A demo submission of `n` files; only the last category matches, so every
/// earlier one is tried and rejected first.
fn submission(n: usize) -> Vec<ChangedFile> {
    let mut files = vec![ChangedFile::added("demo/contributions/demo/jan-kowalski/README.md")];
    files.extend((1..n).map(|i| {
        ChangedFile::added(format!("demo/contributions/demo/jan-kowalski/file{i}.js"))
    }));
    files
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_decide(c: &mut Criterion) {
    let Ok(config) = Configuration::parse(CONFIG) else {
        panic!("benchmark config must parse");
    };
    let mut group = c.benchmark_group("decide");
    for n in [1usize, 10, 100, 1000] {
        let files = submission(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("files", n), &files, |b, files| {
            b.iter(|| decide(black_box(files), black_box(&config)));
        });
    }
    group.finish();
}

fn bench_glob(c: &mut Criterion) {
    let mut group = c.benchmark_group("glob");
    let path = "demo/contributions/presentation/week3/anna-maria/slides/deck/final.pdf";
    for pattern in [
        "demo/contributions/**",
        "demo/contributions/presentation/week[1-9]/+([a-zA-Z])?(-+([a-zA-Z]))/**",
        "**/*.{pdf,md}",
    ] {
        let Ok(glob) = Glob::new(pattern) else {
            panic!("benchmark pattern must compile: {pattern}");
        };
        group.bench_with_input(BenchmarkId::new("matches", pattern), &glob, |b, glob| {
            b.iter(|| glob.matches(black_box(path)));
        });
    }
    group.bench_function("compile", |b| {
        b.iter(|| Glob::new(black_box("demo/contributions/essay/+([a-zA-Z])?(-+([a-zA-Z]))/**")));
    });
    group.finish();
}

criterion_group!(benches, bench_decide, bench_glob);
criterion_main!(benches);
