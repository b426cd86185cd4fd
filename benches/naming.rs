//! Benchmarks for output naming
//!
//! Tests performance of source name parsing and output name rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tf_naming::{parse_source_name, OutputName};

/// Names covering each step of the season/episode cascade.
const SOURCE_NAMES: &[(&str, &str)] = &[
    ("marker", "Show.Name.S02E05.1080p.WEB.h264-GROUP.mkv"),
    ("cross", "Show Name - 2x14 - Title.mkv"),
    ("named", "[Group] Show Name Season 2 Episode 14 [1080p].mkv"),
    ("bare", "Show Name - 05 [1080p].mkv"),
    ("none", "Movie Title (2019).mkv"),
];

fn create_name() -> OutputName {
    OutputName {
        show: "Show Name".to_string(),
        year: None,
        season: Some(2),
        episode: Some(14),
        title: Some("The Title".to_string()),
        origin: Some("WEBDL".to_string()),
        video_tags: vec!["1080p".to_string(), "HEVC".to_string()],
        audio_tags: vec![
            vec!["Japanese (ja)".to_string(), "AAC".to_string()],
            vec!["Spanish (es-ES)".to_string(), "EAC3".to_string()],
            vec!["Galician (gl)".to_string(), "EAC3".to_string()],
        ],
        authors: vec!["Alice".to_string(), "Bob".to_string()],
        extension: "mkv".to_string(),
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_source_name");

    for (label, name) in SOURCE_NAMES {
        group.bench_with_input(BenchmarkId::from_parameter(label), name, |b, name| {
            b.iter(|| parse_source_name(black_box(name)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let name = create_name();
    c.bench_function("file_name", |b| b.iter(|| black_box(&name).file_name()));
}

fn bench_parse_and_render(c: &mut Criterion) {
    c.bench_function("parse_and_render", |b| {
        b.iter(|| {
            let mut name = OutputName::from(parse_source_name(black_box(SOURCE_NAMES[0].1)));
            name.origin = Some("WEBDL".to_string());
            name.file_name()
        })
    });
}

criterion_group!(benches, bench_parse, bench_render, bench_parse_and_render);
criterion_main!(benches);
