//! Extraction throughput benchmark.

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rs_readability::{is_probably_readerable, parse, ReaderableOptions};

fn article_html() -> String {
    let paragraph = "Rooftop hives have multiplied across the city, tended by office \
        workers, retired teachers, and a new generation of weekend apiarists who treat \
        the roof as a shared allotment in the sky. ";
    let body: String = (0..40)
        .map(|i| format!("<p id=\"p{i}\">{paragraph}</p>"))
        .collect();
    format!(
        "<html><head><title>Benchmark Article - Example</title></head><body>\
         <nav class=\"menu\"><a href=\"/\">Home</a></nav>\
         <div class=\"content\">{body}</div>\
         <footer class=\"footer\">fine print</footer>\
         </body></html>"
    )
}

fn bench_parse(c: &mut Criterion) {
    let html = article_html();
    c.bench_function("parse_article", |b| {
        b.iter(|| parse(black_box(&html)).unwrap());
    });
}

fn bench_readerable(c: &mut Criterion) {
    let html = article_html();
    let options = ReaderableOptions::default();
    c.bench_function("is_probably_readerable", |b| {
        b.iter(|| is_probably_readerable(black_box(&html), &options));
    });
}

criterion_group!(benches, bench_parse, bench_readerable);
criterion_main!(benches);
