use canonical::{tokenize, CanonicalizeConfig, Document, MediaType, SegmentConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_tokenize(c: &mut Criterion) {
    let config = CanonicalizeConfig::default();
    let mut group = c.benchmark_group("tokenize");

    for size in [64, 512, 4096, 32768].iter() {
        let text = "Word, it's fine. ".repeat(*size / 17);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("bytes_{size}"), |b| {
            b.iter(|| tokenize(black_box(&text), black_box(&config)))
        });
    }

    group.finish();
}

fn bench_sentences(c: &mut Criterion) {
    let segment = SegmentConfig::default();
    let text = "Dr. Smith reviewed the essay. It was long, e.g. forty pages!\n\n".repeat(256);
    let doc = Document::new(
        "bench",
        text,
        MediaType::PlainText,
        CanonicalizeConfig::default(),
    )
    .expect("document");
    doc.tokens();

    c.bench_function("sentences_16k", |b| {
        b.iter(|| black_box(&doc).sentences(&segment).count())
    });
}

criterion_group!(benches, bench_tokenize, bench_sentences);
criterion_main!(benches);
