use criterion::{black_box, criterion_group, criterion_main, Criterion};
use itertools::Itertools;
use ngram_pipeline::annotation::Doc;
use ngram_pipeline::batch::{Batch, Value};
use ngram_pipeline::filtering::PosFilter;
use ngram_pipeline::ngrams::{
    extract_corpus_windows, windows, IncludeMetadata, Selection, WindowOptions,
};

const NB_DOCS: usize = 1000;
const DOC_LEN: usize = 40;
const TAGS: [&str; 4] = ["NOUN", "VERB", "ADJ", "DET"];

fn gen_doc(seed: usize) -> Doc {
    Doc::from_tagged(
        (0..DOC_LEN)
            .map(|i| {
                (
                    format!("word{}", (seed * 7 + i) % 300),
                    TAGS[(seed + i) % TAGS.len()],
                )
            })
            .collect_vec(),
    )
}

fn gen_corpus() -> Batch {
    Batch::with_len(NB_DOCS)
        .with_column("docs", (0..NB_DOCS).map(|i| Value::Doc(gen_doc(i))).collect())
        .unwrap()
}

pub fn single_document(c: &mut Criterion) {
    let doc = gen_doc(0);
    c.bench_function("windows half_width=2 single doc", |b| {
        b.iter(|| {
            windows(black_box(&doc), 2, "inv", None)
                .collect::<Result<Vec<_>, _>>()
                .unwrap()
        })
    });
}

pub fn corpus(c: &mut Criterion) {
    let batch = gen_corpus();
    let window = WindowOptions::default();

    c.bench_function("corpus windows all", |b| {
        b.iter(|| {
            extract_corpus_windows(
                black_box(&batch),
                "docs",
                &window,
                &Selection::All,
                &IncludeMetadata::None,
            )
            .unwrap()
        })
    });

    let nouns = Selection::Pos(PosFilter::new(["NOUN"]));
    c.bench_function("corpus windows pos filter", |b| {
        b.iter(|| {
            extract_corpus_windows(
                black_box(&batch),
                "docs",
                &window,
                &nouns,
                &IncludeMetadata::None,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, single_document, corpus);
criterion_main!(benches);
