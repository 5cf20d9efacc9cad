use std::path::Path;

use ngram_pipeline::config::NgramConfig;
use ngram_pipeline::ngrams::IncludeMetadata;
use ngram_pipeline::pipelines::{NgramJob, Pipeline};
use ngram_pipeline::runlog::RunLog;
use rusqlite::Connection;

fn gen_database(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE reviews ("index" INTEGER, text TEXT, stars INTEGER);
        INSERT INTO reviews VALUES (0, 'The soup was   COLD!', 1);
        INSERT INTO reviews VALUES (1, 'Great food.', 5);
        INSERT INTO reviews VALUES (2, 'Nice staff, nice view', 4);
        "#,
    )
    .unwrap();
}

/// Rows of `table` in insertion order.
fn read_table(path: &Path, table: &str) -> Vec<(String, i64, i64)> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT ngram, sent_id, stars FROM \"{}\" ORDER BY rowid",
            table
        ))
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

#[test_log::test]
fn ngrams_to_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("corpus.db");
    gen_database(&db);

    let config = NgramConfig {
        half_width: 1,
        batch_size: Some(1),
        num_processes: 2,
        include_metadata: IncludeMetadata::Columns(vec!["stars".to_string()]),
        log_path: Some(dir.path().join("logs.json")),
        ..Default::default()
    };
    let mut job =
        NgramJob::new(db.clone(), "reviews".to_string(), "text".to_string(), config).unwrap();
    job.chunk_size = 2;

    let summary = job.run().unwrap();
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.input_rows, 3);
    assert_eq!(summary.output_rows, 10);

    let out = read_table(&db, "reviews_n=1");
    let ngrams: Vec<&str> = out.iter().map(|(ngram, _, _)| ngram.as_str()).collect();
    assert_eq!(
        ngrams,
        vec![
            "inv the soup",
            "the soup was",
            "soup was cold",
            "was cold inv",
            "inv great food",
            "great food inv",
            "inv nice staff",
            "nice staff nice",
            "staff nice view",
            "nice view inv",
        ]
    );
    assert_eq!(out[4].1, 1);
    assert_eq!(out[9], ("nice view inv".to_string(), 2, 4));

    let log = RunLog::read(&dir.path().join("logs.json")).unwrap();
    let run = &log["reviews_n=1"];
    let input = &run["settings"]["Pipeline Input"];
    assert_eq!(input["Table Name"], "reviews");
    assert_eq!(input["Database Path"], db.display().to_string());
    assert_eq!(input["Include PoS Filtering"], false);
    assert_eq!(run["settings"]["Pipeline Output"]["Table Name"], "reviews_n=1");
    assert_eq!(run["settings"]["ngram Size"], 1);
    assert_eq!(run["functions"]["annotator"], "word_annotator");
    assert_eq!(run["timing"]["steps"].as_array().unwrap().len(), 2);
}

#[test_log::test]
fn pos_filtered_ngrams_to_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("corpus.db");
    gen_database(&db);
    let lexicon = dir.path().join("lexicon.csv");
    std::fs::write(&lexicon, "staff,NOUN\nview,NOUN\n").unwrap();

    let config = NgramConfig {
        half_width: 1,
        pos_filter: Some(["NOUN".to_string()].into_iter().collect()),
        include_metadata: IncludeMetadata::Columns(vec!["stars".to_string()]),
        ..Default::default()
    };
    let mut job =
        NgramJob::new(db.clone(), "reviews".to_string(), "text".to_string(), config).unwrap();
    job.lexicon = Some(lexicon);
    // the first two chunks have no nouns
    job.chunk_size = 1;

    let summary = job.run().unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.output_rows, 2);

    let out = read_table(&db, "reviews_n=1_pos-filter");
    assert_eq!(
        out,
        vec![
            ("nice staff nice".to_string(), 2, 4),
            ("nice view inv".to_string(), 2, 4),
        ]
    );
}
