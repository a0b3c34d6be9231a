#[path = "common/mod.rs"]
mod common;

use common::*;
use postgres::error::SqlState;
use postgres::{Client, NoTls};
use std::collections::BTreeSet;
use std::fs;
use trendr::{ImportError, ScoreWrites, Stage, StopWords, ENGLISH_STOP_WORDS};

fn client() -> Client {
    let url = std::env::var("TRENDR_TEST_DATABASE_URL").unwrap();
    Client::connect(&url, NoTls).unwrap()
}

/// Every permanent table as sorted text rows, for whole-content comparison.
fn snapshot(c: &mut Client) -> Vec<Vec<String>> {
    let queries = [
        "SELECT s_name || '|' || COALESCE(num_subscribers::TEXT, '') FROM subreddit ORDER BY 1",
        "SELECT p_post_id::TEXT || '|' || COALESCE(title, '') || '|' || subreddit || '|' \
         || is_nsfw::TEXT || is_bot::TEXT || is_megathread::TEXT || '|' || COALESCE(sentiment_score::TEXT, 'null') \
         FROM post ORDER BY 1",
        "SELECT k_word FROM keyword ORDER BY 1",
        "SELECT pk_post_id::TEXT || '|' || pk_word FROM post_keyword ORDER BY 1",
    ];
    queries
        .iter()
        .map(|q| c.query(*q, &[]).unwrap().iter().map(|r| r.get::<_, String>(0)).collect())
        .collect()
}

/// Full run over the sample directory: every table populated, staging gone, one plot per forum.
#[test]
fn full_run_populates_schema_and_writes_plots() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    let out = tmp.path().join("plots");

    let report = import_for(&db, &data, &out).run().unwrap();
    assert_eq!(report.files_loaded, 2, "manifest must be skipped");
    assert_eq!(report.staged_rows, 5);
    assert_eq!(report.subreddits, 2);
    assert_eq!(report.posts, 5);
    assert_eq!(report.scored_posts, 5);

    let mut c = client();
    let nulls: i64 = c
        .query_one("SELECT COUNT(*) FROM post WHERE is_nsfw IS NULL OR is_bot IS NULL OR is_megathread IS NULL", &[])
        .unwrap()
        .get(0);
    assert_eq!(nulls, 0, "null flags are coalesced to false");

    // The body-less post gets no keywords but is still scored as neutral.
    let row = c
        .query_one("SELECT p_post_id, sentiment_score FROM post WHERE title = 'Weekly thread'", &[])
        .unwrap();
    let (id, score): (i32, Option<f64>) = (row.get(0), row.get(1));
    assert_eq!(score, Some(0.0));
    let kw: i64 = c
        .query_one("SELECT COUNT(*) FROM post_keyword WHERE pk_post_id = $1", &[&id])
        .unwrap()
        .get(0);
    assert_eq!(kw, 0);

    let scores: Vec<f64> = c
        .query("SELECT sentiment_score FROM post", &[])
        .unwrap()
        .iter()
        .map(|r| r.get(0))
        .collect();
    assert!(scores.iter().all(|s| (-1.0..=1.0).contains(s)));

    let mut names: Vec<String> = report
        .plots
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["golang_sentiment_scores.png", "rust_sentiment_scores.png"]);
    for p in &report.plots {
        assert!(fs::metadata(p).unwrap().len() > 0, "{} is empty", p.display());
    }
}

#[test]
fn rerun_yields_identical_tables() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    let out = tmp.path().join("plots");
    let mut c = client();

    import_for(&db, &data, &out).run().unwrap();
    let first = snapshot(&mut c);
    import_for(&db, &data, &out).run().unwrap();
    let second = snapshot(&mut c);

    assert!(!first[1].is_empty());
    assert_eq!(first, second);
}

#[test]
fn repeated_subreddit_keeps_first_seen_subscribers() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    import_for(&db, &data, &tmp.path().join("plots")).run().unwrap();

    let mut c = client();
    let subs: Option<i32> = c
        .query_one("SELECT num_subscribers FROM subreddit WHERE s_name = 'rust'", &[])
        .unwrap()
        .get(0);
    assert_eq!(subs, Some(1000));
}

#[test]
fn stored_keywords_are_alphabetic_and_exclude_stop_words() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    import_for(&db, &data, &tmp.path().join("plots")).run().unwrap();

    let mut c = client();
    let words: BTreeSet<String> = c
        .query("SELECT k_word FROM keyword", &[])
        .unwrap()
        .iter()
        .map(|r| r.get(0))
        .collect();
    assert!(words.contains("love") && words.contains("compiler") && words.contains("cargo"));
    assert!(words.iter().all(|w| !w.is_empty() && w.chars().all(|ch| ch.is_ascii_lowercase())));
    for sw in ENGLISH_STOP_WORDS {
        assert!(!words.contains(*sw), "stop word {sw} stored");
    }

    // Each (post, word) edge is stored once.
    let dupes: i64 = c
        .query_one(
            "SELECT COUNT(*) FROM (SELECT pk_post_id, pk_word FROM post_keyword GROUP BY 1, 2 HAVING COUNT(*) > 1) d",
            &[],
        )
        .unwrap()
        .get(0);
    assert_eq!(dupes, 0);
}

#[test]
fn custom_stop_words_reach_the_extractor() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    import_for(&db, &data, &tmp.path().join("plots"))
        .stop_words(StopWords::from_words(["i", "it"]))
        .run()
        .unwrap();

    let mut c = client();
    let words: BTreeSet<String> = c
        .query(
            "SELECT pk_word FROM post_keyword JOIN post ON p_post_id = pk_post_id WHERE title = 'Rust 2024 edition'",
            &[],
        )
        .unwrap()
        .iter()
        .map(|r| r.get(0))
        .collect();
    let expected: BTreeSet<String> = ["love", "this", "language", "s", "great"].iter().map(|s| s.to_string()).collect();
    assert_eq!(words, expected);
}

#[test]
fn staging_table_is_gone_after_cleanup() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    import_for(&db, &data, &tmp.path().join("plots")).run().unwrap();

    let mut c = client();
    let err = c.query("SELECT * FROM tmp", &[]).unwrap_err();
    assert_eq!(err.code(), Some(&SqlState::UNDEFINED_TABLE));
}

#[test]
fn batched_score_writes_match_per_row_writes() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    let out = tmp.path().join("plots");
    let mut c = client();

    import_for(&db, &data, &out).run().unwrap();
    let per_row = snapshot(&mut c);
    import_for(&db, &data, &out).score_writes(ScoreWrites::Batched(2)).run().unwrap();
    let batched = snapshot(&mut c);
    assert_eq!(per_row, batched);
}

#[test]
fn malformed_csv_aborts_at_bulk_load() {
    let Some((db, _guard)) = test_db() else { return };
    let (tmp, data) = make_data_dir();
    // `score` is not an integer.
    write_csv(
        &data.join("c_broken.csv"),
        &["x1,Broken,lots,0.5,1,2024-01-01 00:00:00,rust,1,/p,/u,d,0,0,,text,false,false,false,body"],
    );
    let out = tmp.path().join("plots");

    let failure = import_for(&db, &data, &out).run().unwrap_err();
    assert_eq!(failure.stage, Stage::BulkLoad);
    assert!(matches!(failure.source, ImportError::Database(_) | ImportError::Io { .. }));
    assert!(!out.exists(), "later stages must not run");
}

#[test]
fn missing_data_dir_aborts_at_bulk_load() {
    let Some((db, _guard)) = test_db() else { return };
    let tmp = tempfile::tempdir().unwrap();
    let failure = import_for(&db, &tmp.path().join("absent"), &tmp.path().join("plots"))
        .run()
        .unwrap_err();
    assert_eq!(failure.stage, Stage::BulkLoad);
    assert!(matches!(failure.source, ImportError::MissingDataDir(_)));
}
