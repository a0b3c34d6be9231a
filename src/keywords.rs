//! Keyword extraction from post bodies, and the batched COPY that stores the
//! vocabulary and post -> keyword edges.

use crate::db::Database;
use crate::error::{ImportError, ImportResult};
use crate::progress::ProgressScope;
use crate::schema;
use crate::stopwords::StopWords;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::io::Write;
use std::path::PathBuf;

/// Lowercases, keeps pure `[a-z]+` runs between word boundaries, drops stop words.
#[derive(Clone, Debug)]
pub struct KeywordExtractor {
    word: Regex,
    stop_words: StopWords,
}

impl KeywordExtractor {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            word: Regex::new(r"\b[a-z]+\b").expect("static keyword pattern"),
            stop_words,
        }
    }

    pub fn extract(&self, body: &str) -> BTreeSet<String> {
        let lower = body.to_lowercase();
        self.word
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|w| !self.stop_words.contains(w))
            .map(str::to_string)
            .collect()
    }
}

/// Vocabulary and edges accumulated across all posts of a run.
#[derive(Debug, Default)]
pub struct KeywordBatch {
    seen: HashSet<String>,
    new_keywords: Vec<String>,
    associations: Vec<(i32, String)>,
}

impl KeywordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue each distinct word once, and one edge per (post, word).
    pub fn add_post(&mut self, extractor: &KeywordExtractor, post_id: i32, body: &str) {
        for word in extractor.extract(body) {
            if !self.seen.contains(&word) {
                self.seen.insert(word.clone());
                self.new_keywords.push(word.clone());
            }
            self.associations.push((post_id, word));
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.new_keywords.len()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    pub fn keywords(&self) -> &[String] {
        &self.new_keywords
    }

    pub fn associations(&self) -> &[(i32, String)] {
        &self.associations
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeywordStats {
    pub posts: usize,
    pub keywords: usize,
    pub associations: usize,
}

fn copy_err(e: std::io::Error) -> ImportError {
    ImportError::io(PathBuf::from("<copy stdin>"), e)
}

/// Extract keywords for every post with a body and store them. Conflicts are ignored,
/// so a retry over the same posts leaves the tables unchanged.
pub fn insert_keywords_and_associations(
    db: &mut Database,
    extractor: &KeywordExtractor,
    progress_enabled: bool,
) -> ImportResult<KeywordStats> {
    let rows = db.client().query(schema::SELECT_POST_BODIES, &[])?;
    let pb = ProgressScope::count(progress_enabled, "Processing posts for keywords", rows.len() as u64);

    let mut batch = KeywordBatch::new();
    for row in &rows {
        let post_id: i32 = row.get(0);
        let body: Option<String> = row.get(1);
        if let Some(body) = body.as_deref() {
            batch.add_post(extractor, post_id, body);
        }
        pb.inc(1);
    }
    pb.finish("keywords extracted");

    tracing::info!("inserting {} keywords...", batch.keyword_count());
    tracing::info!("inserting {} post-keyword associations...", batch.association_count());

    if batch.keyword_count() > 0 || batch.association_count() > 0 {
        db.batch(schema::CREATE_KEYWORD_LOAD)?;

        // Words are pure ASCII letters, so COPY text format needs no escaping.
        let mut w = db.client().copy_in(schema::COPY_KEYWORD_LOAD)?;
        for word in batch.keywords() {
            writeln!(w, "{word}").map_err(copy_err)?;
        }
        w.finish()?;

        let mut w = db.client().copy_in(schema::COPY_POST_KEYWORD_LOAD)?;
        for (post_id, word) in batch.associations() {
            writeln!(w, "{post_id}\t{word}").map_err(copy_err)?;
        }
        w.finish()?;

        db.batch(schema::MERGE_KEYWORD_LOAD)?;
    }

    Ok(KeywordStats {
        posts: rows.len(),
        keywords: batch.keyword_count(),
        associations: batch.association_count(),
    })
}
