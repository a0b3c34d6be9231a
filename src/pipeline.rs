use crate::config::{DbConfig, ImportOptions, ScoreWrites};
use crate::db::Database;
use crate::error::{ImportResult, Stage, StageFailure};
use crate::keywords::{insert_keywords_and_associations, KeywordExtractor};
use crate::loader::bulk_load;
use crate::paths::{discover_csv_files, total_size};
use crate::plot::render_forum_plots;
use crate::progress::ProgressScope;
use crate::schema;
use crate::scoring::score_posts;
use crate::sentiment::SentimentAnalyzer;
use crate::stopwords::StopWords;
use crate::util::init_tracing_once;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Counts gathered over one import run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files_loaded: usize,
    pub staged_rows: u64,
    pub subreddits: u64,
    pub posts: u64,
    pub keywords: usize,
    pub associations: usize,
    pub scored_posts: u64,
    pub plots: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct TrendrImport {
    pub(crate) opts: ImportOptions,
}

impl TrendrImport {
    pub fn new() -> Self {
        Self { opts: ImportOptions::default() }
    }

    pub fn with_options(opts: ImportOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn db(mut self, db: DbConfig) -> Self { self.opts = self.opts.with_db(db); self }
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_dir(dir); self }
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self { self.opts = self.opts.with_exclude_file(name); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn stop_words(mut self, words: StopWords) -> Self { self.opts = self.opts.with_stop_words(words); self }
    pub fn score_writes(mut self, mode: ScoreWrites) -> Self { self.opts = self.opts.with_score_writes(mode); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }

    pub fn options(&self) -> &ImportOptions {
        &self.opts
    }

    /// Run every stage in order on one connection. The first failing stage ends the run;
    /// the connection is released either way.
    pub fn run(&self) -> Result<RunReport, StageFailure> {
        init_tracing_once();
        let started = Instant::now();

        let mut db = Database::connect(&self.opts.db).map_err(|e| StageFailure::new(Stage::SchemaEnsure, e))?;
        let outcome = self.run_stages(&mut db);
        if let Err(e) = db.close() {
            tracing::warn!("closing connection: {e}");
        }

        match &outcome {
            Ok(report) => tracing::info!(
                "import finished in {:.1?}: {} posts, {} subreddits, {} keywords, {} plots",
                started.elapsed(),
                report.posts,
                report.subreddits,
                report.keywords,
                report.plots.len()
            ),
            Err(f) => tracing::error!("import aborted at {}: {}", f.stage, f.source),
        }
        outcome
    }

    /// Execute `Stage::ALL` against an open connection.
    pub fn run_stages(&self, db: &mut Database) -> Result<RunReport, StageFailure> {
        // Run-scoped collaborators, built once from the options.
        let extractor = KeywordExtractor::new(self.opts.stop_words.clone());
        let analyzer = SentimentAnalyzer::new();

        let mut report = RunReport::default();
        for stage in Stage::ALL {
            tracing::info!("stage: {stage}");
            let result = match stage {
                Stage::SchemaEnsure => ensure_schema(db),
                Stage::Reset => reset_tables(db),
                Stage::BulkLoad => self.load_stage(db, &mut report),
                Stage::NullNormalization => normalize_null_flags(db).map(|n| {
                    tracing::debug!("normalized flags on {n} staged rows");
                }),
                Stage::DimensionPopulation => populate_subreddits(db).map(|n| {
                    tracing::info!("inserted {n} subreddits");
                    report.subreddits = n;
                }),
                Stage::FactPopulation => populate_posts(db).map(|n| {
                    tracing::info!("inserted {n} posts");
                    report.posts = n;
                }),
                Stage::KeywordExtraction => {
                    insert_keywords_and_associations(db, &extractor, self.opts.progress).map(|s| {
                        report.keywords = s.keywords;
                        report.associations = s.associations;
                    })
                }
                Stage::SentimentScoring => {
                    score_posts(db, &analyzer, self.opts.score_writes, self.opts.progress).map(|n| {
                        tracing::info!("scored {n} posts");
                        report.scored_posts = n;
                    })
                }
                Stage::Cleanup => drop_staging(db),
                Stage::Visualization => render_forum_plots(db, &self.opts.output_dir, self.opts.progress).map(|paths| {
                    tracing::info!("wrote {} plots to {}", paths.len(), self.opts.output_dir.display());
                    report.plots = paths;
                }),
            };
            result.map_err(|e| StageFailure::new(stage, e))?;
        }
        Ok(report)
    }

    fn load_stage(&self, db: &mut Database, report: &mut RunReport) -> ImportResult<()> {
        let files = discover_csv_files(&self.opts.data_dir, &self.opts.exclude_file)?;
        tracing::info!("copying {} CSV files from {} into {}...", files.len(), self.opts.data_dir.display(), schema::STAGING_TABLE);
        let label = self.opts.progress_label.as_deref().unwrap_or("Copying CSV into staging");
        let pb = ProgressScope::bytes(self.opts.progress, label, total_size(&files));
        let stats = bulk_load(db, &files, &pb)?;
        pb.finish(format!("{} rows staged", stats.rows));
        report.files_loaded = stats.files;
        report.staged_rows = stats.rows;
        Ok(())
    }
}

/// Create the staging and permanent tables if absent, and add later columns.
pub fn ensure_schema(db: &mut Database) -> ImportResult<()> {
    for stmt in schema::ENSURE_SCHEMA {
        db.batch(stmt)?;
    }
    Ok(())
}

/// Empty all five tables and restart the id sequences.
pub fn reset_tables(db: &mut Database) -> ImportResult<()> {
    db.batch(schema::CLEAR_TABLES)?;
    db.batch(schema::RESTART_POST_IDS)?;
    db.batch(schema::RESTART_LOAD_SEQ)?;
    Ok(())
}

pub fn normalize_null_flags(db: &mut Database) -> ImportResult<u64> {
    db.execute(schema::ASSUME_NULL_BOOLS_FALSE)
}

/// First-seen subscriber count wins for a repeated subreddit name.
pub fn populate_subreddits(db: &mut Database) -> ImportResult<u64> {
    db.execute(schema::INSERT_SUBREDDITS)
}

pub fn populate_posts(db: &mut Database) -> ImportResult<u64> {
    db.execute(schema::INSERT_POSTS)
}

/// Drop the staging table with autovacuum switched off for it. If the drop fails the
/// setting is restored before the error is returned.
pub fn drop_staging(db: &mut Database) -> ImportResult<()> {
    tracing::info!("dropping the staging table...");
    if !db.staging_exists()? {
        return Ok(());
    }
    db.batch(schema::DISABLE_STAGING_AUTOVACUUM)?;
    if let Err(e) = db.batch(schema::DROP_STAGING) {
        if let Err(restore) = db.batch(schema::ENABLE_STAGING_AUTOVACUUM) {
            tracing::warn!("re-enabling autovacuum on staging: {restore}");
        }
        return Err(e);
    }
    Ok(())
}
