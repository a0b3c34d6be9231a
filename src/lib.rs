mod config;
mod date;
mod paths;
mod progress;
mod util;

mod db;
mod error;
mod schema;
mod loader;
mod pipeline;

mod stopwords;
mod keywords;
mod lexicon;
mod sentiment;
mod scoring;

mod resample;
mod plot;

pub use crate::config::{DbConfig, ImportOptions, ScoreWrites};
pub use crate::date::Day;
pub use crate::db::Database;
pub use crate::error::{ImportError, ImportResult, Stage, StageFailure};
pub use crate::pipeline::{RunReport, TrendrImport};

// Individual stages, for callers that drive the connection themselves.
pub use crate::pipeline::{
    drop_staging, ensure_schema, normalize_null_flags, populate_posts, populate_subreddits, reset_tables,
};
pub use crate::loader::{bulk_load, LoadStats};
pub use crate::keywords::{insert_keywords_and_associations, KeywordBatch, KeywordExtractor, KeywordStats};
pub use crate::scoring::score_posts;
pub use crate::plot::{plot_file_name, render_daily_series, render_forum_plots};

pub use crate::paths::{discover_csv_files, total_size};
pub use crate::progress::{make_bytes_progress, make_count_progress, ProgressScope};
pub use crate::util::init_tracing_once;

pub use crate::stopwords::{StopWords, ENGLISH_STOP_WORDS};
pub use crate::sentiment::{normalize, PolarityScores, SentimentAnalyzer};
pub use crate::resample::{group_by_forum, resample_daily_mean, DailySeries, ScorePoint};
