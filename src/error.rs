//! Stage identifiers and the typed failures a run can end with.

use std::fmt;
use std::path::PathBuf;

/// The import stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    SchemaEnsure,
    Reset,
    BulkLoad,
    NullNormalization,
    DimensionPopulation,
    FactPopulation,
    KeywordExtraction,
    SentimentScoring,
    Cleanup,
    Visualization,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::SchemaEnsure,
        Stage::Reset,
        Stage::BulkLoad,
        Stage::NullNormalization,
        Stage::DimensionPopulation,
        Stage::FactPopulation,
        Stage::KeywordExtraction,
        Stage::SentimentScoring,
        Stage::Cleanup,
        Stage::Visualization,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::SchemaEnsure => "schema ensure",
            Stage::Reset => "reset",
            Stage::BulkLoad => "bulk load",
            Stage::NullNormalization => "null normalization",
            Stage::DimensionPopulation => "subreddit population",
            Stage::FactPopulation => "post population",
            Stage::KeywordExtraction => "keyword extraction",
            Stage::SentimentScoring => "sentiment scoring",
            Stage::Cleanup => "cleanup",
            Stage::Visualization => "visualization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("database: {0}")]
    Database(#[from] postgres::Error),

    #[error("io on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data directory {} does not exist", .0.display())]
    MissingDataDir(PathBuf),

    #[error("plot {}: {message}", path.display())]
    Plot { path: PathBuf, message: String },
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io { path: path.into(), source }
    }
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// The first stage that failed, and why. Later stages did not run.
#[derive(Debug, thiserror::Error)]
#[error("stage `{stage}` failed: {source}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub source: ImportError,
}

impl StageFailure {
    pub fn new(stage: Stage, source: ImportError) -> Self {
        Self { stage, source }
    }
}
