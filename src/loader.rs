//! Bulk load of CSV files into the staging table through COPY.

use crate::db::Database;
use crate::error::{ImportError, ImportResult};
use crate::progress::ProgressScope;
use crate::schema;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

const READ_BUF_BYTES: usize = 256 * 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files: usize,
    pub rows: u64,
}

/// Counts bytes as they pass through, for the progress bar.
struct CountingReader<'a, R> {
    inner: R,
    progress: &'a ProgressScope,
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.progress.inc(n as u64);
        Ok(n)
    }
}

/// Stream every file into `tmp`, one COPY per file, in the given order.
/// A malformed row aborts with the server's error; rows from earlier files stay staged.
pub fn bulk_load(db: &mut Database, files: &[PathBuf], progress: &ProgressScope) -> ImportResult<LoadStats> {
    let mut stats = LoadStats::default();
    for path in files {
        let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
        let mut reader = CountingReader {
            inner: BufReader::with_capacity(READ_BUF_BYTES, file),
            progress,
        };

        let mut writer = db.client().copy_in(schema::COPY_INTO_STAGING)?;
        io::copy(&mut reader, &mut writer).map_err(|e| ImportError::io(path, e))?;
        let rows = writer.finish()?;

        tracing::debug!("copied {} rows from {}", rows, path.display());
        stats.files += 1;
        stats.rows += rows;
    }
    Ok(stats)
}
