use crate::error::{ImportError, ImportResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regular files directly inside `dir`, minus the one named `exclude`, sorted by name.
pub fn discover_csv_files(dir: &Path, exclude: &str) -> ImportResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ImportError::MissingDataDir(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let ent = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            ImportError::io(path, source)
        })?;
        if !ent.file_type().is_file() {
            continue;
        }
        if ent.file_name().to_str() == Some(exclude) {
            tracing::debug!("skipping excluded file {}", ent.path().display());
            continue;
        }
        files.push(ent.path().to_path_buf());
    }
    Ok(files)
}

pub fn total_size(files: &[PathBuf]) -> u64 {
    files
        .iter()
        .map(|p| fs::metadata(p).map(|m| m.len()).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_manifest_and_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("b.csv"), "x").unwrap();
        fs::write(dir.join("a.csv"), "xy").unwrap();
        fs::write(dir.join("50_subreddits_list.csv"), "manifest").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("c.csv"), "z").unwrap();

        let files = discover_csv_files(dir, "50_subreddits_list.csv").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_eq!(total_size(&files), 3);
    }

    #[test]
    fn missing_directory_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover_csv_files(&tmp.path().join("absent"), "x").unwrap_err();
        assert!(matches!(err, ImportError::MissingDataDir(_)));
    }
}
