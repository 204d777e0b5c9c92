use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::catalog::Catalog;
use super::index::DecayIndex;

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read nuclide table {}", path.display()))?;

    let catalog = Catalog::from_table(&raw);
    if catalog.is_empty() {
        return Err(anyhow!(
            "no ground-state nuclide records found in {}",
            path.display()
        ));
    }

    let skipped = catalog.skipped();
    info!(
        path = %path.display(),
        records = catalog.len(),
        comments = skipped.comments,
        short_lines = skipped.short_lines,
        excited_states = skipped.excited_states,
        malformed = skipped.malformed,
        duplicates = skipped.duplicates,
        "loaded nuclide table"
    );
    Ok(catalog)
}

/// Reads the optional decay index; `Ok(None)` when no index is configured or the file is absent.
pub fn load_decay_index(path: Option<&Path>) -> Result<Option<DecayIndex>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no decay index found, using derived branches only");
            return Ok(None);
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read decay index {}", path.display()));
        }
    };

    let index = DecayIndex::parse(&raw)
        .with_context(|| format!("failed to parse decay index {}", path.display()))?;
    info!(path = %path.display(), parents = index.len(), "loaded decay index");
    Ok(Some(index))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::nuclide::fixtures::sample_table;

    #[test]
    fn catalog_loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(sample_table().as_bytes()).expect("write table");

        let catalog = load_catalog(file.path()).expect("catalog loads");
        assert!(catalog.get("92-146").is_some());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = load_catalog(&dir.path().join("nubase.txt")).expect_err("missing table");
        assert!(error.to_string().contains("failed to read nuclide table"));
    }

    #[test]
    fn catalog_without_records_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"# only a comment\nshort\n").expect("write table");
        assert!(load_catalog(file.path()).is_err());
    }

    #[test]
    fn missing_decay_index_is_absorbed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("decay_index.json");

        assert!(load_decay_index(None).expect("no path").is_none());
        assert!(load_decay_index(Some(&missing)).expect("absent file").is_none());
    }

    #[test]
    fn malformed_decay_index_reports_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ nope").expect("write index");
        assert!(load_decay_index(Some(file.path())).is_err());
    }

    #[test]
    fn decay_index_loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let body = r#"{ "C14": { "z": 6, "n": 8, "branches": [
            { "to": "7-7", "mode": "beta-minus-decay", "branchPercent": 100 }
        ] } }"#;
        file.write_all(body.as_bytes()).expect("write index");

        let index = load_decay_index(Some(file.path()))
            .expect("index loads")
            .expect("index present");
        assert_eq!(index.branches("6-8").len(), 1);
    }
}
