use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Manually assigned root-cause classification carried through from the
/// labeled CSV. Never derived; the harvester only copies it into the output.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Classification {
    Intrinsic,
    Extrinsic,
    #[serde(rename = "Not-a-Bug")]
    NotABug,
    Unknown,
}

impl Classification {
    /// Parse a CSV cell. Labels that don't match the known set collapse to
    /// Unknown rather than failing the row.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "intrinsic" => Classification::Intrinsic,
            "extrinsic" => Classification::Extrinsic,
            "not-a-bug" | "not a bug" => Classification::NotABug,
            _ => Classification::Unknown,
        }
    }
}

/// One labeled issue from the input CSV.
#[derive(Debug, Clone)]
pub struct DatasetRow {
    pub html_url: String,
    pub classification: Classification,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    html_url: String,
    #[serde(rename = "FINAL Classification", default)]
    classification: Option<String>,
}

/// Read the labeled dataset. Rows without a github.com URL are dropped here;
/// the caller reports how many rows survived.
pub fn read_dataset(path: &Path) -> Result<Vec<DatasetRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open dataset CSV at {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result.context("Failed to parse dataset CSV row")?;
        let url = row.html_url.trim().to_string();
        if url.is_empty() || !url.contains("github.com") {
            continue;
        }
        let classification = row
            .classification
            .as_deref()
            .map(Classification::parse)
            .unwrap_or(Classification::Unknown);
        rows.push(DatasetRow {
            html_url: url,
            classification,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_known_classifications() {
        assert_eq!(Classification::parse("Intrinsic"), Classification::Intrinsic);
        assert_eq!(Classification::parse("extrinsic"), Classification::Extrinsic);
        assert_eq!(Classification::parse("Not-a-Bug"), Classification::NotABug);
        assert_eq!(Classification::parse("not a bug"), Classification::NotABug);
    }

    #[test]
    fn test_parse_unknown_classification_falls_back() {
        assert_eq!(Classification::parse(""), Classification::Unknown);
        assert_eq!(Classification::parse("maybe?"), Classification::Unknown);
    }

    #[test]
    fn test_classification_serializes_with_dashes() {
        let json = serde_json::to_string(&Classification::NotABug).unwrap();
        assert_eq!(json, "\"Not-a-Bug\"");
    }

    #[test]
    fn test_read_dataset_skips_non_github_rows() {
        // Unique per process so concurrent test runs don't collide.
        let path = std::env::temp_dir().join(format!(
            "issue_harvest_dataset_test_{}.csv",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "html_url,FINAL Classification").unwrap();
        writeln!(file, "https://github.com/rust-lang/rust/issues/1,Intrinsic").unwrap();
        writeln!(file, "not-a-url,Extrinsic").unwrap();
        writeln!(file, ",Intrinsic").unwrap();
        drop(file);

        let rows = read_dataset(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].html_url, "https://github.com/rust-lang/rust/issues/1");
        assert_eq!(rows[0].classification, Classification::Intrinsic);

        let _ = std::fs::remove_file(&path);
    }
}
