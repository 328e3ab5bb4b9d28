use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Path argument that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Deserialize a document from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    if path == STDIN_PATH {
        return super::stdin::read_stdin()?
            .ok_or_else(|| "--input - was given but nothing was piped on stdin".into());
    }

    let path = locate(path)?;
    debug!(path = %path.display(), "reading input file");
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
    super::parse_json(&contents, &format!("'{}'", path.display()))
}

/// Relative paths are taken from the working directory.
fn locate(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = std::env::current_dir()?.join(path);
    if path.is_file() {
        Ok(path)
    } else if path.exists() {
        Err(format!("Not a file: {}", path.display()).into())
    } else {
        Err(format!("File not found: {}", path.display()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findeck_core::loan::Loan;

    #[test]
    fn test_missing_file() {
        let err = read_json::<Loan>("no/such/loan.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = std::env::temp_dir();
        let err = read_json::<Loan>(&dir.display().to_string()).unwrap_err();
        assert!(err.to_string().starts_with("Not a file"));
    }

    #[test]
    fn test_reads_absolute_path() {
        let path = std::env::temp_dir().join("findeck-file-test-loan.json");
        fs::write(
            &path,
            r#"{ "principal": "12000", "annual_rate_pct": "0", "term_years": 1 }"#,
        )
        .unwrap();
        let loan: Loan = read_json(&path.display().to_string()).unwrap();
        assert_eq!(loan.months(), 12);
        fs::remove_file(&path).ok();
    }
}
