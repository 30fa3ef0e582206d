//! Territory document sources

use crate::error::{Result, TerritoryError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Anything that can produce the territory document
#[async_trait]
pub trait TerritorySource: Send + Sync {
    /// Fetch the raw JSON document
    async fn fetch(&self) -> Result<String>;

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}

/// Reads the document from a local file on every poll
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TerritorySource for FileSource {
    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| TerritoryError::Read {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"territories": {{}}}}"#).unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), r#"{"territories": {}}"#);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, TerritoryError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
