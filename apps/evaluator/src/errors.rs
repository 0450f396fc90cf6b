use std::path::PathBuf;

use thiserror::Error;

/// Failures reading from the candidate record store. Always fatal for a run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures writing an export file. Fatal for the export step only;
/// files already written stay on disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Prompt variant '{0}' is already registered")]
    DuplicateVariant(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_io_error_names_path() {
        let err = ExportError::io(
            "/tmp/out.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_duplicate_variant_message() {
        let err = RegistryError::DuplicateVariant("original".to_string());
        assert_eq!(err.to_string(), "Prompt variant 'original' is already registered");
    }
}
