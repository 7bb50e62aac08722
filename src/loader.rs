//! Reading JSON documents from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;

/// Reads `path` and parses it as a JSON document.
///
/// Any JSON value is accepted here; [`crate::Diff::compare`] rejects roots that are not
/// objects.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        line: source.line(),
        column: source.column(),
        source,
    })?;

    debug!(path = %path.display(), bytes = text.len(), "loaded document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_and_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, r#"{"zeta": 1, "alpha": {"b": true, "a": null}}"#).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document, json!({"zeta": 1, "alpha": {"b": true, "a": null}}));

        let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)), "{:?}", err);
    }

    #[test]
    fn malformed_json_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\n  \"port\": 80,\n  \"host\": \n}").unwrap();

        let err = load_document(&path).unwrap_err();
        assert_eq!(err.to_string(), format!("malformed JSON in {}", path.display()));
        match &err {
            LoadError::Parse { line, source, .. } => {
                assert_eq!(*line, 4);
                assert!(source.to_string().contains("line 4"), "{}", source);
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }), "{:?}", err);
    }
}
