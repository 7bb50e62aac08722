//! Settings naming the pair of files to compare.
//!
//! The settings file is JSON:
//!
//! ```json
//! { "FilePaths": { "Userfile": "appsettings.json", "Yoursample": "appsettings.sample.json" } }
//! ```
//!
//! `Userfile` is the reference document, `Yoursample` the sample. Relative paths are
//! resolved against the directory holding the settings file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(rename = "FilePaths", default)]
    pub file_paths: FilePaths,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilePaths {
    #[serde(rename = "Userfile", default)]
    pub reference: Option<String>,
    #[serde(rename = "Yoursample", default)]
    pub sample: Option<String>,
}

/// The two documents of one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub reference: PathBuf,
    pub sample: PathBuf,
}

impl Settings {
    /// Reads and parses a settings file, resolving relative file paths against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            settings.file_paths.reference = settings.file_paths.reference.map(|p| resolve(base, &p));
            settings.file_paths.sample = settings.file_paths.sample.map(|p| resolve(base, &p));
        }

        debug!(settings = %path.display(), file_paths = ?settings.file_paths, "loaded settings");
        Ok(settings)
    }

    /// The reference and sample paths. Missing or blank entries are an error.
    pub fn file_pair(&self) -> Result<FilePair, ConfigError> {
        Ok(FilePair {
            reference: required(self.file_paths.reference.as_deref(), "Userfile")?,
            sample: required(self.file_paths.sample.as_deref(), "Yoursample")?,
        })
    }
}

fn required(value: Option<&str>, name: &'static str) -> Result<PathBuf, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => Err(ConfigError::MissingPath(name)),
    }
}

// Blank values stay blank so `file_pair` reports them as missing.
fn resolve(base: &Path, value: &str) -> String {
    let candidate = Path::new(value);
    if value.trim().is_empty() || candidate.is_absolute() || base.as_os_str().is_empty() {
        return value.to_string();
    }
    base.join(candidate).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("settings.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn relative_paths_resolve_against_settings_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{"FilePaths": {"Userfile": "user.json", "Yoursample": "sample.json"}}"#,
        );

        let pair = Settings::load(&path).unwrap().file_pair().unwrap();
        assert_eq!(pair.reference, dir.path().join("user.json"));
        assert_eq!(pair.sample, dir.path().join("sample.json"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("elsewhere").join("user.json");
        let contents = serde_json::json!({
            "FilePaths": {"Userfile": absolute, "Yoursample": "sample.json"}
        });
        let path = write_settings(dir.path(), &contents.to_string());

        let pair = Settings::load(&path).unwrap().file_pair().unwrap();
        assert_eq!(pair.reference, absolute);
    }

    #[test]
    fn blank_or_missing_entries() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_settings(dir.path(), r#"{"FilePaths": {"Userfile": "  ", "Yoursample": "s.json"}}"#);
        let err = Settings::load(&path).unwrap().file_pair().unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath("Userfile")), "{:?}", err);

        let path = write_settings(dir.path(), r#"{"FilePaths": {"Userfile": "u.json"}}"#);
        let err = Settings::load(&path).unwrap().file_pair().unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath("Yoursample")), "{:?}", err);

        let path = write_settings(dir.path(), "{}");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let err = Settings::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)), "{:?}", err);

        let path = write_settings(dir.path(), "{ FilePaths: ");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{:?}", err);
    }
}
