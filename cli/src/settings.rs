//! YAML settings for the `bookshelf` binary.
//!
//! Every key is optional; a missing key takes its default, and a missing
//! settings file is the same as an empty one.
//!
//! # Example YAML
//!
//! ```yaml
//! database: ~/books/library.db
//! table: books
//! variant: full
//! placeholders:
//!   title: Enter Title
//!   author: Enter Author
//!   year: Enter Year
//!   isbn: Enter ISBN
//!   notes: Enter Notes
//!   current_page: Enter Current Page
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use bookshelf_core::{Placeholders, Variant};
use bookshelf_sqlite::DEFAULT_TABLE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "library.db";

/// Errors reading or writing a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Resolved configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file.
    pub database: PathBuf,
    /// Book table name.
    pub table: String,
    /// Table layout and validation strictness.
    pub variant: Variant,
    /// Hint text treated as blank input.
    pub placeholders: Placeholders,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
            variant: Variant::default(),
            placeholders: Placeholders::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read, or
    /// [`SettingsError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let settings = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(settings)
    }

    /// Loads settings from `path` if given and present, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!(path = %path.display(), "settings file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Saves the settings as YAML, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::Field;

    #[test]
    fn test_empty_document_is_default() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.database, PathBuf::from("library.db"));
        assert_eq!(settings.table, "books");
        assert_eq!(settings.variant, Variant::Full);
    }

    #[test]
    fn test_partial_document() {
        let yaml = r#"
database: /tmp/shelf.db
variant: minimal
placeholders:
  title: Book title
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.database, PathBuf::from("/tmp/shelf.db"));
        assert_eq!(settings.variant, Variant::Minimal);
        assert_eq!(settings.table, "books");
        assert_eq!(settings.placeholders.hint(Field::Title), Some("Book title"));
        assert_eq!(settings.placeholders.hint(Field::Author), None);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(serde_yaml::from_str::<Settings>("variant: strict").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.yml");
        let settings = Settings::load_or_default(Some(absent.as_path())).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.yml");
        std::fs::write(&path, "table: reading\nvariant: minimal\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.table, "reading");
        assert_eq!(settings.variant, Variant::Minimal);
        assert_eq!(settings.placeholders, Placeholders::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.yml");

        let mut settings = Settings::default();
        settings.table = "reading".to_string();
        settings.variant = Variant::Minimal;
        settings.placeholders.set(Field::Title, "Book title");
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.yml");
        std::fs::write(&path, "table: [unclosed\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(SettingsError::Yaml(_))));
    }
}
