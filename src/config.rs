//! Category table configuration.
//!
//! The built-in category table can be replaced by a TOML file. Categories are
//! declared as an array of tables so their order (which decides first-match
//! lookups) is the order they appear in the file:
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", ".png"]
//!
//! [[categories]]
//! name = "Documents"
//! extensions = ["pdf", "txt"]
//! ```
//!
//! Configuration is only ever read. An empty or absent `categories` list
//! keeps the built-in table.

use crate::category::{CategoryTable, TableError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".folder-cleaner.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// IO error while reading configuration.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(#[from] toml::de::Error),
    /// The declared categories do not form a valid table.
    #[error("Invalid category table: {0}")]
    InvalidTable(#[from] TableError),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Categories in lookup order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl CleanerConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.folder-cleaner.toml` in the current directory
    /// 3. Look for `~/.config/folder-cleaner/config.toml`
    /// 4. Fall back to the built-in table
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found cannot be parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("folder-cleaner")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the category table this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTable`] when categories overlap or are
    /// badly named.
    pub fn into_table(self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::default());
        }
        let table = CategoryTable::new(
            self.categories
                .into_iter()
                .map(|category| (category.name, category.extensions)),
        )?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_uses_builtin_table() {
        let table = CleanerConfig::default().into_table().unwrap();
        assert_eq!(table, CategoryTable::default());
    }

    #[test]
    fn test_parse_categories_in_order() {
        let config = CleanerConfig::from_toml(
            r#"
            [[categories]]
            name = "Raw"
            extensions = ["CR2", ".nef"]

            [[categories]]
            name = "Images"
            extensions = [".png"]
            "#,
        )
        .unwrap();
        let table = config.into_table().unwrap();

        let names: Vec<_> = table.categories().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Raw", "Images"]);
        assert_eq!(table.category_for(".cr2"), "Raw");
        assert_eq!(table.category_for(".jpg"), "Others");
    }

    #[test]
    fn test_empty_document_is_default() {
        let table = CleanerConfig::from_toml("").unwrap().into_table().unwrap();
        assert_eq!(table, CategoryTable::default());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = CleanerConfig::from_toml("[[categories]\nname = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_overlapping_categories_rejected() {
        let config = CleanerConfig::from_toml(
            r#"
            [[categories]]
            name = "A"
            extensions = [".txt"]

            [[categories]]
            name = "B"
            extensions = ["txt"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.into_table(),
            Err(ConfigError::InvalidTable(
                TableError::OverlappingExtension { .. }
            ))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("cleaner.toml");
        fs::write(
            &path,
            "[[categories]]\nname = \"Books\"\nextensions = [\"epub\"]\n",
        )
        .unwrap();

        let table = CleanerConfig::load(Some(&path))
            .unwrap()
            .into_table()
            .unwrap();
        assert_eq!(table.category_for("epub"), "Books");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = CleanerConfig::load(Some(Path::new("/non/existent/cleaner.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }
}
