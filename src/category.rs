//! Extension-based file categorization.
//!
//! This module maps file extensions to named categories (e.g. "Images",
//! "Documents"). The table is ordered: lookups walk the categories in the
//! order they were declared and return the first one whose extension set
//! contains the input. Anything unmatched lands in [`DEFAULT_CATEGORY`].
//!
//! # Examples
//!
//! ```
//! use folder_cleaner::category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.category_for(".png"), "Images");
//! assert_eq!(table.category_for("PDF"), "Documents");
//! assert_eq!(table.category_for(".xyz"), "Others");
//! ```

use std::collections::HashMap;
use std::path::{Component, Path};

/// Category used for files whose extension is not in the table.
pub const DEFAULT_CATEGORY: &str = "Others";

const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp"],
    ),
    (
        "Documents",
        &[
            ".pdf", ".docx", ".doc", ".txt", ".pptx", ".ppt", ".xlsx", ".xls", ".csv", ".md",
            ".json",
        ],
    ),
    ("Archives", &[".zip", ".rar", ".tar", ".gz", ".7z", ".iso"]),
    ("Programs", &[".exe", ".msi", ".bat", ".sh", ".apk"]),
    ("Videos", &[".mp4", ".mkv", ".avi", ".mov", ".flv", ".wmv"]),
    ("Audio", &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a"]),
    (
        "Code",
        &[
            ".py", ".java", ".cpp", ".c", ".js", ".html", ".css", ".php", ".rb", ".go", ".ts",
        ],
    ),
    ("Fonts", &[".ttf", ".otf", ".woff", ".woff2"]),
];

/// Errors raised while building a [`CategoryTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A category name is empty.
    #[error("category name must not be empty")]
    EmptyName,
    /// A category name would not resolve to a single subdirectory.
    #[error("category name '{0}' must be a single directory name")]
    InvalidName(String),
    /// The same category name is declared twice.
    #[error("category '{0}' is declared more than once")]
    DuplicateCategory(String),
    /// An extension entry is empty after normalization.
    #[error("category '{category}' contains an empty extension")]
    EmptyExtension { category: String },
    /// An extension is claimed by more than one category.
    #[error("extension '{extension}' is listed under both '{first}' and '{second}'")]
    OverlappingExtension {
        extension: String,
        first: String,
        second: String,
    },
}

/// A single named bucket and the extensions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// The category name, which is also its subdirectory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized extensions (lower-case, leading dot).
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

/// Ordered mapping from category name to extension set.
///
/// Built once and never mutated. Construction rejects overlapping
/// extensions, so every extension belongs to at most one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Builds a table from `(name, extensions)` pairs, keeping their order.
    ///
    /// Extensions are normalized with [`normalize_extension`]; repeats within
    /// one category are collapsed.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if a name is empty, not a plain directory
    /// name, or declared twice, or if an extension is empty or shared
    /// between two categories.
    ///
    /// # Examples
    ///
    /// ```
    /// use folder_cleaner::category::CategoryTable;
    ///
    /// let table = CategoryTable::new([("Pictures", ["PNG", ".jpg"])]).unwrap();
    /// assert_eq!(table.category_for(".png"), "Pictures");
    ///
    /// let overlap = CategoryTable::new([("A", [".x"]), ("B", [".x"])]);
    /// assert!(overlap.is_err());
    /// ```
    pub fn new<I, N, E, S>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: Vec<Category> = Vec::new();
        let mut owners: HashMap<String, String> = HashMap::new();

        for (name, extensions) in entries {
            let name = name.into();
            validate_name(&name)?;
            if categories.iter().any(|c| c.name == name) {
                return Err(TableError::DuplicateCategory(name));
            }

            let mut normalized: Vec<String> = Vec::new();
            for ext in extensions {
                let ext = normalize_extension(ext.as_ref());
                if ext.is_empty() {
                    return Err(TableError::EmptyExtension { category: name });
                }
                if normalized.contains(&ext) {
                    continue;
                }
                if let Some(first) = owners.get(&ext) {
                    return Err(TableError::OverlappingExtension {
                        extension: ext,
                        first: first.clone(),
                        second: name,
                    });
                }
                owners.insert(ext.clone(), name.clone());
                normalized.push(ext);
            }

            categories.push(Category {
                name,
                extensions: normalized,
            });
        }

        Ok(Self { categories })
    }

    /// Returns the category for an extension, with or without its leading
    /// dot and in any case. Unknown or empty extensions map to
    /// [`DEFAULT_CATEGORY`].
    pub fn category_for(&self, extension: &str) -> &str {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return DEFAULT_CATEGORY;
        }
        self.categories
            .iter()
            .find(|c| c.contains(&extension))
            .map(|c| c.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Returns the category for a file name, using the text after its last
    /// dot as the extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use folder_cleaner::category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.category_for_file("backup.tar.gz"), "Archives");
    /// assert_eq!(table.category_for_file("readme"), "Others");
    /// ```
    pub fn category_for_file(&self, file_name: &str) -> &str {
        let (_, ext) = split_file_name(file_name);
        self.category_for(ext)
    }

    /// Iterates the categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: DEFAULT_TABLE
                .iter()
                .map(|(name, extensions)| Category {
                    name: (*name).to_string(),
                    extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Lower-cases an extension and gives it a leading dot.
///
/// An empty input stays empty.
///
/// # Examples
///
/// ```
/// use folder_cleaner::category::normalize_extension;
///
/// assert_eq!(normalize_extension("JPG"), ".jpg");
/// assert_eq!(normalize_extension(".Md"), ".md");
/// assert_eq!(normalize_extension(""), "");
/// ```
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Splits a file name into base and extension at the last dot.
///
/// Leading dots belong to the base, so dotfiles have no extension. The
/// returned extension keeps its dot.
///
/// # Examples
///
/// ```
/// use folder_cleaner::category::split_file_name;
///
/// assert_eq!(split_file_name("a.tar.gz"), ("a.tar", ".gz"));
/// assert_eq!(split_file_name(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_file_name("readme"), ("readme", ""));
/// ```
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    let first_non_dot = file_name
        .find(|c: char| c != '.')
        .unwrap_or(file_name.len());
    match file_name.rfind('.') {
        Some(dot) if dot > first_non_dot => file_name.split_at(dot),
        _ => (file_name, ""),
    }
}

fn validate_name(name: &str) -> Result<(), TableError> {
    if name.trim().is_empty() {
        return Err(TableError::EmptyName);
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(TableError::InvalidName(name.to_string())),
    }
}
