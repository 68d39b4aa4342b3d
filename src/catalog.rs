//! Word catalog: category name -> non-empty word list.
//!
//! Populated once at startup from an external source (HTTP URL or local JSON
//! file) and immutable for the lifetime of the process. Any load failure is
//! recovered by substituting the built-in fallback catalog; nothing here ever
//! surfaces to a player.

use serde_json::Value;
use std::path::PathBuf;

/// Keys that may appear in a source document but are internal markers,
/// never selectable categories. Filtered once at ingest.
pub const RESERVED_KEYS: &[&str] = &["__TUTORIAL__"];

/// Where the catalog was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    External,
    Fallback,
}

impl CatalogOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogOrigin::External => "external",
            CatalogOrigin::Fallback => "fallback",
        }
    }
}

/// Configured source for the catalog document.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
struct Category {
    name: String,
    words: Vec<String>,
}

/// Immutable category -> words mapping, discovery order preserved.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    origin: CatalogOrigin,
}

/// Errors from catalog lookups.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
}

/// Errors while loading the source document. Always recovered by fallback,
/// only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,
}

impl Catalog {
    /// Load the catalog from `source`, substituting the built-in fallback on
    /// any failure. Never fails.
    pub async fn load(source: &CatalogSource) -> Self {
        match Self::try_load(source).await {
            Ok(catalog) if !catalog.categories.is_empty() => {
                tracing::info!(
                    categories = catalog.categories.len(),
                    "loaded word catalog from {:?}",
                    source
                );
                catalog
            }
            Ok(_) => {
                tracing::warn!(
                    "word catalog source {:?} contained no usable categories, using fallback",
                    source
                );
                Self::fallback()
            }
            Err(e) => {
                tracing::warn!("could not load word catalog from {:?}: {}, using fallback", source, e);
                Self::fallback()
            }
        }
    }

    async fn try_load(source: &CatalogSource) -> Result<Self, CatalogLoadError> {
        let text = match source {
            CatalogSource::Url(url) => {
                reqwest::get(url)
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        };
        Self::parse(&text)
    }

    /// Parse a source document into a catalog.
    ///
    /// Reserved keys are dropped, as are categories whose value is not an
    /// array or that contain no string entries. An empty or non-object
    /// document is an error (callers fall back).
    pub fn parse(text: &str) -> Result<Self, CatalogLoadError> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(CatalogLoadError::NotAnObject)?;

        let mut categories = Vec::new();
        for (name, entry) in object {
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
            let words: Vec<String> = match entry.as_array() {
                Some(list) => list
                    .iter()
                    .filter_map(|w| w.as_str())
                    .map(|w| w.to_string())
                    .collect(),
                None => {
                    tracing::warn!("category \"{}\" is not a word list, dropping it", name);
                    continue;
                }
            };
            if words.is_empty() {
                tracing::warn!("category \"{}\" has no words, dropping it", name);
                continue;
            }
            categories.push(Category {
                name: name.clone(),
                words,
            });
        }

        Ok(Self {
            categories,
            origin: CatalogOrigin::External,
        })
    }

    /// The built-in catalog used when the source cannot be loaded.
    pub fn fallback() -> Self {
        let built_in: &[(&str, &[&str])] = &[
            ("Animals", &["Dog", "Cat", "Lion", "Tiger", "Elephant"]),
            ("Food", &["Pizza", "Burger", "Sushi", "Pasta"]),
            ("Movies", &["Avatar", "Titanic", "Matrix"]),
            ("Places", &["Beach", "Park", "Hospital"]),
        ];

        Self {
            categories: built_in
                .iter()
                .map(|(name, words)| Category {
                    name: name.to_string(),
                    words: words.iter().map(|w| w.to_string()).collect(),
                })
                .collect(),
            origin: CatalogOrigin::Fallback,
        }
    }

    /// Category names in discovery order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// The first category, used as the session default.
    pub fn default_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.name.as_str())
    }

    /// Words for a category. Every known category has at least one word.
    pub fn words_for(&self, category: &str) -> Result<&[String], CatalogError> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.words.as_slice())
            .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
