//! Server configuration from environment variables.

use std::path::PathBuf;

use crate::catalog::CatalogSource;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// HTTP source for the word catalog; takes precedence over the file path
    pub words_url: Option<String>,
    /// Local word catalog, the same file the frontend would fetch
    pub words_path: PathBuf,
    /// Location of the hand-off store file
    pub handoff_path: PathBuf,
}

const DEFAULT_PORT: u16 = 4117;
const DEFAULT_WORDS_PATH: &str = "static/data.json";
const DEFAULT_HANDOFF_PATH: &str = "data/handoff.json";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            words_url: None,
            words_path: PathBuf::from(DEFAULT_WORDS_PATH),
            handoff_path: PathBuf::from(DEFAULT_HANDOFF_PATH),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let port = std::env::var("IMPOSTER_PORT")
            .ok()
            .and_then(|s| match s.trim().parse::<u16>() {
                Ok(p) => Some(p),
                Err(_) => {
                    tracing::warn!("IMPOSTER_PORT \"{}\" is not a valid port, using default", s);
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        let words_url = std::env::var("IMPOSTER_WORDS_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let words_path = std::env::var("IMPOSTER_WORDS_PATH")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_PATH));

        let handoff_path = std::env::var("IMPOSTER_HANDOFF_PATH")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HANDOFF_PATH));

        Self {
            port,
            words_url,
            words_path,
            handoff_path,
        }
    }

    /// The catalog source this configuration selects.
    pub fn catalog_source(&self) -> CatalogSource {
        match &self.words_url {
            Some(url) => CatalogSource::Url(url.clone()),
            None => CatalogSource::File(self.words_path.clone()),
        }
    }
}
