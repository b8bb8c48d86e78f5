//! Runtime selection of the backing store.

/// Which backend the store factory builds. Chosen once at startup; nothing
/// downstream branches on it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// The real sync API.
    Live,
    /// The local json item store used during development.
    Json,
}

/// Connection settings for the table store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(backend: BackendKind, base_url: impl Into<String>) -> Self {
        Self {
            backend,
            base_url: base_url.into(),
        }
    }

    /// Read the configuration from the environment, falling back to the
    /// local development defaults.
    pub fn from_env() -> Self {
        let backend = match std::env::var("TABLESYNC_USE_JSON_DATA") {
            Ok(value) if value == "true" => BackendKind::Json,
            _ => BackendKind::Live,
        };
        Self {
            backend,
            base_url: std::env::var("TABLESYNC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        }
    }
}
