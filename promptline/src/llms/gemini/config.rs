//! Gemini client configuration.

/// Configuration for the Gemini client.
///
/// The credential is carried explicitly; nothing in the client reads the
/// process environment on its own.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication. `None` sends the request unauthenticated.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to Google's public endpoint).
    pub base_url: String,
    /// Default model to use.
    pub model: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// Default Gemini API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-pro-preview-03-25";
    /// Environment variable holding the API key.
    pub const API_KEY_ENV: &'static str = "GEMINI_API_KEY";
    /// Environment variable overriding the base URL.
    pub const BASE_URL_ENV: &'static str = "GEMINI_BASE_URL";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: non_empty(api_key.into()),
            ..Self::anonymous()
        }
    }

    /// Creates a configuration without a credential.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            api_key: None,
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: None,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `GEMINI_API_KEY` - API key; a missing key is not an error here
    /// - `GEMINI_BASE_URL` - Optional base URL
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    ///
    /// Each variable is looked up exactly once.
    #[must_use]
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let api_key = lookup(Self::API_KEY_ENV).and_then(non_empty);
        let base_url = lookup(Self::BASE_URL_ENV)
            .and_then(non_empty)
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        Self {
            api_key,
            base_url,
            ..Self::anonymous()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Returns `true` if a credential is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
