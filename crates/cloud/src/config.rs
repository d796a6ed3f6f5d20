use reelcast_core::storage::DEFAULT_BUCKET;

/// Number of URL characters shown by [`SupabaseConfig::redacted_url`].
const REDACTED_URL_LEN: usize = 50;

/// Supabase project settings.
///
/// URL and key are optional so the server can start without them; every
/// storage call then fails with `StorageError::NotConfigured`.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,
    /// Anonymous (or service role) API key.
    pub anon_key: Option<String>,
    /// Storage bucket receiving the videos.
    pub bucket: String,
}

impl SupabaseConfig {
    /// Load from environment variables.
    ///
    /// | Env Var             | Default        |
    /// |---------------------|----------------|
    /// | `SUPABASE_URL`      | unset          |
    /// | `SUPABASE_ANON_KEY` | unset          |
    /// | `SUPABASE_BUCKET`   | `manim-videos` |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            url: non_empty("SUPABASE_URL"),
            anon_key: non_empty("SUPABASE_ANON_KEY"),
            bucket: non_empty("SUPABASE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        }
    }

    /// Whether both URL and key are present.
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }

    /// The first 50 characters of the URL followed by `...`, for diagnostics.
    pub fn redacted_url(&self) -> Option<String> {
        self.url.as_ref().map(|url| {
            let head: String = url.chars().take(REDACTED_URL_LEN).collect();
            format!("{head}...")
        })
    }
}
