use std::env;

/// Backend address when the SDK runs next to the user (browser on localhost).
pub const LOCAL_API_URL: &str = "http://localhost:8000";
/// Backend address as seen from inside the compose network.
pub const CONTAINER_API_URL: &str = "http://api:8000";
/// Environment variable overriding the configured API URL.
pub const API_URL_ENV: &str = "COINCOMPARE_API_URL";

pub const COINS_PATH: &str = "/coins/";
pub const COIN_SEARCH_PATH: &str = "/coins/search";
pub const EXCHANGES_PATH: &str = "/exchanges/";
pub const COMPARE_PATH: &str = "/compare";

/// Coins shown per page by the store.
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// Shortest query forwarded to the upstream coin search.
pub const MIN_SEARCH_LEN: usize = 2;

/// 24h volume above which an exchange counts as major.
pub const MAJOR_VOLUME_THRESHOLD: f64 = 1_000_000.0;
/// 24h volume above which an exchange counts as popular.
pub const POPULAR_VOLUME_THRESHOLD: f64 = 100_000.0;

/// Pending notifications a store keeps before dropping the oldest.
pub const MAX_PENDING_NOTIFICATIONS: usize = 50;

pub const LOAD_COINS_FAILED: &str = "Failed to load coins";
pub const ADD_COIN_FAILED: &str = "Failed to add coin";
pub const REMOVE_COIN_FAILED: &str = "Failed to remove coin";

/// Where the SDK is running, which decides how the backend is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeContext {
    /// Driven from a user's machine; `hostname` is the host the UI was served from.
    Browser { hostname: String },
    /// Running inside a container or server-side process.
    Container,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::Browser {
            hostname: "localhost".to_string(),
        }
    }
}

/// Resolve the backend base URL for the given runtime context.
///
/// `configured` is an explicit API URL (usually from [`API_URL_ENV`]). A
/// browser on `localhost` always talks to [`LOCAL_API_URL`]; other hosts use
/// the configured URL and fall back to the local one. Containers use the
/// configured URL and fall back to [`CONTAINER_API_URL`].
pub fn resolve_base_url(context: &RuntimeContext, configured: Option<&str>) -> String {
    let configured = configured.map(str::trim).filter(|s| !s.is_empty());
    let url = match context {
        RuntimeContext::Browser { hostname } if hostname == "localhost" => LOCAL_API_URL,
        RuntimeContext::Browser { .. } => configured.unwrap_or(LOCAL_API_URL),
        RuntimeContext::Container => configured.unwrap_or(CONTAINER_API_URL),
    };
    url.trim_end_matches('/').to_string()
}

/// The API URL from the process environment, if set.
pub fn configured_api_url() -> Option<String> {
    env::var(API_URL_ENV).ok()
}
