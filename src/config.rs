use std::time::Duration;

/// Default backend endpoint, the search route of the local document server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/search";

/// Matches kept per query. Bounds the navigation UI, not relevance.
pub const DEFAULT_MAX_MATCHES: usize = 5;

/// Whitespace tokens of a match snippet used as the locator phrase.
pub const DEFAULT_PHRASE_TOKENS: usize = 3;

/// Flat-text chars highlighted from the match start.
pub const DEFAULT_WINDOW_CHARS: usize = 500;

/// Settings shared by the dispatcher, navigator and locator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub max_matches: usize,
    pub phrase_tokens: usize,
    pub window_chars: usize,
    /// Wait after asking the viewer for a page before locating on it
    pub render_settle_delay: Duration,
    /// Wait after marking before the visibility check and scroll
    pub scroll_delay: Duration,
    /// `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_matches: DEFAULT_MAX_MATCHES,
            phrase_tokens: DEFAULT_PHRASE_TOKENS,
            window_chars: DEFAULT_WINDOW_CHARS,
            render_settle_delay: Duration::from_millis(200),
            scroll_delay: Duration::from_millis(100),
            request_timeout: None,
            user_agent: concat!("textlayer-search/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_matches(mut self, max: usize) -> Self {
        self.max_matches = max;
        self
    }

    pub fn with_phrase_tokens(mut self, tokens: usize) -> Self {
        self.phrase_tokens = tokens;
        self
    }

    pub fn with_window_chars(mut self, chars: usize) -> Self {
        self.window_chars = chars;
        self
    }

    pub fn with_delays(mut self, render_settle: Duration, scroll: Duration) -> Self {
        self.render_settle_delay = render_settle;
        self.scroll_delay = scroll;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Locator phrase for a match snippet: its first `phrase_tokens`
    /// whitespace-separated tokens joined by single spaces.
    pub fn phrase_for(&self, snippet: &str) -> String {
        snippet
            .split_whitespace()
            .take(self.phrase_tokens)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.max_matches, 5);
        assert_eq!(cfg.window_chars, 500);
        assert_eq!(cfg.render_settle_delay, Duration::from_millis(200));
        assert_eq!(cfg.scroll_delay, Duration::from_millis(100));
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn phrase_takes_first_three_tokens() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.phrase_for("Alpha beta gamma delta"), "Alpha beta gamma");
        assert_eq!(cfg.phrase_for("  Alpha\n\tbeta   gamma  "), "Alpha beta gamma");
        assert_eq!(cfg.phrase_for("solo"), "solo");
        assert_eq!(cfg.phrase_for("   "), "");
    }

    #[test]
    fn builder_overrides() {
        let cfg = SearchConfig::new()
            .with_endpoint("http://localhost:9/api/search")
            .with_phrase_tokens(2)
            .with_timeout(Duration::from_secs(3));
        assert_eq!(cfg.endpoint, "http://localhost:9/api/search");
        assert_eq!(cfg.phrase_for("a b c"), "a b");
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(3)));
    }
}
