use url::Url;

use super::{Match, SearchBackend, SearchError, SearchErrorKind};
use crate::config::SearchConfig;

/// Blocking HTTP client for `GET <endpoint>?q=<query>[&id=<document id>]`.
pub struct HttpSearchBackend {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpSearchBackend {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            SearchError::new(SearchErrorKind::InvalidUrl, format!("Invalid endpoint: {}", e))
        })?;

        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            SearchError::new(SearchErrorKind::Transport, format!("Client error: {}", e))
        })?;

        Ok(Self { client, endpoint })
    }

    /// Request URL for a query. The query is passed through untrimmed.
    pub fn request_url(&self, query: &str, document_id: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(id) = document_id {
                pairs.append_pair("id", id);
            }
        }
        url
    }
}

impl SearchBackend for HttpSearchBackend {
    fn search(&self, query: &str, document_id: Option<&str>) -> Result<Vec<Match>, SearchError> {
        let url = self.request_url(query, document_id);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                SearchError::new(SearchErrorKind::Transport, format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                SearchErrorKind::Status(status.as_u16()),
                "Search request failed",
            ));
        }

        response.json::<Vec<Match>>().map_err(|e| {
            SearchError::new(SearchErrorKind::Decode, format!("Bad search payload: {}", e))
        })
    }
}
