//! Modrinth search client and the background worker that keeps it off the UI thread.

use crate::config::AppConfig;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Loaders offered as filters in the search panel.
pub const KNOWN_LOADERS: [&str; 4] = ["fabric", "forge", "neoforge", "quilt"];

/// One search request, including pagination.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub versions: Vec<String>,
    pub loaders: Vec<String>,
    pub offset: u32,
    pub limit: u32,
}

impl SearchQuery {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Facet filter in the API's nested-array form, or `None` when unfiltered.
    ///
    /// Values inside one group are OR-ed and the groups are AND-ed.
    pub fn facets(&self) -> Option<String> {
        let mut groups: Vec<Vec<String>> = Vec::new();
        if !self.versions.is_empty() {
            groups.push(self.versions.iter().map(|v| format!("versions:{v}")).collect());
        }
        if !self.loaders.is_empty() {
            groups.push(self.loaders.iter().map(|l| format!("categories:{l}")).collect());
        }
        if groups.is_empty() {
            None
        } else {
            serde_json::to_string(&groups).ok()
        }
    }

    /// Query-string parameters for `GET /search`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.text.trim().to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(facets) = self.facets() {
            params.push(("facets", facets));
        }
        params
    }
}

/// A single search result as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub downloads: u64,
}

/// One page of results.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_hits: u32,
}

#[derive(Debug)]
pub enum SearchError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(reqwest::Error),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status(status) => write!(f, "search API returned {status}"),
            Self::Decode(err) => write!(f, "invalid search response: {err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) | Self::Decode(err) => Some(err),
            Self::Status(_) => None,
        }
    }
}

/// Blocking client for the mod-repository search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl SearchClient {
    pub fn new(config: &AppConfig) -> Result<Self, SearchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(SearchError::Http)?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    /// Runs one search. A blank query returns an empty page without touching the network.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchPage, SearchError> {
        if query.is_blank() {
            return Ok(SearchPage {
                limit: query.limit,
                ..SearchPage::default()
            });
        }

        let mut request = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&query.params());
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().map_err(SearchError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }
        let page: SearchPage = response.json().map_err(SearchError::Decode)?;
        log::debug!(
            "Search '{}' returned {} of {} hits",
            query.text,
            page.hits.len(),
            page.total_hits
        );
        Ok(page)
    }
}

/// What the UI receives once a background search finishes.
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: SearchQuery,
    pub page: SearchPage,
    pub error: Option<String>,
}

impl SearchOutcome {
    /// Failures degrade to an empty page carrying the error message.
    pub fn from_result(query: SearchQuery, result: Result<SearchPage, SearchError>) -> Self {
        match result {
            Ok(page) => Self {
                query,
                page,
                error: None,
            },
            Err(err) => {
                log::warn!("Search for '{}' failed: {err}", query.text);
                Self {
                    page: SearchPage {
                        offset: query.offset,
                        limit: query.limit,
                        ..SearchPage::default()
                    },
                    query,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Runs searches on background threads and hands the outcomes back to the UI thread.
///
/// Outcomes are delivered in arrival order; a slow earlier search can overwrite a faster
/// later one.
pub struct SearchWorker {
    client: Option<SearchClient>,
    tx: Sender<SearchOutcome>,
    rx: Receiver<SearchOutcome>,
    in_flight: usize,
}

impl SearchWorker {
    pub fn new(config: &AppConfig) -> Self {
        let client = match SearchClient::new(config) {
            Ok(client) => Some(client),
            Err(err) => {
                log::error!("Search is unavailable: {err}");
                None
            }
        };
        let (tx, rx) = channel();
        Self {
            client,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Starts a search. Blank queries complete immediately without spawning anything.
    /// `notify` is called from the worker thread once the outcome has been sent.
    pub fn submit<F>(&mut self, query: SearchQuery, notify: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let client = match &self.client {
            Some(client) if !query.is_blank() => client.clone(),
            Some(_) => {
                let page = SearchPage {
                    limit: query.limit,
                    ..SearchPage::default()
                };
                let _ = self.tx.send(SearchOutcome::from_result(query, Ok(page)));
                self.in_flight += 1;
                notify();
                return;
            }
            None => {
                let _ = self.tx.send(SearchOutcome {
                    page: SearchPage::default(),
                    query,
                    error: Some("search client could not be created".to_string()),
                });
                self.in_flight += 1;
                notify();
                return;
            }
        };

        self.in_flight += 1;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = client.search(&query);
            let _ = tx.send(SearchOutcome::from_result(query, result));
            notify();
        });
    }

    /// Returns every outcome that has arrived since the last poll, oldest first.
    pub fn poll(&mut self) -> Vec<SearchOutcome> {
        let outcomes: Vec<SearchOutcome> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> AppConfig {
        AppConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            ..AppConfig::default()
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            limit: 20,
            ..SearchQuery::default()
        }
    }

    #[test]
    fn test_facets_group_versions_and_loaders() {
        let mut q = query("sodium");
        assert_eq!(q.facets(), None);

        q.versions = vec!["1.20.1".to_string(), "1.20.4".to_string()];
        assert_eq!(
            q.facets().as_deref(),
            Some(r#"[["versions:1.20.1","versions:1.20.4"]]"#)
        );

        q.loaders = vec!["fabric".to_string()];
        assert_eq!(
            q.facets().as_deref(),
            Some(r#"[["versions:1.20.1","versions:1.20.4"],["categories:fabric"]]"#)
        );
    }

    #[test]
    fn test_params_include_pagination() {
        let mut q = query("  create  ");
        q.offset = 40;
        let params = q.params();
        assert!(params.contains(&("query", "create".to_string())));
        assert!(params.contains(&("limit", "20".to_string())));
        assert!(params.contains(&("offset", "40".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "facets"));
    }

    #[test]
    fn test_blank_query_skips_network() {
        // The base URL points nowhere, so any request would fail.
        let client = SearchClient::new(&offline_config()).unwrap();
        for text in ["", "   "] {
            let page = client.search(&query(text)).unwrap();
            assert!(page.hits.is_empty());
            assert_eq!(page.total_hits, 0);
        }
    }

    #[test]
    fn test_unreachable_api_degrades_to_empty_outcome() {
        let client = SearchClient::new(&offline_config()).unwrap();
        let q = query("sodium");
        let outcome = SearchOutcome::from_result(q.clone(), client.search(&q));
        assert!(outcome.page.hits.is_empty());
        assert!(outcome.error.is_some());
        assert_eq!(outcome.query, q);
    }

    #[test]
    fn test_worker_delivers_outcomes() {
        let mut worker = SearchWorker::new(&offline_config());
        let (done_tx, done_rx) = channel();
        worker.submit(query("sodium"), move || {
            let _ = done_tx.send(());
        });
        assert!(worker.is_busy());
        done_rx.recv_timeout(Duration::from_secs(10)).unwrap();

        let outcomes = worker.poll();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_some());
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_worker_blank_query_completes_immediately() {
        let mut worker = SearchWorker::new(&offline_config());
        worker.submit(query(""), || {});
        let outcomes = worker.poll();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_none());
        assert!(outcomes[0].page.hits.is_empty());
    }

    #[test]
    fn test_page_decodes_with_missing_fields() {
        let page: SearchPage = serde_json::from_str(
            r#"{"hits":[{"slug":"iris","title":"Iris","icon_url":null,"project_id":"x"}],
                "total_hits":1}"#,
        )
        .unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].author, "");
        assert_eq!(page.hits[0].icon_url, None);
        assert_eq!(page.total_hits, 1);
    }
}
