//! GitHub repository search.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Environment variable overriding the API endpoint.
pub const API_BASE_ENV: &str = "GHPM_GITHUB_API";
/// Results per page when the requested count is out of range.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page the search command asks for.
pub const MAX_PER_PAGE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Search failures.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport or decoding failure.
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API returned status: {0}")]
    Status(reqwest::StatusCode),
}

/// One search hit.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepoItem {
    /// `owner/name`.
    pub full_name: String,
    /// Repository web page.
    #[serde(default)]
    pub html_url: String,
    /// Short description, if the owner set one.
    #[serde(default)]
    pub description: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Primary language as reported by GitHub.
    #[serde(default)]
    pub language: Option<String>,
}

impl RepoItem {
    /// Language label, `Unknown` when GitHub has none.
    pub fn language_label(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoItem>,
}

/// Page size actually requested: `0` or anything above [`MAX_PER_PAGE`]
/// becomes [`DEFAULT_PER_PAGE`].
pub fn clamp_per_page(requested: u32) -> u32 {
    if requested == 0 || requested > MAX_PER_PAGE {
        DEFAULT_PER_PAGE
    } else {
        requested
    }
}

/// Client for the repository search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    api_base: String,
}

impl SearchClient {
    /// Client against `api_base`, e.g. [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_base: impl Into<String>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Client against `$GHPM_GITHUB_API` or the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, SearchError> {
        let base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(base)
    }

    /// Search repositories matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or an
    /// undecodable body.
    pub async fn search(&self, query: &str, per_page: u32) -> Result<Vec<RepoItem>, SearchError> {
        let url = format!(
            "{}/search/repositories",
            self.api_base.trim_end_matches('/')
        );
        let per_page = clamp_per_page(per_page).to_string();
        tracing::debug!(%url, query, "searching GitHub");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .send()
            .await?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(SearchError::Status(resp.status()));
        }

        let body: SearchResponse = resp.json().await?;
        Ok(body.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_clamp_per_page() {
        assert_eq!(clamp_per_page(0), 10);
        assert_eq!(clamp_per_page(1), 1);
        assert_eq!(clamp_per_page(50), 50);
        assert_eq!(clamp_per_page(51), 10);
    }

    #[tokio::test]
    async fn test_search_parses_items() {
        let mut server = Server::new_async().await;
        let body = r#"{
            "total_count": 2,
            "items": [
                {"full_name": "aristocratos/btop", "html_url": "https://github.com/aristocratos/btop",
                 "description": "A monitor", "stargazers_count": 20000, "language": "C++"},
                {"full_name": "someone/btop-themes", "html_url": "https://github.com/someone/btop-themes",
                 "description": null, "stargazers_count": 3, "language": null}
            ]
        }"#;

        let _m = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "btop".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
            ]))
            .match_header("accept", "application/vnd.github.v3+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = SearchClient::new(server.url()).unwrap();
        let items = client.search("btop", 0).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].full_name, "aristocratos/btop");
        assert_eq!(items[0].language_label(), "C++");
        assert_eq!(items[1].language_label(), "Unknown");
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let client = SearchClient::new(server.url()).unwrap();
        let err = client.search("btop", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Status(s) if s.as_u16() == 403));
    }
}
