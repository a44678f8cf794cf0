//! Content API client
//!
//! Thin wrapper over the headless content repository's HTTP API. Documents
//! come back in their raw wire shape; the display projections live in
//! [`crate::content`].

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::SiteConfig;
use crate::error::{Error, Result};

/// Opaque pagination cursor returned by the content API.
///
/// The inner URL is never parsed, only dereferenced by
/// [`ContentClient::fetch_page`]; exhaustion is modelled as
/// `Option<PageCursor>` at the call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

/// A raw document as returned by the content API
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub uid: Option<String>,
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// One page of query results
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse {
    pub results: Vec<Document>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl PagedResponse {
    /// The next-page URL as an opaque cursor, `None` on the terminal page
    pub fn next_cursor(&self) -> Option<PageCursor> {
        self.next_page.clone().map(PageCursor::new)
    }
}

/// Sort direction for query orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering clause for a typed query
#[derive(Debug, Clone)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Ordering {
    /// Most recent first, by first publication date
    pub fn newest_first() -> Self {
        Self {
            field: "document.first_publication_date".to_string(),
            direction: Direction::Desc,
        }
    }

    fn to_query(&self) -> String {
        match self.direction {
            Direction::Asc => self.field.clone(),
            Direction::Desc => format!("{} desc", self.field),
        }
    }
}

/// Options for a typed document query
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub page_size: usize,
    pub orderings: Option<Ordering>,
}

/// Abstraction over the content API, so the feed and generator can be
/// exercised without a network
#[allow(async_fn_in_trait)]
pub trait ContentApi {
    /// Query documents of a type
    async fn get_by_type(&self, doc_type: &str, options: &QueryOptions) -> Result<PagedResponse>;

    /// Fetch a single document by UID
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document>;

    /// Dereference a pagination cursor
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<PagedResponse>;
}

/// HTTP client for the content repository
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContentClient {
    /// Create a client from a validated configuration
    pub fn new(config: &SiteConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Api {
                status,
                url: response.url().to_string(),
            })
        }
    }
}

impl ContentApi for ContentClient {
    async fn get_by_type(&self, doc_type: &str, options: &QueryOptions) -> Result<PagedResponse> {
        let url = format!("{}/documents", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .query(&[("type", doc_type)])
            .query(&[("pageSize", options.page_size)]);

        if let Some(ordering) = &options.orderings {
            request = request.query(&[("orderings", ordering.to_query())]);
        }

        tracing::debug!("Querying documents of type `{}`", doc_type);
        let response = Self::check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
        let url = format!("{}/documents/{}/{}", self.endpoint, doc_type, uid);

        tracing::debug!("Fetching document {}/{}", doc_type, uid);
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            });
        }

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<PagedResponse> {
        tracing::debug!("Dereferencing pagination cursor");
        let response = Self::check_status(self.http.get(&cursor.0).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_query() {
        assert_eq!(
            Ordering::newest_first().to_query(),
            "document.first_publication_date desc"
        );
        let asc = Ordering {
            field: "document.title".to_string(),
            direction: Direction::Asc,
        };
        assert_eq!(asc.to_query(), "document.title");
    }

    #[test]
    fn test_client_rejects_missing_endpoint() {
        let config = SiteConfig::default();
        assert!(ContentClient::new(&config).is_err());
    }

    #[test]
    fn test_parse_paged_response() {
        let json = r#"{
            "results": [
                {
                    "uid": "first-post",
                    "first_publication_date": "2021-03-15T19:25:28Z",
                    "data": { "title": "First post" }
                }
            ],
            "next_page": "https://repo.example.com/documents?page=2"
        }"#;
        let page: PagedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid.as_deref(), Some("first-post"));
        assert!(page.next_cursor().is_some());
    }

    #[test]
    fn test_terminal_page_has_no_cursor() {
        let json = r#"{ "results": [], "next_page": null }"#;
        let page: PagedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_cursor(), None);
    }
}
