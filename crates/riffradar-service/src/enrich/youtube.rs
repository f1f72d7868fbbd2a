//! YouTube Data API tutorial lookup.
//!
//! Searches for a single video matching the query and maps it to a
//! [`Tutorial`] with a watch URL and the high-resolution thumbnail.

use std::time::Duration;

use backon::Retryable;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use riffradar_core::model::Tutorial;

use crate::enrich::resilience::retry_policy;
use crate::enrich::TutorialProvider;
use crate::error::{EnrichError, EnrichResult};

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";
const SOURCE_NAME: &str = "YouTube";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchResponse {
    fn into_tutorial(self) -> Option<Tutorial> {
        let item = self.items.into_iter().next()?;
        let video_id = item.id.video_id?;
        let thumbnails = item.snippet.thumbnails;
        let thumbnail = thumbnails
            .high
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Some(Tutorial {
            url: format!("{WATCH_URL_BASE}{video_id}"),
            video_id,
            title: item.snippet.title,
            thumbnail,
        })
    }
}

/// Drop the request URL from a transport error; it carries the API key.
fn redact(error: reqwest::Error) -> EnrichError {
    EnrichError::Request(error.without_url())
}

/// YouTube Data API v3 client.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Create a client with the given API key and per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(api_key: String, timeout: Duration) -> EnrichResult<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                "riffradar/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/riffradar/riffradar)"
            ))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: YOUTUBE_SEARCH_URL.to_string(),
        })
    }

    /// Point the client at a different search endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_once(&self, query: &str) -> EnrichResult<Option<Tutorial>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("part", "snippet"),
                ("maxResults", "1"),
                ("q", query),
                ("key", &self.api_key),
                ("type", "video"),
            ])
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichError::RateLimited {
                source_name: SOURCE_NAME.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(EnrichError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: status.to_string(),
            });
        }
        if !status.is_success() {
            return Err(EnrichError::Rejected {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let result: SearchResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.without_url().to_string(),
        })?;

        Ok(result.into_tutorial())
    }
}

#[async_trait::async_trait]
impl TutorialProvider for YouTubeClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> EnrichResult<Option<Tutorial>> {
        let tutorial = (|| self.search_once(query))
            .retry(retry_policy())
            .when(EnrichError::is_transient)
            .notify(|e, delay| {
                log::debug!("Retrying YouTube search for {:?} in {:?}: {}", query, delay, e);
            })
            .await?;

        if tutorial.is_none() {
            log::warn!("No YouTube results found for: {}", query);
        }
        Ok(tutorial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = YouTubeClient::new("test-key".to_string(), Duration::from_secs(5)).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("YouTubeClient"));
        assert_eq!(client.name(), "YouTube");
    }

    #[test]
    fn test_search_response_to_tutorial() {
        let json = r#"{
            "items": [{
                "id": {"kind": "youtube#video", "videoId": "bx1Bh8ZvH84"},
                "snippet": {
                    "title": "Wonderwall Guitar Lesson",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/vi/bx1Bh8ZvH84/default.jpg"},
                        "high": {"url": "https://i.ytimg.com/vi/bx1Bh8ZvH84/hqdefault.jpg"}
                    }
                }
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let tutorial = response.into_tutorial().unwrap();

        assert_eq!(tutorial.video_id, "bx1Bh8ZvH84");
        assert_eq!(tutorial.url, "https://www.youtube.com/watch?v=bx1Bh8ZvH84");
        assert_eq!(tutorial.title, "Wonderwall Guitar Lesson");
        assert_eq!(
            tutorial.thumbnail,
            "https://i.ytimg.com/vi/bx1Bh8ZvH84/hqdefault.jpg"
        );
    }

    #[test]
    fn test_thumbnail_falls_back_to_default() {
        let json = r#"{
            "items": [{
                "id": {"videoId": "abc"},
                "snippet": {
                    "title": "t",
                    "thumbnails": {"default": {"url": "https://img/default.jpg"}}
                }
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_tutorial().unwrap().thumbnail,
            "https://img/default.jpg"
        );
    }

    #[test]
    fn test_empty_items() {
        let response: SearchResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(response.into_tutorial().is_none());

        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_tutorial().is_none());
    }

    #[test]
    fn test_item_without_video_id() {
        let json = r#"{
            "items": [{
                "id": {"kind": "youtube#channel", "channelId": "UC123"},
                "snippet": {"title": "A channel"}
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_tutorial().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = YouTubeClient::new("k".to_string(), Duration::from_millis(200))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/search");
        assert!(client.search("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let client = YouTubeClient::new("SECRET-KEY-123".to_string(), Duration::from_millis(200))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/search");

        let err = client.search("Wonderwall guitar tutorial").await.unwrap_err();

        assert!(matches!(err, EnrichError::Request(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{:?}", err).contains("SECRET-KEY-123"));
    }
}
