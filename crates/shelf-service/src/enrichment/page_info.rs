//! Page metadata via a Microlink-compatible API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use shelf_core::config::PageInfoConfig;
use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;
use shelf_core::traits::{PageInfo, PageInfoFetcher};

/// Fetches a page title and a screenshot (falling back to `og:image`).
#[derive(Debug, Clone)]
pub struct MicrolinkFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MicrolinkResponse {
    status: String,
    #[serde(default)]
    data: MicrolinkData,
}

#[derive(Debug, Default, Deserialize)]
struct MicrolinkData {
    title: Option<String>,
    image: Option<MicrolinkAsset>,
    screenshot: Option<MicrolinkAsset>,
}

#[derive(Debug, Deserialize)]
struct MicrolinkAsset {
    url: String,
}

impl MicrolinkResponse {
    fn into_page_info(self) -> PageInfo {
        if self.status != "success" {
            return PageInfo::default();
        }
        let image_url = self
            .data
            .screenshot
            .or(self.data.image)
            .map(|asset| asset.url);
        PageInfo {
            title: self.data.title.filter(|t| !t.trim().is_empty()),
            image_url,
        }
    }
}

impl MicrolinkFetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: &PageInfoConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PageInfoFetcher for MicrolinkFetcher {
    async fn fetch_page_info(&self, url: &str) -> AppResult<PageInfo> {
        if !url.starts_with("http") {
            return Ok(PageInfo::default());
        }

        let request_url =
            reqwest::Url::parse_with_params(&self.endpoint, &[("url", url), ("screenshot", "true")])
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Configuration, "Invalid page info endpoint", e)
                })?;

        let mut request = self.client.get(request_url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(url, "Page info request timed out");
                return Ok(PageInfo::default());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    "Page info request failed",
                    e,
                ));
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "Page info service returned an error");
            return Ok(PageInfo::default());
        }

        let body: MicrolinkResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed page info response", e)
        })?;

        let info = body.into_page_info();
        debug!(url, found = !info.is_empty(), "Page info fetched");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PageInfo {
        serde_json::from_str::<MicrolinkResponse>(json)
            .unwrap()
            .into_page_info()
    }

    #[test]
    fn test_screenshot_preferred_over_image() {
        let info = parse(
            r#"{"status":"success","data":{"title":"Docs","image":{"url":"https://x/og.png"},"screenshot":{"url":"https://x/shot.png"}}}"#,
        );
        assert_eq!(info.title.as_deref(), Some("Docs"));
        assert_eq!(info.image_url.as_deref(), Some("https://x/shot.png"));
    }

    #[test]
    fn test_og_image_fallback() {
        let info = parse(r#"{"status":"success","data":{"image":{"url":"https://x/og.png"}}}"#);
        assert_eq!(info.image_url.as_deref(), Some("https://x/og.png"));
        assert!(info.title.is_none());
    }

    #[test]
    fn test_failed_status_is_empty() {
        let info = parse(r#"{"status":"fail","data":{"title":"ignored"}}"#);
        assert!(info.is_empty());
    }

    #[tokio::test]
    async fn test_non_http_url_skipped() {
        let fetcher = MicrolinkFetcher::new(&PageInfoConfig::default()).unwrap();
        let info = fetcher.fetch_page_info("ftp://example.org").await.unwrap();
        assert!(info.is_empty());
    }
}
