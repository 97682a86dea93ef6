use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Serialize;

use crate::{config::Settings, error::SourceError};

pub const BRIGHT_DATA_ENDPOINT: &str = "https://api.brightdata.com/request";

const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const ERROR_BODY_PREVIEW: usize = 300;

/// Downloads the HTML of a page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchMode {
    Direct,
    /// JavaScript-rendered fetch through the Bright Data request API.
    Rendered { api_key: String, zone: String },
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    zone: &'a str,
    url: &'a str,
    format: &'a str,
    render: bool,
}

pub struct HttpFetcher {
    http: Client,
    mode: FetchMode,
}

impl HttpFetcher {
    /// Uses the rendering proxy only when both key and zone are given.
    pub fn new(brightdata_api_key: Option<String>, brightdata_zone: Option<String>) -> Self {
        let mode = match (brightdata_api_key, brightdata_zone) {
            (Some(api_key), Some(zone)) => FetchMode::Rendered { api_key, zone },
            _ => FetchMode::Direct,
        };
        Self {
            http: Client::new(),
            mode,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.brightdata_api_key.clone(),
            settings.brightdata_zone.clone(),
        )
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self.mode, FetchMode::Rendered { .. })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let request = match &self.mode {
            FetchMode::Direct => {
                log::debug!("Fetching {}", url);
                self.http.get(url).header(USER_AGENT, AGENT)
            }
            FetchMode::Rendered { api_key, zone } => {
                log::debug!("Fetching rendered {} via zone {}", url, zone);
                self.http
                    .post(BRIGHT_DATA_ENDPOINT)
                    .bearer_auth(api_key)
                    .json(&RenderRequest {
                        zone,
                        url,
                        format: "raw",
                        render: true,
                    })
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        Ok(body)
    }
}
