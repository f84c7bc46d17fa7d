use std::time::Duration;

use accel_core::{PageResult, Record, ResponseHeaders};
use accel_logging::accel_debug;
use url::Url;

use crate::{FailureKind, FetchError};

/// Path of the paginated acceleration history endpoint.
pub const HISTORY_PATH: &str = "/api/v1/services/accelerator/history";

#[derive(Debug, Clone)]
pub struct HistorySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            base_url: "https://mempool.space".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One-shot paged fetch of historical records.
#[async_trait::async_trait]
pub trait HistoryClient: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<PageResult, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHistoryClient {
    settings: HistorySettings,
    client: reqwest::Client,
}

impl ReqwestHistoryClient {
    pub fn new(settings: HistorySettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{HISTORY_PATH}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl HistoryClient for ReqwestHistoryClient {
    async fn fetch_page(&self, page: u32) -> Result<PageResult, FetchError> {
        let url = self.page_url(page)?;
        accel_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: Vec<Record> = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        Ok(PageResult::Envelope { body, headers })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
