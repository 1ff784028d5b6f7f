//! reqwest-backed implementation of [`RecommendationSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use rec_model::ResultPage;
use rec_model::wire::{decode_user_ids, ErrorPayload, RecommendationPayload};

use crate::{FetchRequest, RecommendationFetchError, RecommendationSource};

const RECOMMENDATIONS_PATH: &str = "/api/recommendations";
const USERS_PATH: &str = "/api/users";

/// HTTP client for the recommendation backend.
///
/// One request per call, no retries. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpRecommendationClient {
    /// Create a client for the service at `base_url` (e.g. "http://127.0.0.1:5000").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// `None` means requests wait for as long as the transport allows.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RecommendationFetchError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body of a response, turning a non-success status into a
    /// `Service` error carrying the payload's `error` field.
    async fn read_body(response: reqwest::Response) -> Result<String, RecommendationFetchError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .ok()
                .and_then(|payload| payload.error);
            let err = RecommendationFetchError::service(status.as_u16(), message);
            warn!(status = status.as_u16(), error = %err, "Recommendation service returned an error");
            return Err(err);
        }

        Ok(body)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[async_trait]
impl RecommendationSource for HttpRecommendationClient {
    #[instrument(skip(self, request), fields(user_id = %request.user_id, algorithm = %request.algorithm, page = request.page))]
    async fn fetch_page(&self, request: &FetchRequest) -> Result<ResultPage, RecommendationFetchError> {
        let url = self.endpoint(RECOMMENDATIONS_PATH);
        debug!(url = %url, search = ?request.search, "Requesting recommendations");

        let response = self
            .http_client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Recommendation request failed");
                RecommendationFetchError::from(e)
            })?;

        let body = Self::read_body(response).await?;
        let payload: RecommendationPayload = serde_json::from_str(&body)
            .map_err(|e| RecommendationFetchError::InvalidResponse(e.to_string()))?;
        let page = payload.into_page(request.page);

        debug!(
            items = page.items.len(),
            page = page.page,
            total_pages = page.total_pages,
            total_results = page.total_results,
            "Received recommendations"
        );
        Ok(page)
    }

    async fn list_users(&self) -> Result<Vec<String>, RecommendationFetchError> {
        let url = self.endpoint(USERS_PATH);
        debug!(url = %url, "Requesting user list");

        let response = self.http_client.get(&url).send().await?;
        let body = Self::read_body(response).await?;
        let values: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| RecommendationFetchError::InvalidResponse(e.to_string()))?;

        Ok(decode_user_ids(values))
    }
}
