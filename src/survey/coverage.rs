//! Coverage lookup: which surveys have imagery inside the current view.

use super::model::{CoverageResponse, Survey};
use crate::core::bounds::Bounds;
use crate::core::config::ApiConfig;
use crate::core::constants::USER_AGENT;
use crate::core::url::{coverage_url, redact_key};
use crate::{Result, SurveyError};
use async_trait::async_trait;
use std::time::Duration;

/// Surveys in `response` that carry a tile resource of `layer_type`, in
/// response order. A missing response or `surveys` field yields nothing.
pub fn available_surveys(response: Option<&CoverageResponse>, layer_type: &str) -> Vec<Survey> {
    response
        .and_then(|r| r.surveys.as_ref())
        .map(|surveys| {
            surveys
                .iter()
                .filter(|survey| survey.has_tile_type(layer_type))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Anything that can answer "which surveys cover these bounds"
#[async_trait]
pub trait CoverageSource: Send + Sync {
    async fn fetch_coverage(&self, bounds: &Bounds) -> Result<CoverageResponse>;
}

/// Coverage source backed by the provider's HTTP coverage endpoint
#[derive(Debug, Clone)]
pub struct HttpCoverageSource {
    client: reqwest::Client,
    api: ApiConfig,
}

impl HttpCoverageSource {
    pub fn new(api: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, api))
    }

    /// Reuses an existing client
    pub fn with_client(client: reqwest::Client, api: ApiConfig) -> Self {
        Self { client, api }
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

#[async_trait]
impl CoverageSource for HttpCoverageSource {
    async fn fetch_coverage(&self, bounds: &Bounds) -> Result<CoverageResponse> {
        let url = coverage_url(&self.api, bounds);
        log::debug!("coverage request {}", redact_key(&url, &self.api));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SurveyError::CoverageStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let coverage: CoverageResponse = serde_json::from_slice(&body)?;
        log::info!(
            "coverage returned {} surveys",
            coverage.surveys.as_ref().map_or(0, Vec::len)
        );
        Ok(coverage)
    }
}
