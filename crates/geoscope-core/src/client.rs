//! Client for the remote analysis service.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    config::{ApiConfig, ConnectionMode, API_PATH},
    error::{GeoscopeError, Result},
    models::{
        AnalysisRequest, AnalysisResult, CompareRequest, ComparisonResult, HealthResponse,
        HistoryResponse,
    },
    params::ListHistory,
};

/// Operations offered by the analysis service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Whether a backend is configured at all.
    fn is_available(&self) -> bool;

    /// Runs a full analysis. This is the long-running call.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;

    /// Compares several domains in one analysis.
    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResult>;

    /// Lists past analyses stored by the service.
    async fn history(&self, params: &ListHistory) -> Result<HistoryResponse>;

    /// Checks service health.
    async fn health(&self) -> Result<HealthResponse>;
}

/// Error body the service sends with non-success statuses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// HTTP implementation of [`AnalysisService`].
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    config: ApiConfig,
}

impl HttpAnalysisClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn base_url(&self) -> Result<&Url> {
        self.config.base_url.as_ref().ok_or_else(|| {
            GeoscopeError::backend_unavailable(format!(
                "{}. Set GEOSCOPE_API_URL or pass --api-url to reach a service",
                ConnectionMode::Demo.message()
            ))
        })
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        let base = self.base_url()?;
        Ok(format!("{}/{}", base.as_str().trim_end_matches('/'), path))
    }

    /// `GET /health` is served at the server root, outside the API prefix.
    fn health_endpoint(&self) -> Result<String> {
        let base = self.base_url()?.as_str().trim_end_matches('/');
        let root = base.strip_suffix(API_PATH).unwrap_or(base);
        Ok(format!("{root}/health"))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoscopeError::Remote {
                status: status.as_u16(),
                detail: error_detail(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    fn is_available(&self) -> bool {
        self.config.is_backend_available()
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let url = self.endpoint("analyze")?;
        info!(
            "Requesting analysis of '{}' for {} on {} platform(s)",
            request.query,
            request.brand_domain,
            request.platforms.len()
        );
        let response = self.client.post(&url).json(request).send().await?;
        let result: AnalysisResult = Self::decode(response).await?;
        debug!(
            "Analysis {} returned {} trace entries",
            result.id,
            result.reasoning_trace.len()
        );
        Ok(result)
    }

    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResult> {
        let url = self.endpoint("compare")?;
        info!("Requesting comparison of {} domains", request.domains.len());
        let response = self.client.post(&url).json(request).send().await?;
        let mut result: ComparisonResult = Self::decode(response).await?;
        result.rank();
        Ok(result)
    }

    async fn history(&self, params: &ListHistory) -> Result<HistoryResponse> {
        let url = self.endpoint("history")?;
        let response = self
            .client
            .get(&url)
            .query(&[("limit", params.effective_limit())])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        let url = self.health_endpoint()?;
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }
}

/// Extracts the `detail` field from a JSON error body.
///
/// Structured (non-string) details are rendered as compact JSON.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let detail = match parsed.detail {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => return None,
        other => other.to_string(),
    };
    Some(detail).filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_client() -> HttpAnalysisClient {
        HttpAnalysisClient::new(ApiConfig::resolve(None, "http://localhost:8000").unwrap())
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail": "Analysis failed: quota exceeded"}"#).as_deref(),
            Some("Analysis failed: quota exceeded")
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["body", "query"], "msg": "field required"}]}"#)
                .as_deref(),
            Some(r#"[{"loc":["body","query"],"msg":"field required"}]"#)
        );
        assert_eq!(error_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(error_detail(r#"{"detail": null}"#), None);
    }

    #[test]
    fn test_endpoints() {
        let client = local_client();
        assert_eq!(client.endpoint("analyze").unwrap(), "http://localhost:8000/api/analyze");
        assert_eq!(client.health_endpoint().unwrap(), "http://localhost:8000/health");
    }

    #[test]
    fn test_override_without_api_suffix() {
        let client = HttpAnalysisClient::new(
            ApiConfig::resolve(Some("https://geo.example.com/"), "http://localhost").unwrap(),
        );
        assert_eq!(client.endpoint("history").unwrap(), "https://geo.example.com/history");
        assert_eq!(client.health_endpoint().unwrap(), "https://geo.example.com/health");
    }

    #[tokio::test]
    async fn test_demo_mode_refuses_without_network() {
        let client = HttpAnalysisClient::new(ApiConfig::demo());
        assert!(!client.is_available());

        let err = client.history(&ListHistory::default()).await.unwrap_err();
        assert!(matches!(err, GeoscopeError::BackendUnavailable { .. }));
        assert!(err.user_message().contains("Demo mode"));

        let err = client.health().await.unwrap_err();
        assert!(matches!(err, GeoscopeError::BackendUnavailable { .. }));
    }
}
