//! HTTP client for the remote analysis service.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;

use crate::domain::{AnalysisReport, AnalysisRequest};
use crate::error::{CodeDarpanError, Result};

/// Default base URL of the analysis service.
pub const DEFAULT_ANALYZER_URL: &str = "http://localhost:8000";

/// Boxed future returned by [`Analyzer::analyze`].
pub type AnalyzeFuture<'a> = Pin<Box<dyn Future<Output = Result<AnalysisReport>> + Send + 'a>>;

/// Source of analysis reports for a repository URL.
pub trait Analyzer {
    /// Analyze the repository at `url`.
    fn analyze<'a>(&'a self, url: &'a str) -> AnalyzeFuture<'a>;
}

/// Reqwest-backed analysis client.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    /// Build a client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .user_agent("codedarpan")
            .build()
            .map_err(|err| CodeDarpanError::Other(format!("http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: format!("{base_url}/analyze"),
        })
    }

    /// Full URL of the analyze endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_analysis(&self, url: &str) -> reqwest::Result<AnalysisReport> {
        let payload = AnalysisRequest {
            url: url.to_string(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        response.json::<AnalysisReport>().await
    }
}

impl Analyzer for HttpAnalysisClient {
    fn analyze<'a>(&'a self, url: &'a str) -> AnalyzeFuture<'a> {
        Box::pin(async move {
            self.post_analysis(url).await.map_err(|err| {
                log::debug!("analysis of {url} failed: {err}");
                CodeDarpanError::Analysis
            })
        })
    }
}

/// Trim whitespace and trailing slashes from a service base URL.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(CodeDarpanError::Other(
            "analysis service url is required".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn report_body() -> serde_json::Value {
        json!({
            "score": 72,
            "persona": "Pragmatic Builder",
            "summary": "A tidy Go service.",
            "details": {
                "stars": 10,
                "forks": 2,
                "primary_language": "Go",
                "language_breakdown": {"Go": 50000, "Shell": 2000}
            },
            "roadmap": ["Add tests"]
        })
    }

    #[test]
    fn normalize_base_url_trims_slashes() {
        assert_eq!(
            normalize_base_url(" http://host:8000/ ").expect("url"),
            "http://host:8000"
        );
        assert!(normalize_base_url("   ").is_err());
    }

    #[test]
    fn endpoint_appends_analyze_path() {
        let client = HttpAnalysisClient::new("http://localhost:8000//").expect("client");
        assert_eq!(client.endpoint(), "http://localhost:8000/analyze");
    }

    #[tokio::test]
    async fn analyze_posts_url_and_parses_report() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/analyze")
                    .json_body(json!({"url": "github.com/acme/widgets"}));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(report_body());
            })
            .await;

        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");
        let report = client
            .analyze("github.com/acme/widgets")
            .await
            .expect("report");

        mock.assert_async().await;
        assert_eq!(report.score, 72);
        assert_eq!(report.persona, "Pragmatic Builder");
        assert_eq!(report.details.language_breakdown.get("Go"), Some(&50000));
    }

    #[tokio::test]
    async fn analyze_maps_error_status_to_analysis_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(500)
                    .header("content-type", "application/json")
                    .body(r#"{"detail":"boom"}"#);
            })
            .await;

        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");
        let err = client.analyze("github.com/acme/widgets").await.unwrap_err();
        assert!(matches!(err, CodeDarpanError::Analysis));
        assert_eq!(err.to_string(), "Failed to analyze repository");
    }

    #[tokio::test]
    async fn analyze_maps_malformed_body_to_analysis_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"score":"high"}"#);
            })
            .await;

        let client = HttpAnalysisClient::new(&server.base_url()).expect("client");
        let err = client.analyze("github.com/acme/widgets").await.unwrap_err();
        assert!(matches!(err, CodeDarpanError::Analysis));
    }

    #[tokio::test]
    async fn analyze_maps_connection_failure_to_analysis_error() {
        let client = HttpAnalysisClient::new("http://127.0.0.1:1").expect("client");
        let err = client.analyze("github.com/acme/widgets").await.unwrap_err();
        assert!(matches!(err, CodeDarpanError::Analysis));
    }
}
