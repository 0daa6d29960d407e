//! REST client for the dashboard's action endpoints.
//!
//! All endpoints are opaque JSON contracts; this wrapper adds typed
//! errors and response shapes but makes no attempt to model server
//! internals. One [`reqwest::Client`] is shared across calls.

use serde::Deserialize;

use fieldsense_core::forms::ForceAnomalyForm;
use fieldsense_core::series::Reading;
use fieldsense_core::types::{AlertId, Timestamp};

/// HTTP client for the monitoring server's REST API.
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: String,
}

/// Response from `GET /api/alerts_count`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AlertsCount {
    pub active_count: u32,
}

/// Outcome reported by the predictive-analysis endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// One point from the history endpoint (sensor id is implied by the path).
#[derive(Debug, Clone, Deserialize)]
struct HistoryPoint {
    timestamp: Timestamp,
    value: f64,
    #[serde(default)]
    unit: String,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },
}

impl DashboardApi {
    /// Create an API client for the server, e.g. `http://host:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Resolve an active alert. `POST /alerts/resolve/{id}`.
    pub async fn resolve_alert(&self, id: AlertId) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/alerts/resolve/{id}", self.base_url))
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Load recent history for one sensor.
    /// `GET /api/sensor_data/{sensor}?hours=N`.
    pub async fn sensor_history(
        &self,
        sensor_id: &str,
        hours: u32,
    ) -> Result<Vec<Reading>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/sensor_data/{sensor_id}", self.base_url))
            .query(&[("hours", hours)])
            .send()
            .await?;

        let points: Vec<HistoryPoint> = Self::parse_response(response).await?;
        Ok(points
            .into_iter()
            .map(|p| Reading {
                sensor_id: sensor_id.to_string(),
                timestamp: p.timestamp,
                value: p.value,
                unit: p.unit,
            })
            .collect())
    }

    /// Number of currently active alerts. `GET /api/alerts_count`.
    pub async fn alerts_count(&self) -> Result<AlertsCount, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/alerts_count", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Push a throwaway test reading to verify the ingest endpoint is
    /// up. `POST /api/sensor_data`.
    pub async fn post_test_reading(&self, value: f64, now: Timestamp) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "sensor_type": "test",
            "test_value": value,
            "timestamp": now.to_rfc3339(),
        });

        let response = self
            .client
            .post(format!("{}/api/sensor_data", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Inject a test anomaly. `POST /api/force_anomaly`.
    pub async fn force_anomaly(&self, form: &ForceAnomalyForm) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/api/force_anomaly", self.base_url))
            .json(form)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Kick off the scheduled predictive-maintenance analysis.
    /// `POST /api/run_predictive_analysis`.
    pub async fn run_predictive_analysis(&self) -> Result<AnalysisOutcome, ApiError> {
        self.post_analysis("run_predictive_analysis").await
    }

    /// Force an immediate analysis pass, bypassing the schedule.
    /// `POST /api/force_predictive_analysis`.
    pub async fn force_predictive_analysis(&self) -> Result<AnalysisOutcome, ApiError> {
        self.post_analysis("force_predictive_analysis").await
    }

    async fn post_analysis(&self, endpoint: &str) -> Result<AnalysisOutcome, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/{endpoint}", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on a success status, or an
    /// [`ApiError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert a success status, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_points_parse_without_unit() {
        let points: Vec<HistoryPoint> = serde_json::from_str(
            r#"[
                {"timestamp": "2026-08-28T10:00:00Z", "value": 7.1, "unit": "pH"},
                {"timestamp": "2026-08-28T10:01:00Z", "value": 7.2}
            ]"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].unit, "pH");
        assert_eq!(points[1].unit, "");
    }

    #[test]
    fn analysis_outcome_tolerates_sparse_bodies() {
        let outcome: AnalysisOutcome = serde_json::from_str("{}").unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.is_none());

        let outcome: AnalysisOutcome =
            serde_json::from_str(r#"{"success": true, "message": "3 prédictions"}"#).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("3 prédictions"));
    }
}
