//! Contract for the external anomaly-detection service.
//!
//! The portal consults a remote scorer that flags suspicious applications.
//! Only the request/response shape and the capability trait live here; the
//! model itself runs elsewhere. Scoring is advisory: callers degrade to an
//! "unavailable" result instead of failing when the service cannot be
//! reached.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::applications::domain::ApplicationId;
use super::domain::FarmerId;

/// Attributes the anomaly service evaluates per applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSubject {
    pub application_id: ApplicationId,
    pub farmer_id: FarmerId,
    pub monthly_income_rs: u32,
    pub land_size_bigha: f64,
    pub previous_grants: u32,
    pub ward: u32,
    pub municipality: String,
}

/// Per-applicant verdict returned by the anomaly service. More negative
/// anomaly scores indicate more suspicious applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub application_id: ApplicationId,
    pub anomaly_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
        }
    }
}

/// Count of assessments per risk level, mirroring the remote service's
/// summary payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Flagging view returned to administrators. The gateway is advisory, so
/// an unreachable service yields `Unavailable` rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RiskReport {
    Ready {
        assessments: Vec<RiskAssessment>,
        distribution: RiskDistribution,
        average_anomaly_score: f64,
    },
    Unavailable {
        reason: String,
    },
}

impl RiskReport {
    pub fn ready(assessments: Vec<RiskAssessment>) -> Self {
        let mut distribution = RiskDistribution::default();
        for assessment in &assessments {
            match assessment.risk_level {
                RiskLevel::High => distribution.high += 1,
                RiskLevel::Medium => distribution.medium += 1,
                RiskLevel::Low => distribution.low += 1,
            }
        }
        let average_anomaly_score = if assessments.is_empty() {
            0.0
        } else {
            assessments.iter().map(|a| a.anomaly_score).sum::<f64>() / assessments.len() as f64
        };
        RiskReport::Ready {
            assessments,
            distribution,
            average_anomaly_score,
        }
    }
}

/// Capability interface over the remote scorer so ranking and lifecycle
/// logic can be exercised without the network dependency.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    async fn assess(&self, subjects: &[RiskSubject]) -> Result<Vec<RiskAssessment>, RiskError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("anomaly service unavailable: {0}")]
    Unavailable(String),
    #[error("anomaly service timed out after {0:?}")]
    Timeout(Duration),
    #[error("anomaly service returned status {0}")]
    Status(u16),
}

/// Stand-in scorer for tests and offline deployments; always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRiskScorer;

#[async_trait]
impl RiskScorer for UnavailableRiskScorer {
    async fn assess(&self, _subjects: &[RiskSubject]) -> Result<Vec<RiskAssessment>, RiskError> {
        Err(RiskError::Unavailable(
            "anomaly detection is not configured".to_string(),
        ))
    }
}

/// HTTP client for the deployed anomaly service.
#[derive(Debug, Clone)]
pub struct HttpRiskScorer {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct DetectBatchRequest<'a> {
    applications: &'a [RiskSubject],
}

#[derive(Debug, Deserialize)]
struct DetectBatchResponse {
    results: Vec<RiskAssessment>,
}

impl HttpRiskScorer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RiskScorer for HttpRiskScorer {
    async fn assess(&self, subjects: &[RiskSubject]) -> Result<Vec<RiskAssessment>, RiskError> {
        let url = format!("{}/detect/batch", self.base_url.trim_end_matches('/'));
        let request = DetectBatchRequest {
            applications: subjects,
        };

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RiskError::Timeout(self.timeout)
                } else {
                    RiskError::Unavailable(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RiskError::Status(status.as_u16()));
        }

        let body: DetectBatchResponse = response
            .json()
            .await
            .map_err(|err| RiskError::Unavailable(err.to_string()))?;
        Ok(body.results)
    }
}
