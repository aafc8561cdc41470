//! Rule-based priority scoring over declared applicant attributes.
//!
//! Four independent 0-10 sub-scores (income, land, previous grants, crop
//! narrative) averaged into a priority score. Deterministic: identical
//! input always produces identical output.

mod config;
mod rules;

pub use config::ScoringConfig;

use serde::{Deserialize, Serialize};

use super::domain::FarmerSnapshot;
use super::repository::ApplicationRecord;
use crate::workflows::grants::applications::domain::ApplicationId;

/// The subset of declared attributes the rubric consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantFacts {
    pub monthly_income_rs: u32,
    pub land_size_bigha: f64,
    pub previous_grants: u32,
    pub crop_details: String,
}

impl From<&FarmerSnapshot> for ApplicantFacts {
    fn from(snapshot: &FarmerSnapshot) -> Self {
        Self {
            monthly_income_rs: snapshot.monthly_income_rs,
            land_size_bigha: snapshot.land_size_bigha(),
            previous_grants: snapshot.previous_grants,
            crop_details: snapshot.crop_details.clone(),
        }
    }
}

/// Per-factor sub-scores, each on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub income_score: u8,
    pub land_score: u8,
    pub grants_score: u8,
    pub crop_score: u8,
}

/// Recommendation buckets derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    ConsiderForApproval,
    NotRecommended,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::ConsiderForApproval => "Consider for Approval",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

/// Full scoring output for one applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub priority_score: f64,
    pub approval_probability: f64,
    pub confidence: f64,
    pub recommendation: Recommendation,
    pub breakdown: FactorBreakdown,
    pub reasoning: Vec<String>,
}

/// A scored application ready for admin review, produced by `rank`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedApplication {
    pub application_id: ApplicationId,
    pub farmer_name: String,
    pub score: PriorityScore,
}

/// Stateless scorer applying the configured rubric.
#[derive(Debug, Clone, Default)]
pub struct PriorityScorer {
    config: ScoringConfig,
}

impl PriorityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, facts: &ApplicantFacts) -> PriorityScore {
        let (breakdown, reasoning) = rules::score_facts(facts, &self.config);

        let total = u32::from(breakdown.income_score)
            + u32::from(breakdown.land_score)
            + u32::from(breakdown.grants_score)
            + u32::from(breakdown.crop_score);
        let priority_score = f64::from(total) / 4.0;
        let approval_probability =
            (priority_score / 10.0).min(self.config.max_approval_probability);

        let recommendation = if priority_score >= 8.0 {
            Recommendation::HighlyRecommended
        } else if priority_score >= 6.0 {
            Recommendation::Recommended
        } else if priority_score >= 4.0 {
            Recommendation::ConsiderForApproval
        } else {
            Recommendation::NotRecommended
        };

        PriorityScore {
            priority_score,
            approval_probability,
            confidence: self.config.confidence,
            recommendation,
            breakdown,
            reasoning,
        }
    }

    /// Score a review set and order it highest-need first. The sort is
    /// stable, so equal scores keep their input order.
    pub fn rank(&self, records: &[ApplicationRecord]) -> Vec<RankedApplication> {
        let mut ranked: Vec<RankedApplication> = records
            .iter()
            .map(|record| RankedApplication {
                application_id: record.id,
                farmer_name: record.snapshot.full_name.clone(),
                score: self.score(&ApplicantFacts::from(&record.snapshot)),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .priority_score
                .partial_cmp(&a.score.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
