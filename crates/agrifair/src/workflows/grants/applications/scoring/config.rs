use serde::{Deserialize, Serialize};

/// Bracket boundaries and disclosure constants for the rule-based scorer.
///
/// The defaults reproduce the portal's published rubric. `confidence` is a
/// fixed disclosure value: the scorer is deterministic, not a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Upper bounds (exclusive) of the three lowest monthly-income brackets,
    /// in rupees. Incomes at or above the last bound score lowest.
    pub income_brackets_rs: [u32; 3],
    /// Upper bounds (exclusive) of the three smallest land brackets, in
    /// bigha equivalent.
    pub land_brackets_bigha: [f64; 3],
    /// Staple crop keywords looked for in the free-text crop narrative.
    pub staple_crops: [String; 2],
    pub confidence: f64,
    pub max_approval_probability: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            income_brackets_rs: [10_000, 20_000, 30_000],
            land_brackets_bigha: [2.0, 4.0, 6.0],
            staple_crops: ["धान".to_string(), "मकै".to_string()],
            confidence: 0.85,
            max_approval_probability: 0.95,
        }
    }
}
