use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GrantId(pub u32);

/// Stable identifier for a registered farmer.
///
/// All farmer/application relationships are keyed by this identifier, never
/// by display name: two farmers may share one name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmerId(pub String);

/// A (ward, municipality) pair defining where a grant is offered.
///
/// Matching is exact: integer equality on the ward number and string
/// equality on the municipality name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArea {
    pub ward: u32,
    pub municipality: String,
}

impl TargetArea {
    pub fn matches(&self, ward: u32, municipality: &str) -> bool {
        self.ward == ward && self.municipality == municipality
    }
}

/// What a grant delivers. The enum shape guarantees that a money grant
/// always carries an amount and an object grant always carries a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrantBenefit {
    Money { amount_rs: u64 },
    Object { name: String },
}

impl GrantBenefit {
    pub const fn kind_label(&self) -> &'static str {
        match self {
            GrantBenefit::Money { .. } => "money",
            GrantBenefit::Object { .. } => "object",
        }
    }
}

/// A published subsidy offer restricted to farmers in specific target areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,
    pub title: String,
    pub description: String,
    pub benefit: GrantBenefit,
    pub target_areas: Vec<TargetArea>,
    pub deadline: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Grant {
    /// A grant with no target areas is never offered to anyone.
    pub fn targets(&self, ward: u32, municipality: &str) -> bool {
        self.target_areas
            .iter()
            .any(|area| area.matches(ward, municipality))
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

/// Land measurement units accepted on profiles and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandUnit {
    Bigha,
    Kattha,
    Hectare,
}

impl LandUnit {
    /// Normalize a measurement to bigha, the unit the scorer brackets on.
    /// 20 kattha make a bigha; a hectare is roughly 1.48 bigha.
    pub fn to_bigha(self, size: f64) -> f64 {
        match self {
            LandUnit::Bigha => size,
            LandUnit::Kattha => size / 20.0,
            LandUnit::Hectare => size * 1.4765,
        }
    }
}

/// Read-only farmer attributes supplied by the identity subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub id: FarmerId,
    pub full_name: String,
    pub ward: u32,
    pub municipality: String,
    pub monthly_income_rs: u32,
    pub land_size: f64,
    pub land_unit: LandUnit,
    pub previous_grants: u32,
    pub crop_details: String,
}
