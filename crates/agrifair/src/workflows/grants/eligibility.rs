//! Pure read-side filter matching farmers against the grant catalog.

use chrono::{DateTime, Utc};

use super::domain::{FarmerProfile, Grant};

/// Return the grants the farmer may apply to at `now`.
///
/// A grant qualifies when it is active, its deadline (if any) is strictly in
/// the future, and at least one target area equals the farmer's
/// (ward, municipality) exactly. No partial or fuzzy matching.
pub fn eligible_grants<'a>(
    farmer: &FarmerProfile,
    grants: &'a [Grant],
    now: DateTime<Utc>,
) -> Vec<&'a Grant> {
    grants
        .iter()
        .filter(|grant| is_eligible(farmer, grant, now))
        .collect()
}

/// Single-grant form of the same conjunction, used as the submission gate.
pub fn is_eligible(farmer: &FarmerProfile, grant: &Grant, now: DateTime<Utc>) -> bool {
    grant.active && !grant.expired(now) && grant.targets(farmer.ward, &farmer.municipality)
}
