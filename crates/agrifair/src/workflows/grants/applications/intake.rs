//! Submission validation ahead of persistence.

use super::domain::FarmerSnapshot;

/// Validation errors raised before an application record is created.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
    #[error("land size must be greater than zero")]
    InvalidLandSize,
    #[error("at least one supporting document is required")]
    MissingDocuments,
}

/// Check the declared snapshot for the fields the portal requires on every
/// submission. Ward/municipality zero-or-empty values are left to the
/// eligibility gate, which will simply match nothing.
pub fn validate_snapshot(snapshot: &FarmerSnapshot) -> Result<(), ValidationError> {
    if snapshot.full_name.trim().is_empty() {
        return Err(ValidationError::MissingField("full_name"));
    }
    if snapshot.phone.trim().is_empty() {
        return Err(ValidationError::MissingField("phone"));
    }
    if snapshot.address.trim().is_empty() {
        return Err(ValidationError::MissingField("address"));
    }
    if snapshot.crop_details.trim().is_empty() {
        return Err(ValidationError::MissingField("crop_details"));
    }
    if snapshot.expected_benefits.trim().is_empty() {
        return Err(ValidationError::MissingField("expected_benefits"));
    }
    if !(snapshot.land_size.is_finite() && snapshot.land_size > 0.0) {
        return Err(ValidationError::InvalidLandSize);
    }
    if snapshot.documents.is_empty() {
        return Err(ValidationError::MissingDocuments);
    }
    Ok(())
}
