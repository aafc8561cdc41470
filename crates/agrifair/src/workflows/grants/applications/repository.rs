use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, ApplicationStatus, FarmerSnapshot};
use crate::workflows::grants::domain::{FarmerId, GrantId};

/// A stored application: one farmer's request against one grant, plus the
/// review metadata stamped by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub grant_id: GrantId,
    pub farmer_id: FarmerId,
    pub snapshot: FarmerSnapshot,
    pub status: ApplicationStatus,
    pub admin_remarks: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    /// Optimistic-concurrency token, bumped by the repository on every
    /// successful update. A write carrying a stale version is rejected.
    pub version: u32,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id,
            grant_id: self.grant_id,
            farmer_name: self.snapshot.full_name.clone(),
            status: self.status.label(),
            admin_remarks: self.admin_remarks.clone(),
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub grant_id: GrantId,
    pub farmer_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_remarks: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `update` must compare the record's `version` against the stored one:
/// a mismatch is a `Conflict`, and a successful write stores the record
/// with the version incremented.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Applications for one grant, newest submission first, optionally
    /// filtered by status.
    fn by_grant(
        &self,
        grant_id: GrantId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn by_farmer_and_grant(
        &self,
        farmer_id: &FarmerId,
        grant_id: GrantId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn any_for_grant(&self, grant_id: GrantId) -> Result<bool, RepositoryError>;
    fn next_id(&self) -> Result<ApplicationId, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record version is stale")]
    StaleVersion,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
