use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    ApplicationEdit, ApplicationId, ApplicationStatus, ApplicationSubmission,
};
use super::intake::{validate_snapshot, ValidationError};
use super::lifecycle::{
    check_transition, BulkItemOutcome, PreconditionError, ReviewTarget, TransitionCheck,
};
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use super::scoring::{PriorityScorer, RankedApplication, ScoringConfig};
use crate::workflows::grants::catalog::{CatalogError, GrantCatalog};
use crate::workflows::grants::domain::{
    FarmerId, FarmerProfile, Grant, GrantBenefit, GrantId, TargetArea,
};
use crate::workflows::grants::eligibility;
use crate::workflows::grants::risk::{RiskReport, RiskScorer, RiskSubject};

/// Admin writes retry on a stale version: between administrators the policy
/// is last-write-wins. Farmer edits never retry; a transition that lands
/// underneath an edit rejects the edit.
const ADMIN_WRITE_ATTEMPTS: u32 = 3;

/// Service composing the catalog, repository, scorer, and risk gateway.
pub struct GrantApplicationService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
    risk: Arc<dyn RiskScorer>,
    scorer: PriorityScorer,
}

/// Payload for publishing a new grant.
#[derive(Debug, Clone)]
pub struct NewGrant {
    pub title: String,
    pub description: String,
    pub benefit: GrantBenefit,
    pub target_areas: Vec<TargetArea>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl NewGrant {
    fn validate(&self) -> Result<(), ApplicationServiceError> {
        if self.title.trim().is_empty() {
            return Err(ApplicationServiceError::InvalidGrant("title is required"));
        }
        if self.target_areas.is_empty() {
            return Err(ApplicationServiceError::InvalidGrant(
                "at least one target ward and municipality is required",
            ));
        }
        match &self.benefit {
            GrantBenefit::Money { amount_rs: 0 } => Err(ApplicationServiceError::InvalidGrant(
                "money grants need a non-zero amount",
            )),
            GrantBenefit::Object { name } if name.trim().is_empty() => Err(
                ApplicationServiceError::InvalidGrant("object grants need an object name"),
            ),
            _ => Ok(()),
        }
    }
}

/// Result of the idempotent mark-viewed command.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkViewedOutcome {
    /// The application was Pending and is now Processing.
    Transitioned(ApplicationRecord),
    /// The application was already Processing or terminal; nothing changed.
    Unchanged(ApplicationRecord),
}

impl MarkViewedOutcome {
    pub fn record(&self) -> &ApplicationRecord {
        match self {
            MarkViewedOutcome::Transitioned(record) | MarkViewedOutcome::Unchanged(record) => {
                record
            }
        }
    }
}

impl<R, C> GrantApplicationService<R, C>
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
{
    pub fn new(
        repository: Arc<R>,
        catalog: Arc<C>,
        risk: Arc<dyn RiskScorer>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            repository,
            catalog,
            risk,
            scorer: PriorityScorer::new(scoring),
        }
    }

    // --- grant administration ---

    pub fn create_grant(&self, new_grant: NewGrant) -> Result<Grant, ApplicationServiceError> {
        new_grant.validate()?;

        let grants = self.catalog.all()?;
        let next_id = GrantId(grants.iter().map(|g| g.id.0).max().unwrap_or(0) + 1);

        let grant = Grant {
            id: next_id,
            title: new_grant.title,
            description: new_grant.description,
            benefit: new_grant.benefit,
            target_areas: new_grant.target_areas,
            deadline: new_grant.deadline,
            active: true,
            created_by: new_grant.created_by,
            created_at: Utc::now(),
            updated_at: None,
        };

        let stored = self.catalog.insert(grant)?;
        info!(grant_id = stored.id.0, title = %stored.title, "grant published");
        Ok(stored)
    }

    pub fn set_grant_active(
        &self,
        id: GrantId,
        active: bool,
    ) -> Result<Grant, ApplicationServiceError> {
        let mut grant = self
            .catalog
            .fetch(id)?
            .ok_or(ApplicationServiceError::GrantNotFound(id))?;
        grant.active = active;
        grant.updated_at = Some(Utc::now());
        self.catalog.update(grant.clone())?;
        Ok(grant)
    }

    /// Delete a grant. Refused once any application references it; the
    /// record is deactivated instead by callers that want it gone.
    pub fn delete_grant(&self, id: GrantId) -> Result<(), ApplicationServiceError> {
        if self.catalog.fetch(id)?.is_none() {
            return Err(ApplicationServiceError::GrantNotFound(id));
        }
        if self.repository.any_for_grant(id)? {
            return Err(ApplicationServiceError::Catalog(CatalogError::Referenced));
        }
        self.catalog.remove(id)?;
        Ok(())
    }

    // --- eligibility and submission ---

    /// Grants the farmer may apply to right now.
    pub fn eligible_grants(
        &self,
        farmer: &FarmerProfile,
    ) -> Result<Vec<Grant>, ApplicationServiceError> {
        let grants = self.catalog.all()?;
        let now = Utc::now();
        Ok(eligibility::eligible_grants(farmer, &grants, now)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Submit a new application, returning the stored Pending record.
    pub fn submit(
        &self,
        farmer: &FarmerProfile,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        validate_snapshot(&submission.snapshot)?;

        let grant = self
            .catalog
            .fetch(submission.grant_id)?
            .ok_or(ApplicationServiceError::GrantNotFound(submission.grant_id))?;

        if !eligibility::is_eligible(farmer, &grant, Utc::now()) {
            return Err(ApplicationServiceError::NotEligible { grant_id: grant.id });
        }

        if self
            .repository
            .by_farmer_and_grant(&farmer.id, grant.id)?
            .is_some()
        {
            return Err(ApplicationServiceError::AlreadyApplied { grant_id: grant.id });
        }

        let record = ApplicationRecord {
            id: self.repository.next_id()?,
            grant_id: grant.id,
            farmer_id: farmer.id.clone(),
            snapshot: submission.snapshot,
            status: ApplicationStatus::Pending,
            admin_remarks: None,
            submitted_at: Utc::now(),
            updated_at: None,
            updated_by: None,
            version: 0,
        };

        let stored = self.repository.insert(record)?;
        info!(
            application_id = stored.id.0,
            grant_id = stored.grant_id.0,
            "application submitted"
        );
        Ok(stored)
    }

    // --- reads ---

    pub fn application(
        &self,
        id: ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ApplicationServiceError::ApplicationNotFound(id))
    }

    pub fn applications_for_grant(
        &self,
        grant_id: GrantId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.by_grant(grant_id, status)?)
    }

    // --- lifecycle ---

    /// Record that an administrator opened the application. The first view
    /// of a Pending application moves it to Processing; any further call is
    /// a no-op.
    pub fn mark_viewed(
        &self,
        id: ApplicationId,
        admin: &str,
    ) -> Result<MarkViewedOutcome, ApplicationServiceError> {
        for _ in 0..ADMIN_WRITE_ATTEMPTS {
            let record = self.application(id)?;
            if record.status != ApplicationStatus::Pending {
                return Ok(MarkViewedOutcome::Unchanged(record));
            }

            let mut updated = record;
            updated.status = ApplicationStatus::Processing;
            updated.updated_at = Some(Utc::now());
            updated.updated_by = Some(admin.to_string());

            match self.repository.update(updated) {
                Ok(stored) => return Ok(MarkViewedOutcome::Transitioned(stored)),
                Err(RepositoryError::StaleVersion) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(RepositoryError::StaleVersion.into())
    }

    /// Apply an admin decision to a single application.
    pub fn update_status(
        &self,
        id: ApplicationId,
        target: ReviewTarget,
        remarks: Option<String>,
        admin: &str,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        for _ in 0..ADMIN_WRITE_ATTEMPTS {
            let record = self.application(id)?;
            match check_transition(record.status, target) {
                TransitionCheck::Terminal => {
                    return Err(PreconditionError::TerminalStatus {
                        status: record.status.label(),
                    }
                    .into());
                }
                TransitionCheck::NoOp => return Ok(record),
                TransitionCheck::Allowed => {}
            }

            let mut updated = record;
            updated.status = target.status();
            updated.admin_remarks = remarks.clone();
            updated.updated_at = Some(Utc::now());
            updated.updated_by = Some(admin.to_string());

            match self.repository.update(updated) {
                Ok(stored) => {
                    info!(
                        application_id = stored.id.0,
                        status = stored.status.label(),
                        "application status updated"
                    );
                    return Ok(stored);
                }
                Err(RepositoryError::StaleVersion) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(RepositoryError::StaleVersion.into())
    }

    /// Apply one target status to many applications. Best-effort: an
    /// unknown or already-terminal identifier is reported in the result
    /// list and the rest of the batch proceeds.
    pub fn bulk_update_status(
        &self,
        ids: &[ApplicationId],
        target: ReviewTarget,
        remarks: Option<String>,
        admin: &str,
    ) -> Result<Vec<BulkItemOutcome>, ApplicationServiceError> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for &id in ids {
            let outcome = match self.update_status(id, target, remarks.clone(), admin) {
                Ok(_) => BulkItemOutcome::Updated { id },
                Err(ApplicationServiceError::ApplicationNotFound(_)) => {
                    BulkItemOutcome::NotFound { id }
                }
                Err(ApplicationServiceError::Precondition(
                    PreconditionError::TerminalStatus { .. },
                )) => BulkItemOutcome::SkippedTerminal { id },
                Err(err) => return Err(err),
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Farmer-side edit of the mutable snapshot fields. Allowed only while
    /// the application is Pending and owned by the caller. A concurrent
    /// admin transition wins: the edit is rejected with a precondition
    /// failure rather than retried.
    pub fn edit(
        &self,
        id: ApplicationId,
        farmer_id: &FarmerId,
        edit: ApplicationEdit,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.application(id)?;
        if &record.farmer_id != farmer_id {
            return Err(PreconditionError::NotOwner.into());
        }
        if record.status != ApplicationStatus::Pending {
            return Err(PreconditionError::NotEditable {
                status: record.status.label(),
            }
            .into());
        }

        let mut updated = record;
        edit.apply_to(&mut updated.snapshot);
        validate_snapshot(&updated.snapshot)?;
        updated.updated_at = Some(Utc::now());

        match self.repository.update(updated) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::StaleVersion) => Err(PreconditionError::StaleVersion.into()),
            Err(err) => Err(err.into()),
        }
    }

    // --- scoring and risk ---

    /// Rank the open (Pending/Processing) applications for a grant by the
    /// rule-based priority score, highest need first.
    pub fn priority_ranking(
        &self,
        grant_id: GrantId,
    ) -> Result<Vec<RankedApplication>, ApplicationServiceError> {
        let records = self.open_applications(grant_id)?;
        Ok(self.scorer.rank(&records))
    }

    pub fn scorer(&self) -> &PriorityScorer {
        &self.scorer
    }

    /// Ask the external anomaly service about the open applications for a
    /// grant. Never fails the caller on gateway trouble: the report
    /// degrades to `Unavailable` instead.
    pub async fn risk_report(
        &self,
        grant_id: GrantId,
    ) -> Result<RiskReport, ApplicationServiceError> {
        let records = self.open_applications(grant_id)?;
        let subjects: Vec<RiskSubject> = records
            .iter()
            .map(|record| RiskSubject {
                application_id: record.id,
                farmer_id: record.farmer_id.clone(),
                monthly_income_rs: record.snapshot.monthly_income_rs,
                land_size_bigha: record.snapshot.land_size_bigha(),
                previous_grants: record.snapshot.previous_grants,
                ward: record.snapshot.ward,
                municipality: record.snapshot.municipality.clone(),
            })
            .collect();

        match self.risk.assess(&subjects).await {
            Ok(assessments) => Ok(RiskReport::ready(assessments)),
            Err(err) => {
                warn!(grant_id = grant_id.0, error = %err, "anomaly service unavailable");
                Ok(RiskReport::Unavailable {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn open_applications(
        &self,
        grant_id: GrantId,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        let records = self.repository.by_grant(grant_id, None)?;
        Ok(records
            .into_iter()
            .filter(|record| !record.status.is_terminal())
            .collect())
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("grant {} not found", .0 .0)]
    GrantNotFound(GrantId),
    #[error("application {} not found", .0 .0)]
    ApplicationNotFound(ApplicationId),
    #[error("farmer is not eligible for grant {}", grant_id.0)]
    NotEligible { grant_id: GrantId },
    #[error("farmer has already applied for grant {}", grant_id.0)]
    AlreadyApplied { grant_id: GrantId },
    #[error("invalid grant: {0}")]
    InvalidGrant(&'static str),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    /// HTTP status the error maps to at the service boundary.
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ApplicationServiceError::Validation(_)
            | ApplicationServiceError::NotEligible { .. }
            | ApplicationServiceError::InvalidGrant(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationServiceError::Precondition(_)
            | ApplicationServiceError::AlreadyApplied { .. } => StatusCode::CONFLICT,
            ApplicationServiceError::GrantNotFound(_)
            | ApplicationServiceError::ApplicationNotFound(_)
            | ApplicationServiceError::Catalog(CatalogError::NotFound) => StatusCode::NOT_FOUND,
            ApplicationServiceError::Catalog(CatalogError::Referenced)
            | ApplicationServiceError::Repository(RepositoryError::Conflict)
            | ApplicationServiceError::Repository(RepositoryError::StaleVersion) => {
                StatusCode::CONFLICT
            }
            ApplicationServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApplicationServiceError::Catalog(_) | ApplicationServiceError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
