//! Application intake, lifecycle, and scoring for published grants.

pub mod domain;
pub mod intake;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationEdit, ApplicationId, ApplicationStatus, ApplicationSubmission, DocumentCategory,
    DocumentDescriptor, FarmerSnapshot,
};
pub use intake::ValidationError;
pub use lifecycle::{BulkItemOutcome, PreconditionError, ReviewTarget};
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusView, RepositoryError,
};
pub use router::{application_router, ApplicationApi};
pub use scoring::{
    ApplicantFacts, FactorBreakdown, PriorityScore, PriorityScorer, RankedApplication,
    Recommendation, ScoringConfig,
};
pub use service::{
    ApplicationServiceError, GrantApplicationService, MarkViewedOutcome, NewGrant,
};
