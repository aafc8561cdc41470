//! Transition rules for the application status state machine.
//!
//! Pending → Processing happens when an administrator first opens an
//! application (an explicit, idempotent `mark viewed` command, not a side
//! effect of a query). Pending or Processing may move to Approved or
//! Rejected; nothing leaves a terminal state through this component.

use serde::Serialize;

use super::domain::{ApplicationId, ApplicationStatus};

/// Statuses an administrator may move an application to. Pending is the
/// initial state only and is never a legal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTarget {
    Processing,
    Approved,
    Rejected,
}

impl ReviewTarget {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            ReviewTarget::Processing => ApplicationStatus::Processing,
            ReviewTarget::Approved => ApplicationStatus::Approved,
            ReviewTarget::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Outcome of checking a requested transition against the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    /// The transition may proceed.
    Allowed,
    /// The record already holds the target status.
    NoOp,
    /// The record is Approved or Rejected and cannot move again.
    Terminal,
}

pub fn check_transition(current: ApplicationStatus, target: ReviewTarget) -> TransitionCheck {
    if current.is_terminal() {
        return TransitionCheck::Terminal;
    }
    if current == target.status() {
        return TransitionCheck::NoOp;
    }
    TransitionCheck::Allowed
}

/// Precondition failures surfaced to callers of single-item operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("application is {status} and can no longer change status")]
    TerminalStatus { status: &'static str },
    #[error("application is {status}; only pending applications can be edited")]
    NotEditable { status: &'static str },
    #[error("application belongs to a different farmer")]
    NotOwner,
    #[error("application changed while the edit was in flight")]
    StaleVersion,
}

/// Per-item result of a bulk status update. A bad identifier never aborts
/// the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkItemOutcome {
    Updated { id: ApplicationId },
    SkippedTerminal { id: ApplicationId },
    NotFound { id: ApplicationId },
}
