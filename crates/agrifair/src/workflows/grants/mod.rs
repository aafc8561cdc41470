//! Grant publishing, eligibility resolution, and application processing.

pub mod applications;
pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod risk;

pub use domain::{FarmerId, FarmerProfile, Grant, GrantBenefit, GrantId, LandUnit, TargetArea};
pub use eligibility::eligible_grants;
