//! Storage and lookup traits for the grant catalog and farmer directory.
//!
//! Both are collaborator contracts: the portal's persistence layer provides
//! the real implementations, and the API service ships in-memory versions
//! for local runs and tests.

use super::domain::{FarmerId, FarmerProfile, Grant, GrantId};

/// Read/write access to published grants.
pub trait GrantCatalog: Send + Sync {
    fn insert(&self, grant: Grant) -> Result<Grant, CatalogError>;
    fn fetch(&self, id: GrantId) -> Result<Option<Grant>, CatalogError>;
    fn all(&self) -> Result<Vec<Grant>, CatalogError>;
    fn update(&self, grant: Grant) -> Result<(), CatalogError>;
    fn remove(&self, id: GrantId) -> Result<(), CatalogError>;
}

/// Lookup of farmer profiles by stable identifier.
pub trait FarmerDirectory: Send + Sync {
    fn fetch(&self, id: &FarmerId) -> Result<Option<FarmerProfile>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("grant already exists")]
    Conflict,
    #[error("grant not found")]
    NotFound,
    #[error("grant is referenced by applications and cannot be deleted")]
    Referenced,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
