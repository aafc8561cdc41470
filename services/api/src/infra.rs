use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use agrifair::workflows::grants::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, RepositoryError,
};
use agrifair::workflows::grants::catalog::{CatalogError, FarmerDirectory, GrantCatalog};
use agrifair::workflows::grants::domain::{FarmerId, FarmerProfile, Grant, GrantId};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local application store. The production portal backs this trait
/// with its database; this implementation serves local runs and tests.
#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    sequence: AtomicU64,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != record.version {
            return Err(RepositoryError::StaleVersion);
        }
        record.version += 1;
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn by_grant(
        &self,
        grant_id: GrantId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ApplicationRecord> = guard
            .values()
            .filter(|record| record.grant_id == grant_id)
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    fn by_farmer_and_grant(
        &self,
        farmer_id: &FarmerId,
        grant_id: GrantId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.farmer_id == farmer_id && record.grant_id == grant_id)
            .cloned())
    }

    fn any_for_grant(&self, grant_id: GrantId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().any(|record| record.grant_id == grant_id))
    }

    fn next_id(&self) -> Result<ApplicationId, RepositoryError> {
        Ok(ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryGrantCatalog {
    grants: Mutex<HashMap<GrantId, Grant>>,
}

impl GrantCatalog for InMemoryGrantCatalog {
    fn insert(&self, grant: Grant) -> Result<Grant, CatalogError> {
        let mut guard = self.grants.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&grant.id) {
            return Err(CatalogError::Conflict);
        }
        guard.insert(grant.id, grant.clone());
        Ok(grant)
    }

    fn fetch(&self, id: GrantId) -> Result<Option<Grant>, CatalogError> {
        let guard = self.grants.lock().expect("catalog mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Grant>, CatalogError> {
        let guard = self.grants.lock().expect("catalog mutex poisoned");
        let mut grants: Vec<Grant> = guard.values().cloned().collect();
        grants.sort_by_key(|grant| grant.id);
        Ok(grants)
    }

    fn update(&self, grant: Grant) -> Result<(), CatalogError> {
        let mut guard = self.grants.lock().expect("catalog mutex poisoned");
        if !guard.contains_key(&grant.id) {
            return Err(CatalogError::NotFound);
        }
        guard.insert(grant.id, grant);
        Ok(())
    }

    fn remove(&self, id: GrantId) -> Result<(), CatalogError> {
        let mut guard = self.grants.lock().expect("catalog mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(CatalogError::NotFound)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryFarmerDirectory {
    farmers: Mutex<HashMap<FarmerId, FarmerProfile>>,
}

impl InMemoryFarmerDirectory {
    pub(crate) fn register(&self, farmer: FarmerProfile) {
        let mut guard = self.farmers.lock().expect("directory mutex poisoned");
        guard.insert(farmer.id.clone(), farmer);
    }
}

impl FarmerDirectory for InMemoryFarmerDirectory {
    fn fetch(&self, id: &FarmerId) -> Result<Option<FarmerProfile>, CatalogError> {
        let guard = self.farmers.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
