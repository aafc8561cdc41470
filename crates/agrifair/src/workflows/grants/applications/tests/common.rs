use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::workflows::grants::applications::domain::{
    ApplicationId, ApplicationStatus, ApplicationSubmission, DocumentCategory, DocumentDescriptor,
    FarmerSnapshot,
};
use crate::workflows::grants::applications::repository::{
    ApplicationRecord, ApplicationRepository, RepositoryError,
};
use crate::workflows::grants::applications::router::{application_router, ApplicationApi};
use crate::workflows::grants::applications::scoring::ScoringConfig;
use crate::workflows::grants::applications::service::GrantApplicationService;
use crate::workflows::grants::catalog::{CatalogError, FarmerDirectory, GrantCatalog};
use crate::workflows::grants::domain::{
    FarmerId, FarmerProfile, Grant, GrantBenefit, GrantId, LandUnit, TargetArea,
};
use crate::workflows::grants::risk::UnavailableRiskScorer;

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    sequence: AtomicU64,
}

impl ApplicationRepository for MemoryRepository {
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
pub(super) struct MemoryCatalog {
    grants: Mutex<HashMap<GrantId, Grant>>,
}

impl GrantCatalog for MemoryCatalog {
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
pub(super) struct MemoryDirectory {
    farmers: Mutex<HashMap<FarmerId, FarmerProfile>>,
}

impl MemoryDirectory {
    pub(super) fn register(&self, farmer: FarmerProfile) {
        let mut guard = self.farmers.lock().expect("directory mutex poisoned");
        guard.insert(farmer.id.clone(), farmer);
    }
}

impl FarmerDirectory for MemoryDirectory {
    fn fetch(&self, id: &FarmerId) -> Result<Option<FarmerProfile>, CatalogError> {
        let guard = self.farmers.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) type TestService = GrantApplicationService<MemoryRepository, MemoryCatalog>;

pub(super) fn service() -> (Arc<TestService>, Arc<MemoryRepository>, Arc<MemoryCatalog>) {
    let repository = Arc::new(MemoryRepository::default());
    let catalog = Arc::new(MemoryCatalog::default());
    let service = Arc::new(GrantApplicationService::new(
        repository.clone(),
        catalog.clone(),
        Arc::new(UnavailableRiskScorer),
        ScoringConfig::default(),
    ));
    (service, repository, catalog)
}

pub(super) fn router_api(
    service: Arc<TestService>,
    directory: Arc<MemoryDirectory>,
) -> axum::Router {
    application_router(ApplicationApi {
        service,
        farmers: directory,
    })
}

pub(super) fn grant(id: u32, ward: u32, municipality: &str) -> Grant {
    Grant {
        id: GrantId(id),
        title: format!("Seed subsidy {id}"),
        description: "Support for smallholder seed purchases".to_string(),
        benefit: GrantBenefit::Money { amount_rs: 50_000 },
        target_areas: vec![TargetArea {
            ward,
            municipality: municipality.to_string(),
        }],
        deadline: Some(Utc::now() + Duration::days(30)),
        active: true,
        created_by: "admin-1".to_string(),
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub(super) fn farmer(id: &str, ward: u32, municipality: &str) -> FarmerProfile {
    FarmerProfile {
        id: FarmerId(id.to_string()),
        full_name: "Ram Shrestha".to_string(),
        ward,
        municipality: municipality.to_string(),
        monthly_income_rs: 8_000,
        land_size: 1.5,
        land_unit: LandUnit::Bigha,
        previous_grants: 0,
        crop_details: "धान, मकै".to_string(),
    }
}

pub(super) fn snapshot(ward: u32, municipality: &str) -> FarmerSnapshot {
    FarmerSnapshot {
        full_name: "Ram Shrestha".to_string(),
        phone: "9812345678".to_string(),
        email: Some("ram@example.com".to_string()),
        address: format!("Ward {ward}, {municipality}"),
        ward,
        municipality: municipality.to_string(),
        monthly_income_rs: 8_000,
        land_size: 1.5,
        land_unit: LandUnit::Bigha,
        previous_grants: 0,
        previous_grant_details: None,
        crop_details: "धान, मकै".to_string(),
        expected_benefits: "Buy improved seed for the coming season".to_string(),
        additional_notes: None,
        documents: vec![DocumentDescriptor {
            name: "Citizenship card".to_string(),
            category: DocumentCategory::Citizenship,
            storage_key: "uploads/applications/citizen_f-1.jpg".to_string(),
        }],
    }
}

pub(super) fn submission(grant_id: u32, ward: u32, municipality: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        grant_id: GrantId(grant_id),
        snapshot: snapshot(ward, municipality),
    }
}
