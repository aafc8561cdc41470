use serde::{Deserialize, Serialize};

use crate::workflows::grants::domain::{GrantId, LandUnit};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Workflow status of an application. Pending is the initial state;
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Processing,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Processing => "processing",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }
}

/// Metadata for an uploaded proof document. The files themselves live in
/// the portal's storage subsystem; only the references travel with the
/// application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    pub category: DocumentCategory,
    pub storage_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Citizenship,
    LandOwnership,
    LandTaxReceipt,
    Misc,
}

/// Denormalized copy of the farmer's declared circumstances, frozen into
/// the application at submission time. Self-reported and unverified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerSnapshot {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub ward: u32,
    pub municipality: String,
    pub monthly_income_rs: u32,
    pub land_size: f64,
    pub land_unit: LandUnit,
    pub previous_grants: u32,
    pub previous_grant_details: Option<String>,
    pub crop_details: String,
    pub expected_benefits: String,
    pub additional_notes: Option<String>,
    pub documents: Vec<DocumentDescriptor>,
}

impl FarmerSnapshot {
    pub fn land_size_bigha(&self) -> f64 {
        self.land_unit.to_bigha(self.land_size)
    }
}

/// Inbound payload for a new application against one grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub grant_id: GrantId,
    pub snapshot: FarmerSnapshot,
}

/// Fields a farmer may change while the application is still Pending.
/// Identity and location fields are not editable; those belong to the
/// profile subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEdit {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub monthly_income_rs: Option<u32>,
    pub land_size: Option<f64>,
    pub land_unit: Option<LandUnit>,
    pub crop_details: Option<String>,
    pub expected_benefits: Option<String>,
    pub additional_notes: Option<String>,
    pub documents: Option<Vec<DocumentDescriptor>>,
}

impl ApplicationEdit {
    /// Apply the populated fields onto a snapshot, leaving the rest as-is.
    pub fn apply_to(&self, snapshot: &mut FarmerSnapshot) {
        if let Some(phone) = &self.phone {
            snapshot.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            snapshot.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            snapshot.address = address.clone();
        }
        if let Some(income) = self.monthly_income_rs {
            snapshot.monthly_income_rs = income;
        }
        if let Some(size) = self.land_size {
            snapshot.land_size = size;
        }
        if let Some(unit) = self.land_unit {
            snapshot.land_unit = unit;
        }
        if let Some(crops) = &self.crop_details {
            snapshot.crop_details = crops.clone();
        }
        if let Some(benefits) = &self.expected_benefits {
            snapshot.expected_benefits = benefits.clone();
        }
        if let Some(notes) = &self.additional_notes {
            snapshot.additional_notes = Some(notes.clone());
        }
        if let Some(documents) = &self.documents {
            snapshot.documents = documents.clone();
        }
    }
}
