use std::sync::Arc;

use agrifair::error::AppError;
use agrifair::workflows::grants::applications::{
    ApplicationSubmission, DocumentCategory, DocumentDescriptor, FarmerSnapshot,
    GrantApplicationService, MarkViewedOutcome, NewGrant, ReviewTarget, ScoringConfig,
};
use agrifair::workflows::grants::catalog::FarmerDirectory;
use agrifair::workflows::grants::domain::{
    FarmerId, FarmerProfile, GrantBenefit, LandUnit, TargetArea,
};
use agrifair::workflows::grants::risk::UnavailableRiskScorer;
use chrono::{Duration, Utc};
use clap::Args;

use crate::infra::{InMemoryApplicationRepository, InMemoryFarmerDirectory, InMemoryGrantCatalog};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Ward used for the seeded grant and farmers
    #[arg(long, default_value_t = 5)]
    pub(crate) ward: u32,
    /// Municipality used for the seeded grant and farmers
    #[arg(long, default_value = "Bharatpur")]
    pub(crate) municipality: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { ward, municipality } = args;

    println!("Grant application pipeline demo");

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let catalog = Arc::new(InMemoryGrantCatalog::default());
    let farmers = InMemoryFarmerDirectory::default();
    let service = GrantApplicationService::new(
        repository,
        catalog,
        Arc::new(UnavailableRiskScorer),
        ScoringConfig::default(),
    );

    let grant = service.create_grant(NewGrant {
        title: "Seasonal seed support".to_string(),
        description: "Cash support for smallholder paddy farmers".to_string(),
        benefit: GrantBenefit::Money { amount_rs: 50_000 },
        target_areas: vec![TargetArea {
            ward,
            municipality: municipality.clone(),
        }],
        deadline: Some(Utc::now() + Duration::days(30)),
        created_by: "demo-admin".to_string(),
    })?;
    println!(
        "- Published grant {} \"{}\" ({})",
        grant.id.0,
        grant.title,
        grant.benefit.kind_label()
    );

    for profile in demo_farmers(ward, &municipality) {
        farmers.register(profile);
    }

    for (farmer_id, snapshot) in demo_submissions(ward, &municipality) {
        let profile = match farmers.fetch(&farmer_id)? {
            Some(profile) => profile,
            None => continue,
        };
        let record = service.submit(
            &profile,
            ApplicationSubmission {
                grant_id: grant.id,
                snapshot,
            },
        )?;
        println!(
            "- Received application {} from {} -> {}",
            record.id.0,
            record.snapshot.full_name,
            record.status.label()
        );
    }

    println!("\nPriority ranking");
    let ranking = service.priority_ranking(grant.id)?;
    for entry in &ranking {
        println!(
            "  {} | {} | priority {:.2} | approval {:.0}% | {}",
            entry.application_id.0,
            entry.farmer_name,
            entry.score.priority_score,
            entry.score.approval_probability * 100.0,
            entry.score.recommendation.label()
        );
        for reason in &entry.score.reasoning {
            println!("    - {}", reason);
        }
    }

    println!("\nReview cycle");
    let top = match ranking.first() {
        Some(entry) => entry.application_id,
        None => return Ok(()),
    };
    let outcome = service.mark_viewed(top, "demo-admin")?;
    let transitioned = matches!(outcome, MarkViewedOutcome::Transitioned(_));
    println!(
        "- Viewed application {} (status changed: {})",
        top.0, transitioned
    );
    let approved = service.update_status(
        top,
        ReviewTarget::Approved,
        Some("Top ranked applicant for this cycle".to_string()),
        "demo-admin",
    )?;
    println!(
        "- Application {} -> {} by {}",
        approved.id.0,
        approved.status.label(),
        approved.updated_by.as_deref().unwrap_or("unknown")
    );

    Ok(())
}

fn demo_farmers(ward: u32, municipality: &str) -> Vec<FarmerProfile> {
    vec![
        FarmerProfile {
            id: FarmerId("farmer-ram".to_string()),
            full_name: "Ram Bahadur Thapa".to_string(),
            ward,
            municipality: municipality.to_string(),
            monthly_income_rs: 8_000,
            land_size: 1.5,
            land_unit: LandUnit::Bigha,
            previous_grants: 0,
            crop_details: "धान, मकै".to_string(),
        },
        FarmerProfile {
            id: FarmerId("farmer-sita".to_string()),
            full_name: "Sita Kumari Adhikari".to_string(),
            ward,
            municipality: municipality.to_string(),
            monthly_income_rs: 28_000,
            land_size: 5.0,
            land_unit: LandUnit::Bigha,
            previous_grants: 2,
            crop_details: "तरकारी".to_string(),
        },
    ]
}

fn demo_submissions(ward: u32, municipality: &str) -> Vec<(FarmerId, FarmerSnapshot)> {
    demo_farmers(ward, municipality)
        .into_iter()
        .map(|profile| {
            let snapshot = FarmerSnapshot {
                full_name: profile.full_name.clone(),
                phone: "9841000000".to_string(),
                email: None,
                address: format!("{}-{}", profile.municipality, profile.ward),
                ward: profile.ward,
                municipality: profile.municipality.clone(),
                monthly_income_rs: profile.monthly_income_rs,
                land_size: profile.land_size,
                land_unit: profile.land_unit,
                previous_grants: profile.previous_grants,
                previous_grant_details: None,
                crop_details: profile.crop_details.clone(),
                expected_benefits: "Seed and fertilizer for the coming season".to_string(),
                additional_notes: None,
                documents: vec![DocumentDescriptor {
                    name: "citizenship.pdf".to_string(),
                    category: DocumentCategory::Citizenship,
                    storage_key: format!("{}/citizenship.pdf", profile.id.0),
                }],
            };
            (profile.id, snapshot)
        })
        .collect()
}
