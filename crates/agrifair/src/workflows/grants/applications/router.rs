use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationEdit, ApplicationId, ApplicationStatus, ApplicationSubmission, FarmerSnapshot,
};
use super::lifecycle::ReviewTarget;
use super::repository::ApplicationRepository;
use super::service::{ApplicationServiceError, GrantApplicationService, MarkViewedOutcome};
use crate::workflows::grants::catalog::{FarmerDirectory, GrantCatalog};
use crate::workflows::grants::domain::{FarmerId, GrantId};

/// Shared state for the application endpoints: the pipeline service plus
/// the external farmer directory used to resolve identities.
pub struct ApplicationApi<R, C, F> {
    pub service: Arc<GrantApplicationService<R, C>>,
    pub farmers: Arc<F>,
}

impl<R, C, F> Clone for ApplicationApi<R, C, F> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            farmers: self.farmers.clone(),
        }
    }
}

/// Router builder exposing the grant application pipeline over HTTP.
pub fn application_router<R, C, F>(api: ApplicationApi<R, C, F>) -> Router
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R, C, F>))
        .route(
            "/api/v1/applications/:application_id",
            get(application_handler::<R, C, F>).put(edit_handler::<R, C, F>),
        )
        .route(
            "/api/v1/applications/:application_id/viewed",
            post(mark_viewed_handler::<R, C, F>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(update_status_handler::<R, C, F>),
        )
        .route(
            "/api/v1/applications/bulk-status",
            post(bulk_status_handler::<R, C, F>),
        )
        .route(
            "/api/v1/farmers/:farmer_id/eligible-grants",
            get(eligible_grants_handler::<R, C, F>),
        )
        .route(
            "/api/v1/grants/:grant_id/applications",
            get(grant_applications_handler::<R, C, F>),
        )
        .route(
            "/api/v1/grants/:grant_id/ranking",
            get(ranking_handler::<R, C, F>),
        )
        .route(
            "/api/v1/grants/:grant_id/anomaly-check",
            post(anomaly_check_handler::<R, C, F>),
        )
        .with_state(api)
}

fn error_response(err: ApplicationServiceError) -> Response {
    let status = err.status_code();
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

fn farmer_not_found(id: &FarmerId) -> Response {
    let payload = json!({ "error": format!("farmer '{}' not found", id.0) });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub farmer_id: FarmerId,
    pub grant_id: GrantId,
    pub snapshot: FarmerSnapshot,
}

async fn submit_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    let farmer = match api.farmers.fetch(&request.farmer_id) {
        Ok(Some(farmer)) => farmer,
        Ok(None) => return farmer_not_found(&request.farmer_id),
        Err(err) => return error_response(err.into()),
    };

    let submission = ApplicationSubmission {
        grant_id: request.grant_id,
        snapshot: request.snapshot,
    };

    match api.service.submit(&farmer, submission) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

async fn application_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api.service.application(ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkViewedRequest {
    pub reviewed_by: String,
}

async fn mark_viewed_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(application_id): Path<u64>,
    Json(request): Json<MarkViewedRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api
        .service
        .mark_viewed(ApplicationId(application_id), &request.reviewed_by)
    {
        Ok(outcome) => {
            let transitioned = matches!(outcome, MarkViewedOutcome::Transitioned(_));
            let payload = json!({
                "application": outcome.record().status_view(),
                "transitioned": transitioned,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReviewTarget,
    #[serde(default)]
    pub remarks: Option<String>,
    pub reviewed_by: String,
}

async fn update_status_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(application_id): Path<u64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api.service.update_status(
        ApplicationId(application_id),
        request.status,
        request.remarks,
        &request.reviewed_by,
    ) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub application_ids: Vec<u64>,
    pub status: ReviewTarget,
    #[serde(default)]
    pub remarks: Option<String>,
    pub reviewed_by: String,
}

async fn bulk_status_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Json(request): Json<BulkStatusRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    let ids: Vec<ApplicationId> = request.application_ids.iter().copied().map(ApplicationId).collect();
    match api.service.bulk_update_status(
        &ids,
        request.status,
        request.remarks,
        &request.reviewed_by,
    ) {
        Ok(outcomes) => (StatusCode::OK, Json(json!({ "results": outcomes }))).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub farmer_id: FarmerId,
    #[serde(flatten)]
    pub edit: ApplicationEdit,
}

async fn edit_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(application_id): Path<u64>,
    Json(request): Json<EditRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api.service.edit(
        ApplicationId(application_id),
        &request.farmer_id,
        request.edit,
    ) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

async fn eligible_grants_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(farmer_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    let farmer_id = FarmerId(farmer_id);
    let farmer = match api.farmers.fetch(&farmer_id) {
        Ok(Some(farmer)) => farmer,
        Ok(None) => return farmer_not_found(&farmer_id),
        Err(err) => return error_response(err.into()),
    };

    match api.service.eligible_grants(&farmer) {
        Ok(grants) => (StatusCode::OK, Json(grants)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct GrantApplicationsQuery {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
}

async fn grant_applications_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(grant_id): Path<u32>,
    Query(query): Query<GrantApplicationsQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api
        .service
        .applications_for_grant(GrantId(grant_id), query.status)
    {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|r| r.status_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn ranking_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(grant_id): Path<u32>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api.service.priority_ranking(GrantId(grant_id)) {
        Ok(ranking) => (StatusCode::OK, Json(ranking)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn anomaly_check_handler<R, C, F>(
    State(api): State<ApplicationApi<R, C, F>>,
    Path(grant_id): Path<u32>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: GrantCatalog + 'static,
    F: FarmerDirectory + 'static,
{
    match api.service.risk_report(GrantId(grant_id)).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}
