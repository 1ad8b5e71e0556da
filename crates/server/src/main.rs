// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info};

use agrisure_api::dto::{
    ApproveClaimRequest, AssignAssessorRequest, BulkApproveRequest, BulkResult, BulkSettleRequest,
    ClaimDto, CreateClaimRequest, CreateFarmRequest, CreateFarmerRequest, CreateInvoiceRequest,
    CreateQuotationRequest, CreateRoleRequest, FarmDto, FarmerDto, InvoiceDto, LoginRequest,
    LoginResponse, MarkPaidRequest, NotificationDto, QuotationDto, RejectInvoiceRequest, RoleDto,
    SettleInvoiceRequest, StatusTotalDto, SyncRequest, SyncResponse, UpdateRoleRequest, UserDto,
};
use agrisure_api::{ApiError, Principal, claims, invoices, notifications, quotations, registry,
    roles, sync};
use agrisure_persistence::Store;

/// Agrisure Server - HTTP server for the agricultural insurance platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store wrapped in a Mutex for safe concurrent access.
    store: Arc<Mutex<Store>>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Response body for `mark_all_read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MarkAllReadResponse {
    /// How many notifications were flipped to read.
    updated: usize,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Validation(_) | ApiError::StateConflict { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Unauthorized(_) => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Forbidden { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal(detail) => {
                // The detail stays in the server log; clients get a generic body.
                error!(detail = %detail, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                }
            }
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, HttpError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing or malformed Authorization header"),
        })
}

/// Locks the store and resolves the calling principal from the bearer token.
async fn authenticated<'a>(
    store: &'a Mutex<Store>,
    headers: &HeaderMap,
    now: OffsetDateTime,
) -> Result<(MutexGuard<'a, Store>, Principal), HttpError> {
    let token: &str = bearer_token(headers)?;
    let guard: MutexGuard<'a, Store> = store.lock().await;
    let principal: Principal = agrisure_api::authenticate(&guard, token, now)?;
    Ok((guard, principal))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let store = state.store.lock().await;
    let outcome = agrisure_api::login(&store, &req.email, &req.password, now)?;
    drop(store);

    let expires_at: String = outcome.expires_at.format(&Rfc3339).map_err(|e| HttpError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("Timestamp formatting failed: {e}"),
    })?;
    Ok(Json(LoginResponse {
        session_token: outcome.session_token,
        expires_at,
        user: UserDto::from(&outcome.user),
    }))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = bearer_token(&headers)?;
    let store = state.store.lock().await;
    agrisure_api::logout(&store, token)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/whoami`.
async fn handle_whoami(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (_store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(UserDto::from(&principal.user)))
}

/// Handler for POST `/farmers`.
async fn handle_create_farmer(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateFarmerRequest>,
) -> Result<Json<FarmerDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(registry::create_farmer(&store, &principal, &req, now)?))
}

/// Handler for GET `/farmers`.
async fn handle_list_farmers(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FarmerDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(registry::list_farmers(&store, &principal)?))
}

/// Handler for GET `/farmers/{id}`.
async fn handle_get_farmer(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(farmer_id): Path<i64>,
) -> Result<Json<FarmerDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(registry::get_farmer(&store, &principal, farmer_id)?))
}

/// Handler for POST `/farms`.
async fn handle_create_farm(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateFarmRequest>,
) -> Result<Json<FarmDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(registry::create_farm(&store, &principal, &req, now)?))
}

/// Handler for POST `/quotations`.
async fn handle_create_quotation(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateQuotationRequest>,
) -> Result<Json<QuotationDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(quotations::create(&store, &principal, &req, now)?))
}

/// Handler for GET `/quotations/{id}`.
async fn handle_get_quotation(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(quotation_id): Path<i64>,
) -> Result<Json<QuotationDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(quotations::get(&store, &principal, quotation_id)?))
}

/// Handler for GET `/farmers/{id}/quotations`.
async fn handle_list_farmer_quotations(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(farmer_id): Path<i64>,
) -> Result<Json<Vec<QuotationDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(quotations::list_for_farmer(
        &store, &principal, farmer_id,
    )?))
}

/// Handler for POST `/quotations/{id}/mark_paid`.
async fn handle_mark_quotation_paid(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(quotation_id): Path<i64>,
    Json(req): Json<MarkPaidRequest>,
) -> Result<Json<QuotationDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(quotation_id, "Handling mark_paid request");
    Ok(Json(quotations::mark_as_paid(
        &store,
        &principal,
        quotation_id,
        &req,
        now,
    )?))
}

/// Handler for POST `/quotations/{id}/write_policy`.
async fn handle_write_policy(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(quotation_id): Path<i64>,
) -> Result<Json<QuotationDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(quotation_id, "Handling write_policy request");
    Ok(Json(quotations::write(&store, &principal, quotation_id, now)?))
}

/// Handler for POST `/claims`.
async fn handle_create_claim(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimDto>), HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    let claim: ClaimDto = claims::create(&store, &principal, &req, now)?;
    info!(claim_number = %claim.claim_number, "Filed claim");
    Ok((StatusCode::CREATED, Json(claim)))
}

/// Handler for GET `/claims/statistics`.
async fn handle_claim_statistics(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<StatusTotalDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(claims::statistics(&store, &principal)?))
}

/// Handler for GET `/claims/{id}`.
async fn handle_get_claim(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(claim_id): Path<i64>,
) -> Result<Json<ClaimDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(claims::get(&store, &principal, claim_id)?))
}

/// Handler for GET `/farmers/{id}/claims`.
async fn handle_list_farmer_claims(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(farmer_id): Path<i64>,
) -> Result<Json<Vec<ClaimDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(claims::list_for_farmer(&store, &principal, farmer_id)?))
}

/// Handler for POST `/claims/{id}/assign_assessor`.
async fn handle_assign_assessor(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(claim_id): Path<i64>,
    Json(req): Json<AssignAssessorRequest>,
) -> Result<Json<ClaimDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (mut store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(claim_id, assessor_id = req.assessor_id, "Handling assign_assessor request");
    Ok(Json(claims::assign(
        &mut store, &principal, claim_id, &req, now,
    )?))
}

/// Handler for POST `/claims/{id}/approve`.
async fn handle_approve_claim(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(claim_id): Path<i64>,
    Json(req): Json<ApproveClaimRequest>,
) -> Result<Json<ClaimDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(claim_id, "Handling approve claim request");
    Ok(Json(claims::approve(&store, &principal, claim_id, &req, now)?))
}

/// Handler for POST `/claims/{id}/reject`.
async fn handle_reject_claim(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(claim_id): Path<i64>,
) -> Result<Json<ClaimDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(claim_id, "Handling reject claim request");
    Ok(Json(claims::reject(&store, &principal, claim_id, now)?))
}

/// Handler for POST `/claims/{id}/mark_paid`.
async fn handle_mark_claim_paid(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(claim_id): Path<i64>,
) -> Result<Json<ClaimDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(claim_id, "Handling claim payout request");
    Ok(Json(claims::mark_paid(&store, &principal, claim_id, now)?))
}

/// Handler for POST `/invoices`.
async fn handle_create_invoice(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(invoices::create(&store, &principal, &req)?))
}

/// Handler for GET `/invoices`.
async fn handle_list_invoices(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InvoiceDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(invoices::list(&store, &principal)?))
}

/// Handler for GET `/invoices/statistics`.
async fn handle_invoice_statistics(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<StatusTotalDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(invoices::statistics(&store, &principal)?))
}

/// Handler for GET `/invoices/{id}`.
async fn handle_get_invoice(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(invoice_id): Path<i64>,
) -> Result<Json<InvoiceDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(invoices::get(&store, &principal, invoice_id)?))
}

/// Handler for POST `/invoices/{id}/approve`.
async fn handle_approve_invoice(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(invoice_id): Path<i64>,
) -> Result<Json<InvoiceDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(invoice_id, "Handling approve invoice request");
    Ok(Json(invoices::approve(&store, &principal, invoice_id, now)?))
}

/// Handler for POST `/invoices/{id}/settle`.
async fn handle_settle_invoice(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(invoice_id): Path<i64>,
    Json(req): Json<SettleInvoiceRequest>,
) -> Result<Json<InvoiceDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(invoice_id, "Handling settle invoice request");
    Ok(Json(invoices::settle(
        &store, &principal, invoice_id, &req, now,
    )?))
}

/// Handler for POST `/invoices/{id}/reject`.
async fn handle_reject_invoice(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(invoice_id): Path<i64>,
    Json(req): Json<RejectInvoiceRequest>,
) -> Result<Json<InvoiceDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(invoice_id, "Handling reject invoice request");
    Ok(Json(invoices::reject(&store, &principal, invoice_id, &req)?))
}

/// Handler for POST `/invoices/bulk_approve`.
async fn handle_bulk_approve(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<BulkApproveRequest>,
) -> Result<Json<BulkResult>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(requested = req.invoice_ids.len(), "Handling bulk approve request");
    Ok(Json(invoices::bulk_approve(&store, &principal, &req, now)?))
}

/// Handler for POST `/invoices/bulk_settle`.
async fn handle_bulk_settle(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<BulkSettleRequest>,
) -> Result<Json<BulkResult>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(requested = req.invoice_ids.len(), "Handling bulk settle request");
    Ok(Json(invoices::bulk_settle(&store, &principal, &req, now)?))
}

/// Handler for POST `/roles`.
async fn handle_create_role(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<RoleDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(name = %req.name, "Handling create role request");
    Ok(Json(roles::create(&store, &principal, &req)?))
}

/// Handler for GET `/roles`.
async fn handle_list_roles(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoleDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(roles::list(&store, &principal)?))
}

/// Handler for GET `/roles/{name}`.
async fn handle_get_role(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<RoleDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(roles::get(&store, &principal, &name)?))
}

/// Handler for PUT `/roles/{name}`.
async fn handle_update_role(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<RoleDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(name = %name, "Handling update role request");
    Ok(Json(roles::update(&store, &principal, &name, &req)?))
}

/// Handler for DELETE `/roles/{name}`.
async fn handle_delete_role(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<StatusCode, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(name = %name, "Handling delete role request");
    roles::delete(&store, &principal, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/notifications`.
async fn handle_list_notifications(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<NotificationDto>>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(notifications::list(&store, &principal)?))
}

/// Handler for POST `/notifications/{id}/read`.
async fn handle_mark_notification_read(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationDto>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    Ok(Json(notifications::mark_read(
        &store,
        &principal,
        notification_id,
        now,
    )?))
}

/// Handler for POST `/notifications/read_all`.
async fn handle_mark_all_notifications_read(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<MarkAllReadResponse>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    let updated: usize = notifications::mark_all_read(&store, &principal, now)?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Handler for POST `/sync`.
async fn handle_sync(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, HttpError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let (store, principal) = authenticated(&state.store, &headers, now).await?;
    info!(
        farmers = req.pending_data.farmers.len(),
        farms = req.pending_data.farms.len(),
        quotations = req.pending_data.quotations.len(),
        claims = req.pending_data.claims.len(),
        "Handling sync request"
    );
    Ok(Json(sync::sync(&store, &principal, &req, now)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/farmers", post(handle_create_farmer))
        .route("/farmers", get(handle_list_farmers))
        .route("/farmers/{id}", get(handle_get_farmer))
        .route("/farmers/{id}/quotations", get(handle_list_farmer_quotations))
        .route("/farmers/{id}/claims", get(handle_list_farmer_claims))
        .route("/farms", post(handle_create_farm))
        .route("/quotations", post(handle_create_quotation))
        .route("/quotations/{id}", get(handle_get_quotation))
        .route("/quotations/{id}/mark_paid", post(handle_mark_quotation_paid))
        .route("/quotations/{id}/write_policy", post(handle_write_policy))
        .route("/claims", post(handle_create_claim))
        .route("/claims/statistics", get(handle_claim_statistics))
        .route("/claims/{id}", get(handle_get_claim))
        .route("/claims/{id}/assign_assessor", post(handle_assign_assessor))
        .route("/claims/{id}/approve", post(handle_approve_claim))
        .route("/claims/{id}/reject", post(handle_reject_claim))
        .route("/claims/{id}/mark_paid", post(handle_mark_claim_paid))
        .route("/invoices", post(handle_create_invoice))
        .route("/invoices", get(handle_list_invoices))
        .route("/invoices/statistics", get(handle_invoice_statistics))
        .route("/invoices/{id}", get(handle_get_invoice))
        .route("/invoices/{id}/approve", post(handle_approve_invoice))
        .route("/invoices/{id}/settle", post(handle_settle_invoice))
        .route("/invoices/{id}/reject", post(handle_reject_invoice))
        .route("/invoices/bulk_approve", post(handle_bulk_approve))
        .route("/invoices/bulk_settle", post(handle_bulk_settle))
        .route("/roles", post(handle_create_role))
        .route("/roles", get(handle_list_roles))
        .route("/roles/{name}", get(handle_get_role))
        .route("/roles/{name}", put(handle_update_role))
        .route("/roles/{name}", delete(handle_delete_role))
        .route("/notifications", get(handle_list_notifications))
        .route("/notifications/read_all", post(handle_mark_all_notifications_read))
        .route("/notifications/{id}/read", post(handle_mark_notification_read))
        .route("/sync", post(handle_sync))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Agrisure Server");

    let store: Store = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Store::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Store::new_in_memory()?
    };

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
    };
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
