// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response bodies.
//!
//! Amounts travel as integer minor units; timestamps as RFC 3339 strings.
//! Domain entities never derive serde themselves; these DTOs are the only
//! wire shapes.

use agrisure_domain::{
    Claim, Farm, Farmer, Invoice, Notification, PermissionSet, Quotation, Role, User,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) fn fmt_ts(ts: OffsetDateTime) -> String {
    // Rfc3339 formatting of a UTC timestamp does not fail.
    ts.format(&Rfc3339).unwrap_or_default()
}

fn fmt_opt_ts(ts: Option<OffsetDateTime>) -> Option<String> {
    ts.map(fmt_ts)
}

// ---------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub expires_at: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub user_id: Option<i64>,
    pub email: String,
    pub name: String,
    pub role: String,
    pub organization_id: i64,
    pub status: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.value().to_string(),
            organization_id: user.organization_id,
            status: user.status.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFarmerRequest {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmerDto {
    pub farmer_id: Option<i64>,
    pub organization_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub phone_number: String,
    pub status: String,
}

impl From<&Farmer> for FarmerDto {
    fn from(farmer: &Farmer) -> Self {
        Self {
            farmer_id: farmer.farmer_id,
            organization_id: farmer.organization_id,
            first_name: farmer.first_name.clone(),
            last_name: farmer.last_name.clone(),
            id_number: farmer.id_number.clone(),
            phone_number: farmer.phone_number.clone(),
            status: farmer.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFarmRequest {
    pub farmer_id: i64,
    pub name: String,
    pub size: i64,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmDto {
    pub farm_id: Option<i64>,
    pub farmer_id: i64,
    pub name: String,
    pub size: i64,
    pub unit_of_measure: String,
    pub status: String,
}

impl From<&Farm> for FarmDto {
    fn from(farm: &Farm) -> Self {
        Self {
            farm_id: farm.farm_id,
            farmer_id: farm.farmer_id,
            name: farm.name.clone(),
            size: farm.size,
            unit_of_measure: farm.unit_of_measure.clone(),
            status: farm.status.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------
// Quotations
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuotationRequest {
    pub farmer_id: i64,
    pub farm_id: i64,
    pub product_id: i64,
    pub premium_amount: i64,
    pub sum_insured: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkPaidRequest {
    pub payment_reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotationDto {
    pub quotation_id: Option<i64>,
    pub farmer_id: i64,
    pub farm_id: i64,
    pub product_id: i64,
    pub policy_number: Option<String>,
    pub premium_amount: i64,
    pub sum_insured: i64,
    pub status: String,
    pub payment_date: Option<String>,
    pub payment_reference: Option<String>,
}

impl From<&Quotation> for QuotationDto {
    fn from(quotation: &Quotation) -> Self {
        Self {
            quotation_id: quotation.quotation_id,
            farmer_id: quotation.farmer_id,
            farm_id: quotation.farm_id,
            product_id: quotation.product_id,
            policy_number: quotation.policy_number.clone(),
            premium_amount: quotation.premium_amount.minor(),
            sum_insured: quotation.sum_insured.minor(),
            status: quotation.status.as_str().to_string(),
            payment_date: fmt_opt_ts(quotation.payment_date),
            payment_reference: quotation.payment_reference.clone(),
        }
    }
}

// ---------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClaimRequest {
    pub farmer_id: i64,
    pub quotation_id: i64,
    pub estimated_loss_amount: i64,
    #[serde(default)]
    pub loss_details: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignAssessorRequest {
    pub assessor_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApproveClaimRequest {
    pub approved_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimDto {
    pub claim_id: Option<i64>,
    pub farmer_id: i64,
    pub quotation_id: i64,
    pub loss_assessor_id: Option<i64>,
    pub claim_number: String,
    pub estimated_loss_amount: i64,
    pub approved_amount: Option<i64>,
    pub status: String,
    pub approval_date: Option<String>,
    /// Always a JSON object, never null.
    pub loss_details: Value,
}

impl From<&Claim> for ClaimDto {
    fn from(claim: &Claim) -> Self {
        Self {
            claim_id: claim.claim_id,
            farmer_id: claim.farmer_id,
            quotation_id: claim.quotation_id,
            loss_assessor_id: claim.loss_assessor_id,
            claim_number: claim.claim_number.clone(),
            estimated_loss_amount: claim.estimated_loss_amount.minor(),
            approved_amount: claim.approved_amount.map(|amount| amount.minor()),
            status: claim.status.as_str().to_string(),
            approval_date: fmt_opt_ts(claim.approval_date),
            loss_details: Value::Object(claim.loss_details.clone()),
        }
    }
}

// ---------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub subsidy_id: i64,
    pub invoice_number: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleInvoiceRequest {
    pub payment_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectInvoiceRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkApproveRequest {
    pub invoice_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkSettleRequest {
    pub invoice_ids: Vec<i64>,
    pub payment_reference: String,
}

/// Partial-success summary for a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub requested: usize,
    pub affected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDto {
    pub invoice_id: Option<i64>,
    pub organization_id: i64,
    pub subsidy_id: i64,
    pub invoice_number: String,
    pub amount: i64,
    pub status: String,
    pub approved_date: Option<String>,
    pub settlement_date: Option<String>,
    pub payment_reference: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<&Invoice> for InvoiceDto {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.invoice_id,
            organization_id: invoice.organization_id,
            subsidy_id: invoice.subsidy_id,
            invoice_number: invoice.invoice_number.clone(),
            amount: invoice.amount.minor(),
            status: invoice.status.as_str().to_string(),
            approved_date: fmt_opt_ts(invoice.approved_date),
            settlement_date: fmt_opt_ts(invoice.settlement_date),
            payment_reference: invoice.payment_reference.clone(),
            rejection_reason: invoice.rejection_reason.clone(),
        }
    }
}

/// Per-status aggregate row for the statistics endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTotalDto {
    pub status: String,
    pub count: i64,
    pub total_amount: i64,
}

// ---------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub permissions: Option<PermissionSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleDto {
    pub role_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub is_system_role: bool,
    pub permissions: PermissionSet,
}

impl From<&Role> for RoleDto {
    fn from(role: &Role) -> Self {
        Self {
            role_id: role.role_id,
            name: role.name.value().to_string(),
            description: role.description.clone(),
            status: role.status.as_str().to_string(),
            is_system_role: role.is_system_role,
            permissions: role.permissions.clone(),
        }
    }
}

// ---------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NotificationDto {
    pub notification_id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<String>,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            notification_id: notification.notification_id,
            user_id: notification.user_id,
            title: notification.title.clone(),
            body: notification.body.clone(),
            is_read: notification.is_read,
            read_at: fmt_opt_ts(notification.read_at),
        }
    }
}

// ---------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub last_sync_timestamp: Option<String>,
    #[serde(default)]
    pub pending_data: SyncPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncPayload {
    #[serde(default)]
    pub farmers: Vec<FarmerUpload>,
    #[serde(default)]
    pub farms: Vec<FarmUpload>,
    #[serde(default)]
    pub quotations: Vec<QuotationUpload>,
    #[serde(default)]
    pub claims: Vec<ClaimUpload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmerUpload {
    #[serde(default)]
    pub farmer_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub phone_number: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmUpload {
    #[serde(default)]
    pub farm_id: Option<i64>,
    pub farmer_id: i64,
    pub name: String,
    pub size: i64,
    pub unit_of_measure: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationUpload {
    #[serde(default)]
    pub quotation_id: Option<i64>,
    pub farmer_id: i64,
    pub farm_id: i64,
    pub product_id: i64,
    pub premium_amount: i64,
    pub sum_insured: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimUpload {
    #[serde(default)]
    pub claim_id: Option<i64>,
    pub farmer_id: i64,
    pub quotation_id: i64,
    pub estimated_loss_amount: i64,
    #[serde(default)]
    pub loss_details: Option<Value>,
}

/// One rejected upload item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadError {
    /// Position of the item in its upload list.
    pub index: usize,
    pub entity_id: Option<i64>,
    pub message: String,
}

/// Outcome of one entity kind's upload list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub applied: usize,
    pub errors: Vec<UploadError>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadResults {
    pub farmers: UploadOutcome,
    pub farms: UploadOutcome,
    pub quotations: UploadOutcome,
    pub claims: UploadOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerUpdates {
    pub farmers: Vec<FarmerDto>,
    pub farms: Vec<FarmDto>,
    pub quotations: Vec<QuotationDto>,
    pub claims: Vec<ClaimDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictDto {
    pub entity: String,
    pub entity_id: i64,
    pub resolution: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub upload_results: UploadResults,
    pub server_updates: ServerUpdates,
    pub conflicts: Vec<ConflictDto>,
    pub sync_timestamp: String,
}
