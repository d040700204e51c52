//! HTTP handlers for the registry gateway.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::state::AppState;
use super::types::{ApiResponse, IpnResponse, error_codes};
use crate::admin_auth::{HEADER_PASSWORD, HEADER_USERNAME};
use crate::payment::{SettlementOutcome, TxnRef, VerifyOutcome, response_indicates_success};
use crate::registry::{
    AdmissionEngine, CreateOutcome, NewRegistration, OrderBy, PublicInfo, QueueFilter,
    RegistrationQueue,
};

// ============================================================================
// Registration intake
// ============================================================================

/// Personal fields of a registration request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBody {
    #[schema(example = "Bob Smith")]
    pub name: String,
    #[schema(example = 12)]
    pub room: i32,
    pub birthday: Option<DateTime<Utc>>,
    #[schema(example = "0123456789")]
    pub phone: Option<String>,
    #[schema(example = "bob@example.com")]
    pub email: Option<String>,
}

/// Submit a registration request
///
/// The account credential travels in the `x-username` / `x-password`
/// headers; the body carries the personal fields. On failure the error
/// code identifies the offending field (101-106) or a username conflict
/// (107).
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterBody,
    responses(
        (status = 200, description = "Request queued", body = ApiResponse<PublicInfo>),
        (status = 400, description = "Validation failure or username conflict"),
        (status = 401, description = "Missing credential headers"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Resident"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<ApiResponse<PublicInfo>>), (StatusCode, Json<ApiResponse<()>>)> {
    let credential = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let (Some(username), Some(password)) =
        (credential(HEADER_USERNAME), credential(HEADER_PASSWORD))
    else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::MISSING_AUTH,
                "Missing credential headers",
            )),
        ));
    };

    let input = NewRegistration {
        name: body.name,
        room: body.room,
        birthday: body.birthday,
        phone: body.phone,
        email: body.email,
        username,
        password,
    };

    match RegistrationQueue::create(state.db.pool(), &state.ids, input).await {
        Ok(CreateOutcome::Created(request)) => {
            Ok((StatusCode::OK, Json(ApiResponse::success(request.to_public()))))
        }
        Ok(CreateOutcome::Rejected(code)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(code.code(), code.message())),
        )),
        Err(e) => {
            tracing::error!("registration intake failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Registration failed",
                )),
            ))
        }
    }
}

// ============================================================================
// Admin queue management
// ============================================================================

/// Filters and pagination for admin queue queries.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestQueryParams {
    /// Equality match on request id
    pub id: Option<i64>,
    /// Substring match on name
    pub name: Option<String>,
    /// Equality match on room
    pub room: Option<i32>,
    /// Equality match on username
    pub username: Option<String>,
    /// Pagination offset (rows, not pages)
    #[serde(default)]
    pub offset: i64,
    /// One of request_id, name, room, username; anything else orders by id
    pub order_by: Option<String>,
    /// Sort descending instead of ascending
    #[serde(default)]
    pub descending: bool,
}

impl RequestQueryParams {
    fn filter(&self) -> QueueFilter {
        QueueFilter {
            id: self.id,
            name: self.name.clone(),
            room: self.room,
            username: self.username.clone(),
        }
    }
}

/// List pending registration requests
#[utoipa::path(
    get,
    path = "/api/v1/admin/requests",
    params(RequestQueryParams),
    responses(
        (status = 200, description = "One page of pending requests", body = ApiResponse<Vec<PublicInfo>>),
        (status = 401, description = "Invalid admin credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RequestQueryParams>,
) -> Result<Json<ApiResponse<Vec<PublicInfo>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let order_by = params
        .order_by
        .as_deref()
        .map(OrderBy::from_param)
        .unwrap_or_default();

    let rows = RegistrationQueue::query(
        state.db.pool(),
        &params.filter(),
        params.offset.max(0),
        state.page_size,
        order_by,
        !params.descending,
    )
    .await
    .map_err(internal_error)?;

    let page = rows.iter().map(|r| r.to_public()).collect();
    Ok(Json(ApiResponse::success(page)))
}

/// Count pending registration requests
#[utoipa::path(
    get,
    path = "/api/v1/admin/residents/count",
    params(RequestQueryParams),
    responses(
        (status = 200, description = "Pending-queue cardinality", body = ApiResponse<i64>),
        (status = 401, description = "Invalid admin credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn count_requests(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RequestQueryParams>,
) -> Result<Json<ApiResponse<i64>>, (StatusCode, Json<ApiResponse<()>>)> {
    let count = RegistrationQueue::count(state.db.pool(), &params.filter())
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiResponse::success(count)))
}

/// A batch of request ids to admit or reject.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IdBatch {
    #[schema(example = json!([1234567890123_i64]))]
    pub ids: Vec<i64>,
}

/// Result of a batch admission or rejection.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOutcome {
    /// Number of queue rows affected; ids no longer pending are skipped
    pub processed: u64,
}

/// Admit pending requests as residents
#[utoipa::path(
    post,
    path = "/api/v1/admin/requests/accept",
    request_body = IdBatch,
    responses(
        (status = 200, description = "Batch admitted", body = ApiResponse<BatchOutcome>),
        (status = 401, description = "Invalid admin credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn accept_requests(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<IdBatch>,
) -> Result<Json<ApiResponse<BatchOutcome>>, (StatusCode, Json<ApiResponse<()>>)> {
    let processed = AdmissionEngine::accept(state.db.pool(), &state.ids, &batch.ids)
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiResponse::success(BatchOutcome { processed })))
}

/// Reject pending requests
#[utoipa::path(
    post,
    path = "/api/v1/admin/requests/reject",
    request_body = IdBatch,
    responses(
        (status = 200, description = "Batch rejected", body = ApiResponse<BatchOutcome>),
        (status = 401, description = "Invalid admin credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn reject_requests(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<IdBatch>,
) -> Result<Json<ApiResponse<BatchOutcome>>, (StatusCode, Json<ApiResponse<()>>)> {
    let processed = AdmissionEngine::reject(state.db.pool(), &batch.ids)
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiResponse::success(BatchOutcome { processed })))
}

// ============================================================================
// Payment gateway notifications
// ============================================================================

/// Payment gateway notification (IPN)
///
/// Always answers in the gateway's `{RspCode, Message}` schema: "00"
/// updated, "02" already applied, "97" invalid signature, "99" missing
/// required fields.
#[utoipa::path(
    get,
    path = "/ipn",
    responses(
        (status = 200, description = "Notification processed", body = IpnResponse)
    ),
    tag = "Payment"
)]
pub async fn ipn(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<IpnResponse> {
    let notification = match state.verifier.verify(&params) {
        VerifyOutcome::MissingFields => {
            return Json(IpnResponse::new("99", "Missing required fields"));
        }
        VerifyOutcome::InvalidSignature => {
            tracing::warn!("IPN signature verification failed");
            return Json(IpnResponse::new("97", "Invalid signature"));
        }
        VerifyOutcome::Verified(notification) => notification,
    };

    if !response_indicates_success(&notification.response_code) {
        // Nothing to settle; acknowledge so the gateway stops retrying.
        return Json(IpnResponse::new("00", "Data has been updated successfully"));
    }

    let txn: TxnRef = match notification.txn_ref.parse() {
        Ok(txn) => txn,
        Err(e) => {
            tracing::warn!("IPN carried malformed transaction reference: {e}");
            return Json(IpnResponse::new("99", "Missing required fields"));
        }
    };

    match state.settlement.apply(&txn).await {
        Ok(SettlementOutcome::Applied) => {
            Json(IpnResponse::new("00", "Data has been updated successfully"))
        }
        Ok(SettlementOutcome::AlreadyApplied) => {
            Json(IpnResponse::new("02", "Data has been updated already"))
        }
        Err(e) => {
            tracing::error!("settlement failed: {e}");
            Json(IpnResponse::new("99", "Unknown error"))
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Health check response data
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                timestamp_ms: now_ms,
            })),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] database ping failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::SERVICE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            )
        }
    }
}

fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, Json<ApiResponse<()>>) {
    tracing::error!("admin operation failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(
            error_codes::INTERNAL_ERROR,
            "Internal server error",
        )),
    )
}
