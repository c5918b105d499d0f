//! Transfer endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::super::state::AppState;
use super::super::types::{
    ApiResult, CreateTransferRequest, ErrorBody, ListTransfersParams, TransferEnvelope,
    TransferListResponse,
};

/// Create a transfer
///
/// POST /transfers
///
/// Every call is a new attempt: the idempotency key is minted server-side
/// and echoed in the `Idempotency-Key` response header.
#[utoipa::path(
    post,
    path = "/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer settled", body = TransferEnvelope,
         headers(("Idempotency-Key" = String, description = "Key minted for this attempt"))),
        (status = 400, description = "Malformed request, or sender/receiver account does not exist", body = ErrorBody),
        (status = 409, description = "Rejected by a business rule; attempt recorded as failed", body = ErrorBody),
        (status = 422, description = "Illegal lifecycle transition", body = ErrorBody),
        (status = 500, description = "Store failure during commit", body = ErrorBody)
    ),
    tag = "Transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTransferRequest>,
) -> ApiResult<impl IntoResponse> {
    let transfer = state
        .orchestrator
        .create_transfer(req.from_user_id, req.to_user_id, req.amount, req.note)
        .await?;

    let key = transfer.idempotency_key.clone();
    Ok((
        StatusCode::CREATED,
        [("Idempotency-Key", key)],
        Json(TransferEnvelope { transfer }),
    ))
}

/// Look up a transfer by idempotency key
///
/// GET /transfers/{idem_key}
#[utoipa::path(
    get,
    path = "/transfers/{idem_key}",
    params(
        ("idem_key" = String, Path, description = "Idempotency key assigned at creation")
    ),
    responses(
        (status = 200, description = "Stored transfer record", body = TransferEnvelope),
        (status = 404, description = "No transfer under this key", body = ErrorBody)
    ),
    tag = "Transfers"
)]
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(idem_key): Path<String>,
) -> ApiResult<Json<TransferEnvelope>> {
    let transfer = state.orchestrator.get_transfer_by_key(&idem_key).await?;
    Ok(Json(TransferEnvelope { transfer }))
}

/// List transfers involving an account
///
/// GET /transfers?userId=&page=&pageSize=
#[utoipa::path(
    get,
    path = "/transfers",
    params(ListTransfersParams),
    responses(
        (status = 200, description = "One page of history, most recent first", body = TransferListResponse),
        (status = 400, description = "Pagination out of bounds", body = ErrorBody)
    ),
    tag = "Transfers"
)]
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTransfersParams>,
) -> ApiResult<Json<TransferListResponse>> {
    let page = state
        .orchestrator
        .list_transfers_for_account(params.user_id, params.page, params.page_size)
        .await?;
    Ok(Json(page.into()))
}
