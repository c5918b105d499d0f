//! API request types

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::account::AccountId;

/// Body of `POST /transfers`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    #[schema(example = 1)]
    pub from_user_id: AccountId,
    #[schema(example = 2)]
    pub to_user_id: AccountId,
    #[schema(example = 30)]
    pub amount: i64,
    /// Optional free-text note, at most 512 characters
    #[schema(example = "coffee round")]
    pub note: Option<String>,
}

/// Query parameters of `GET /transfers`
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTransfersParams {
    /// Account whose history is requested (as sender or receiver)
    pub user_id: AccountId,
    /// 1-based page number
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,
    /// Records per page, 1..=200
    #[serde(default = "default_page_size")]
    #[param(example = 20)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}
