//! Gateway types module
//!
//! Request DTOs, response envelopes and the error body the HTTP surface
//! speaks. Domain types never leak mutation paths to the wire: requests
//! deserialize into plain DTOs, responses serialize [`Transfer`] records
//! read-only.
//!
//! [`Transfer`]: crate::transfer::Transfer

pub mod request;
pub mod response;

pub use request::{CreateTransferRequest, ListTransfersParams};
pub use response::{ApiError, ApiResult, ErrorBody, TransferEnvelope, TransferListResponse};
