//! Transfer Error Types
//!
//! Every failure is classified into one of five categories (see
//! [`ErrorKind`]). The HTTP status and the machine-readable error code
//! derive from the category, except that a missing account on a create
//! request surfaces as a request error (400); only a missing transfer
//! record answers 404.

use thiserror::Error;

use crate::account::AccountId;
use crate::store::StoreError;
use crate::transfer::status::TransferStatus;

/// Failure categories for API responses and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request, rejected before anything is loaded or written
    Validation,
    /// A referenced account or transfer does not exist
    NotFound,
    /// Well-formed request rejected by a business rule (recorded as FAILED)
    BusinessRule,
    /// Illegal lifecycle transition; indicates a caller bug
    InvalidStateTransition,
    /// Store or other infrastructure failure
    System,
}

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("fromUserId must be positive")]
    InvalidSenderId,

    #[error("toUserId must be positive")]
    InvalidReceiverId,

    #[error("cannot transfer points to the same account")]
    SameAccount,

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("note cannot exceed 512 characters")]
    NoteTooLong,

    #[error("page must be at least 1")]
    InvalidPage,

    #[error("pageSize must be between 1 and 200")]
    InvalidPageSize,

    // === Not Found ===
    #[error("sender account not found: {0}")]
    SenderNotFound(AccountId),

    #[error("receiver account not found: {0}")]
    ReceiverNotFound(AccountId),

    #[error("transfer not found: {0}")]
    TransferNotFound(String),

    // === Business Rule Violations ===
    #[error("sender inactive")]
    SenderInactive,

    #[error("receiver inactive")]
    ReceiverInactive,

    #[error("insufficient points: available {available}, required {required}")]
    InsufficientPoints { available: i64, required: i64 },

    // === Lifecycle Integrity ===
    #[error("cannot {action} a transfer in state {from}")]
    InvalidStateTransition {
        from: TransferStatus,
        action: &'static str,
    },

    // === System Errors ===
    #[error("store failure: {0}")]
    Store(String),
}

impl TransferError {
    /// Classify this error into its category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidSenderId
            | TransferError::InvalidReceiverId
            | TransferError::SameAccount
            | TransferError::InvalidAmount
            | TransferError::NoteTooLong
            | TransferError::InvalidPage
            | TransferError::InvalidPageSize => ErrorKind::Validation,
            TransferError::SenderNotFound(_)
            | TransferError::ReceiverNotFound(_)
            | TransferError::TransferNotFound(_) => ErrorKind::NotFound,
            TransferError::SenderInactive
            | TransferError::ReceiverInactive
            | TransferError::InsufficientPoints { .. } => ErrorKind::BusinessRule,
            TransferError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            TransferError::Store(_) => ErrorKind::System,
        }
    }

    /// Category used for the HTTP mapping. Same as [`Self::kind`] except
    /// that a missing account on create maps into the validation space;
    /// only a missing transfer record keeps [`ErrorKind::NotFound`].
    fn wire_kind(&self) -> ErrorKind {
        match self {
            TransferError::SenderNotFound(_) | TransferError::ReceiverNotFound(_) => {
                ErrorKind::Validation
            }
            _ => self.kind(),
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self.wire_kind() {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BusinessRule => "BUSINESS_RULE_VIOLATION",
            ErrorKind::InvalidStateTransition => "UNPROCESSABLE",
            ErrorKind::System => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self.wire_kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::BusinessRule => 409,
            ErrorKind::InvalidStateTransition => 422,
            ErrorKind::System => 500,
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        TransferError::Store(e.to_string())
    }
}
