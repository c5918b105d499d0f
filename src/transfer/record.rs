//! Transfer Record and Lifecycle Transitions
//!
//! One record tracks one transfer attempt from submission to a terminal
//! state. Records are append-mostly: they are never deleted, and only the
//! transition methods below may mutate one after construction.
//!
//! ```text
//!   PENDING ──> PROCESSING ──> COMPLETED ──> REVERSED
//!      │             │             x
//!      ├──> FAILED <─┤         (cancel refused)
//!      └──> CANCELLED (from any state except COMPLETED)
//! ```
//!
//! Every transition bumps `updated_at`. `completed_at` is set only by
//! [`Transfer::complete`], `fail_reason` only by [`Transfer::fail`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::AccountId;
use crate::transfer::error::TransferError;
use crate::transfer::status::TransferStatus;

/// Maximum characters allowed in a transfer note.
pub const MAX_NOTE_LEN: usize = 512;

/// One transfer attempt.
///
/// `transfer_id` is assigned by the store on first persistence and is
/// absent before that. `idempotency_key` is assigned at construction and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub idempotency_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<i64>,
    #[schema(example = 1)]
    pub from_account_id: AccountId,
    #[schema(example = 2)]
    pub to_account_id: AccountId,
    #[schema(example = 30)]
    pub amount: i64,
    pub status: TransferStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
}

impl Transfer {
    /// Create a new attempt in PENDING. Nothing is validated here; call
    /// [`Transfer::validate`] before acting on the record.
    pub fn new(
        idempotency_key: impl Into<String>,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: i64,
        note: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            idempotency_key: idempotency_key.into(),
            transfer_id: None,
            from_account_id,
            to_account_id,
            amount,
            status: TransferStatus::Pending,
            note,
            created_at: now,
            updated_at: now,
            completed_at: None,
            fail_reason: None,
        }
    }

    /// Check the structural invariants: positive ids, distinct parties,
    /// positive amount, note within bounds.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.from_account_id <= 0 {
            return Err(TransferError::InvalidSenderId);
        }
        if self.to_account_id <= 0 {
            return Err(TransferError::InvalidReceiverId);
        }
        if self.from_account_id == self.to_account_id {
            return Err(TransferError::SameAccount);
        }
        if self.amount <= 0 {
            return Err(TransferError::InvalidAmount);
        }
        if let Some(ref note) = self.note {
            if note.chars().count() > MAX_NOTE_LEN {
                return Err(TransferError::NoteTooLong);
            }
        }
        Ok(())
    }

    /// PENDING -> PROCESSING
    pub fn mark_processing(&mut self) -> Result<(), TransferError> {
        if self.status != TransferStatus::Pending {
            return Err(self.illegal("process"));
        }
        self.status = TransferStatus::Processing;
        self.touch();
        Ok(())
    }

    /// PENDING | PROCESSING -> COMPLETED, stamping `completed_at`.
    pub fn complete(&mut self) -> Result<(), TransferError> {
        if !matches!(
            self.status,
            TransferStatus::Pending | TransferStatus::Processing
        ) {
            return Err(self.illegal("complete"));
        }
        self.status = TransferStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.touch();
        Ok(())
    }

    /// Any non-final state -> FAILED, recording `fail_reason`.
    ///
    /// Does not undo balance mutations; the orchestrator only calls this
    /// before the commit has landed.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransferError> {
        if self.status.is_final() {
            return Err(self.illegal("fail"));
        }
        self.status = TransferStatus::Failed;
        self.fail_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    /// Any state except COMPLETED -> CANCELLED.
    pub fn cancel(&mut self) -> Result<(), TransferError> {
        if self.status == TransferStatus::Completed {
            return Err(self.illegal("cancel"));
        }
        self.status = TransferStatus::Cancelled;
        self.touch();
        Ok(())
    }

    /// COMPLETED -> REVERSED, the one transition allowed out of a final
    /// state.
    pub fn reverse(&mut self) -> Result<(), TransferError> {
        if self.status != TransferStatus::Completed {
            return Err(self.illegal("reverse"));
        }
        self.status = TransferStatus::Reversed;
        self.touch();
        Ok(())
    }

    /// True once the record reached COMPLETED, REVERSED, FAILED or
    /// CANCELLED.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }

    /// True if `account_id` is either party of this transfer.
    #[inline]
    pub fn involves_account(&self, account_id: AccountId) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn illegal(&self, action: &'static str) -> TransferError {
        TransferError::InvalidStateTransition {
            from: self.status,
            action,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer[key={}, id={:?}, {} -> {}, amount={}, status={}]",
            self.idempotency_key,
            self.transfer_id,
            self.from_account_id,
            self.to_account_id,
            self.amount,
            self.status
        )
    }
}
