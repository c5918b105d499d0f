//! Transfer Lifecycle States
//!
//! State IDs are designed for PostgreSQL storage as SMALLINT.
//! Wire format is the lowercase name (`"pending"`, `"completed"`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle states of a transfer record.
///
/// Terminal states: COMPLETED (20), REVERSED (30), FAILED (-10), CANCELLED (-20).
/// COMPLETED is terminal for the forward flow but may still be reversed,
/// which is why [`Transfer::reverse`](crate::transfer::Transfer::reverse)
/// accepts it while every other transition rejects terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum TransferStatus {
    /// Initial state - request recorded, nothing moved yet
    Pending = 0,

    /// Points movement in progress (never persisted; in-memory only)
    Processing = 10,

    /// Terminal: points moved, transfer settled
    Completed = 20,

    /// Terminal: a settled transfer was compensated afterwards
    Reversed = 30,

    /// Terminal: rejected by a business rule or a commit error
    Failed = -10,

    /// Terminal: withdrawn before settlement
    Cancelled = -20,
}

impl TransferStatus {
    /// Check if this is a final state (no further forward transitions).
    ///
    /// Note: COMPLETED is final yet remains eligible for reversal.
    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TransferStatus::Completed
                | TransferStatus::Reversed
                | TransferStatus::Failed
                | TransferStatus::Cancelled
        )
    }

    /// Get the numeric state ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL state ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransferStatus::Pending),
            10 => Some(TransferStatus::Processing),
            20 => Some(TransferStatus::Completed),
            30 => Some(TransferStatus::Reversed),
            -10 => Some(TransferStatus::Failed),
            -20 => Some(TransferStatus::Cancelled),
            _ => None,
        }
    }

    /// Lowercase state name, identical to the JSON wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Processing => "processing",
            TransferStatus::Completed => "completed",
            TransferStatus::Reversed => "reversed",
            TransferStatus::Failed => "failed",
            TransferStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for TransferStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        TransferStatus::from_id(value).ok_or(())
    }
}
