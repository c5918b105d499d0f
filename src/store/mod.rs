//! Persistence Boundary
//!
//! The orchestrator talks to storage exclusively through the traits in this
//! module. Two backends ship with the crate: [`MemoryStore`] for tests and
//! local runs, [`PgStore`] for PostgreSQL.
//!
//! The critical contract is [`Store::commit_transfer`]: the sender debit,
//! the receiver credit and the completed transfer row land as one unit or
//! not at all. Backends that cannot provide that natively must not
//! implement [`Store`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::account::{Account, AccountId};
use crate::transfer::Transfer;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store-boundary error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate idempotency key: {0}")]
    DuplicateKey(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account lookup and persistence.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Insert or update an account, returning the stored value.
    async fn save_account(&self, account: Account) -> StoreResult<Account>;
}

/// Transfer record persistence and lookup.
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Persist a record, assigning `transfer_id` on first save.
    async fn save_transfer(&self, transfer: Transfer) -> StoreResult<Transfer>;

    async fn find_by_idempotency_key(&self, key: &str) -> StoreResult<Option<Transfer>>;

    /// Records where the account is sender or receiver, most recent first,
    /// plus the total matching count.
    async fn find_by_account(
        &self,
        account_id: AccountId,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Transfer>, i64)>;
}

/// Full persistence capability consumed by the orchestrator.
#[async_trait]
pub trait Store: AccountStore + TransferStore {
    /// Persist the sender debit, receiver credit and the transfer record as
    /// one unit: either all three writes land or none do.
    ///
    /// The passed accounts carry the post-mutation balances; `transfer` is
    /// expected to already be in its final status.
    async fn commit_transfer(
        &self,
        sender: &Account,
        receiver: &Account,
        transfer: Transfer,
    ) -> StoreResult<Transfer>;

    /// Cheap backend round trip for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}
