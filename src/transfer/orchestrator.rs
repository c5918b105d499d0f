//! Transfer Orchestrator
//!
//! Drives one transfer attempt end to end: validation, account eligibility
//! checks, balance mutation and the atomic commit. This is the only
//! component with cross-entity knowledge; accounts and records never talk
//! to the store themselves.
//!
//! Concurrency: the store commit is atomic, but the sufficiency check in
//! step 5 reads balances before the commit writes them. Two concurrent
//! transfers sharing an account could both pass that check against a stale
//! balance, so the orchestrator serializes the read-check-write sequence
//! per account pair. Both account locks are taken lower-id-first, which
//! makes a lock cycle (and therefore deadlock) impossible.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::account::AccountId;
use crate::store::Store;
use crate::transfer::error::TransferError;
use crate::transfer::keygen::KeyGenerator;
use crate::transfer::record::Transfer;

/// Upper bound for the `pageSize` listing parameter.
pub const MAX_PAGE_SIZE: i64 = 200;

/// One page of transfer history plus pagination metadata.
#[derive(Debug, Clone)]
pub struct TransferPage {
    pub data: Vec<Transfer>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Per-account async locks, taken pairwise in ascending id order.
struct AccountLocks {
    table: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    fn handle(&self, id: AccountId) -> Arc<Mutex<()>> {
        self.table.entry(id).or_default().clone()
    }

    /// Lock both accounts, lower id first. Callers guarantee `a != b`.
    async fn lock_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.handle(first).lock_owned().await;
        let second_guard = self.handle(second).lock_owned().await;
        (first_guard, second_guard)
    }
}

/// Coordinates validation, account lookup, balance mutation and state
/// transitions into one logical unit per transfer attempt.
pub struct TransferOrchestrator {
    store: Arc<dyn Store>,
    keygen: Arc<dyn KeyGenerator>,
    locks: AccountLocks,
}

impl TransferOrchestrator {
    pub fn new(store: Arc<dyn Store>, keygen: Arc<dyn KeyGenerator>) -> Self {
        Self {
            store,
            keygen,
            locks: AccountLocks::new(),
        }
    }

    /// Execute one transfer attempt.
    ///
    /// Every call is a new attempt with a freshly minted idempotency key;
    /// callers cannot supply one. Validation and not-found failures leave
    /// no trace; business-rule rejections persist a FAILED record before
    /// surfacing.
    pub async fn create_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: i64,
        note: Option<String>,
    ) -> Result<Transfer, TransferError> {
        // 1-2. Fresh key, PENDING record, structural validation.
        let key = self.keygen.generate();
        let mut transfer = Transfer::new(key, from_account_id, to_account_id, amount, note);
        transfer.validate()?;

        debug!(
            key = %transfer.idempotency_key,
            "transfer validated: {} -> {}, amount {}",
            from_account_id, to_account_id, amount
        );

        // Serialize the read-check-write sequence per account pair.
        let _pair_guard = self.locks.lock_pair(from_account_id, to_account_id).await;

        // 3. Sender must exist and be active.
        let mut sender = self
            .store
            .find_account(from_account_id)
            .await?
            .ok_or(TransferError::SenderNotFound(from_account_id))?;
        if !sender.is_active {
            return self.reject(transfer, TransferError::SenderInactive).await;
        }

        // 4. Receiver must exist and be active.
        let mut receiver = self
            .store
            .find_account(to_account_id)
            .await?
            .ok_or(TransferError::ReceiverNotFound(to_account_id))?;
        if !receiver.is_active {
            return self.reject(transfer, TransferError::ReceiverInactive).await;
        }

        // 5. Sufficiency pre-check; the debit clamp must never be the
        // guard that fires.
        if !sender.can_afford(transfer.amount) {
            let rule = TransferError::InsufficientPoints {
                available: sender.points,
                required: transfer.amount,
            };
            return self.reject(transfer, rule).await;
        }

        // 6. Debit + credit + COMPLETED record as one unit.
        transfer.mark_processing()?;
        sender.debit(transfer.amount);
        receiver.credit(transfer.amount);

        let mut completed = transfer.clone();
        completed.complete()?;

        match self.store.commit_transfer(&sender, &receiver, completed).await {
            Ok(stored) => {
                info!(
                    key = %stored.idempotency_key,
                    transfer_id = ?stored.transfer_id,
                    "transfer completed: {} -> {}, amount {}",
                    from_account_id, to_account_id, amount
                );
                Ok(stored)
            }
            Err(e) => {
                // The commit either landed wholly or not at all, so no
                // partial debit survives; mark the attempt for the audit
                // trail and surface a system error.
                error!(key = %transfer.idempotency_key, "commit failed: {e}");
                transfer.fail(format!("commit failed: {e}"))?;
                if let Err(save_err) = self.store.save_transfer(transfer).await {
                    error!("could not record failed transfer: {save_err}");
                }
                Err(TransferError::from(e))
            }
        }
    }

    /// Pure lookup by idempotency key; never re-executes anything.
    pub async fn get_transfer_by_key(&self, key: &str) -> Result<Transfer, TransferError> {
        self.store
            .find_by_idempotency_key(key)
            .await?
            .ok_or_else(|| TransferError::TransferNotFound(key.to_string()))
    }

    /// Transfer history for one account, most recent first.
    ///
    /// `page` is 1-based; `page_size` must be in `[1, MAX_PAGE_SIZE]`.
    pub async fn list_transfers_for_account(
        &self,
        account_id: AccountId,
        page: i64,
        page_size: i64,
    ) -> Result<TransferPage, TransferError> {
        if page < 1 {
            return Err(TransferError::InvalidPage);
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(TransferError::InvalidPageSize);
        }

        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or(TransferError::InvalidPage)?;
        let (data, total) = self
            .store
            .find_by_account(account_id, offset, page_size)
            .await?;

        Ok(TransferPage {
            data,
            page,
            page_size,
            total,
        })
    }

    /// Persist a FAILED record for a business-rule rejection, then surface
    /// the rule error.
    async fn reject(
        &self,
        mut transfer: Transfer,
        rule: TransferError,
    ) -> Result<Transfer, TransferError> {
        warn!(key = %transfer.idempotency_key, "transfer rejected: {rule}");
        transfer.fail(rule.to_string())?;
        self.store.save_transfer(transfer).await?;
        Err(rule)
    }
}
