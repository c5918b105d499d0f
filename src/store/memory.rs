//! In-memory store backend
//!
//! Single-process reference implementation of the store contract, used by
//! the test suite and by local runs without PostgreSQL. One mutex guards
//! the whole dataset, which makes `commit_transfer` trivially atomic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::account::{Account, AccountId};
use crate::store::{AccountStore, Store, StoreError, StoreResult, TransferStore};
use crate::transfer::Transfer;

#[derive(Default)]
struct MemoryInner {
    accounts: HashMap<AccountId, Account>,
    /// Insertion order doubles as creation order.
    transfers: Vec<Transfer>,
    by_key: HashMap<String, usize>,
    next_transfer_id: i64,
}

impl MemoryInner {
    fn store_transfer(&mut self, mut transfer: Transfer) -> StoreResult<Transfer> {
        match transfer.transfer_id {
            Some(id) => {
                // Update of an already-persisted record.
                let idx = self
                    .transfers
                    .iter()
                    .position(|t| t.transfer_id == Some(id))
                    .ok_or_else(|| StoreError::Corrupt(format!("unknown transfer_id {id}")))?;
                self.transfers[idx] = transfer.clone();
                Ok(transfer)
            }
            None => {
                if self.by_key.contains_key(&transfer.idempotency_key) {
                    return Err(StoreError::DuplicateKey(transfer.idempotency_key));
                }
                self.next_transfer_id += 1;
                transfer.transfer_id = Some(self.next_transfer_id);
                self.by_key
                    .insert(transfer.idempotency_key.clone(), self.transfers.len());
                self.transfers.push(transfer.clone());
                Ok(transfer)
            }
        }
    }
}

/// Mutex-guarded in-memory dataset implementing the full store contract.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for tests and demo seeding.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            for account in accounts {
                inner.accounts.insert(account.id, account);
            }
        }
        store
    }

    /// Number of stored transfer records (test helper).
    pub fn transfer_count(&self) -> usize {
        self.inner.lock().unwrap().transfers.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.inner.lock().unwrap().accounts.get(&id).cloned())
    }

    async fn save_account(&self, account: Account) -> StoreResult<Account> {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn save_transfer(&self, transfer: Transfer) -> StoreResult<Transfer> {
        self.inner.lock().unwrap().store_transfer(transfer)
    }

    async fn find_by_idempotency_key(&self, key: &str) -> StoreResult<Option<Transfer>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .by_key
            .get(key)
            .map(|&idx| inner.transfers[idx].clone()))
    }

    async fn find_by_account(
        &self,
        account_id: AccountId,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Transfer>, i64)> {
        let inner = self.inner.lock().unwrap();
        // Reverse insertion order == most recent first.
        let matching: Vec<&Transfer> = inner
            .transfers
            .iter()
            .rev()
            .filter(|t| t.involves_account(account_id))
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn commit_transfer(
        &self,
        sender: &Account,
        receiver: &Account,
        transfer: Transfer,
    ) -> StoreResult<Transfer> {
        // One lock scope: all three writes become visible together.
        let mut inner = self.inner.lock().unwrap();
        let stored = inner.store_transfer(transfer)?;
        inner.accounts.insert(sender.id, sender.clone());
        inner.accounts.insert(receiver.id, receiver.clone());
        Ok(stored)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
