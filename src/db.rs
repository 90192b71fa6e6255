//! In-memory ledger store.
//!
//! This module provides:
//! - `Ledger`: a cheap-to-clone handle on the account table
//! - `Transaction`: the only way to read or change accounts
//!
//! # Consistency Model
//!
//! The committed table is an immutable `Arc<BTreeMap>`. A transaction keeps
//! the `Arc` it saw at start, so readers observe one consistent snapshot no
//! matter what commits afterwards, and they never wait on each other or on a
//! writer.
//!
//! Writable transactions first take an owned async mutex guard, so at most one
//! of them exists at a time. Writes go to a private copy of the table
//! (`Arc::make_mut` clones on the first write only), and `commit` swaps that
//! copy in as the new committed table. Dropping a transaction without
//! committing discards the copy and releases the guard, so `?` early returns
//! abort cleanly.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::account::Account;

type Table = BTreeMap<Uuid, Account>;

/// Ledger store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No account with this ID exists in the transaction's view.
    #[error("account {0} not found")]
    NotFound(Uuid),

    /// A write was attempted through a read-only transaction.
    #[error("write attempted on a read-only transaction")]
    ReadOnly,
}

/// Handle on the shared account table.
///
/// Clones share the same table. Every component receives its own clone at
/// construction; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    inner: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    /// Last committed table. The lock is held only to clone or swap the `Arc`.
    committed: RwLock<Arc<Table>>,

    /// Held by the single open writable transaction.
    writer: Arc<Mutex<()>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction.
    ///
    /// A writable transaction waits (asynchronously) until any other writable
    /// transaction has finished. A read-only one never waits.
    pub async fn begin(&self, writable: bool) -> Transaction {
        let writer = if writable {
            Some(Arc::clone(&self.inner.writer).lock_owned().await)
        } else {
            None
        };

        // Taken after the writer guard so a writer starts from the latest commit.
        let table = self.inner.committed.read().clone();

        Transaction {
            shared: Arc::clone(&self.inner),
            table,
            writer,
        }
    }

    /// Number of committed accounts.
    pub fn account_count(&self) -> usize {
        self.inner.committed.read().len()
    }
}

/// A scoped unit of access to the ledger.
///
/// Dropping it without calling [`Transaction::commit`] leaves the store
/// untouched.
#[derive(Debug)]
pub struct Transaction {
    shared: Arc<Shared>,
    table: Arc<Table>,
    writer: Option<OwnedMutexGuard<()>>,
}

impl Transaction {
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Look up an account. A writable transaction sees its own pending writes.
    pub fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        self.table
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Insert or replace the account with `account.id`.
    pub fn insert(&mut self, account: Account) -> Result<(), StoreError> {
        if !self.is_writable() {
            return Err(StoreError::ReadOnly);
        }

        Arc::make_mut(&mut self.table).insert(account.id, account);
        Ok(())
    }

    /// All accounts, ordered by ID.
    pub fn list_all(&self) -> Vec<Account> {
        self.table.values().cloned().collect()
    }

    /// Publish pending writes atomically, then release the writer guard.
    ///
    /// Committing a read-only transaction just ends it.
    pub fn commit(self) {
        let Transaction {
            shared,
            table,
            writer,
        } = self;

        if writer.is_some() {
            *shared.committed.write() = table;
        }
        // `writer` drops here, after the swap.
    }

    /// Discard the transaction. Same as dropping it.
    pub fn abort(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn seeded(name: &str, balance: i64) -> (Ledger, Uuid) {
        let ledger = Ledger::new();
        let mut account = Account::open(name);
        account.balance = balance;
        let id = account.id;

        let mut txn = ledger.begin(true).await;
        txn.insert(account).unwrap();
        txn.commit();

        (ledger, id)
    }

    #[tokio::test]
    async fn commit_makes_writes_visible() {
        let (ledger, id) = seeded("Alex", 42).await;

        let txn = ledger.begin(false).await;
        let account = txn.get_by_id(id).unwrap();
        assert_eq!(account.name, "Alex");
        assert_eq!(account.balance, 42);
        assert_eq!(ledger.account_count(), 1);
    }

    #[tokio::test]
    async fn dropped_transaction_has_no_effect() {
        let (ledger, id) = seeded("Alex", 42).await;

        {
            let mut txn = ledger.begin(true).await;
            let mut account = txn.get_by_id(id).unwrap();
            account.balance = 0;
            txn.insert(account).unwrap();
            txn.insert(Account::open("Ghost")).unwrap();
        }

        let txn = ledger.begin(false).await;
        assert_eq!(txn.get_by_id(id).unwrap().balance, 42);
        assert_eq!(txn.list_all().len(), 1);
    }

    #[tokio::test]
    async fn writer_sees_its_own_writes() {
        let (ledger, id) = seeded("Alex", 42).await;

        let mut txn = ledger.begin(true).await;
        let mut account = txn.get_by_id(id).unwrap();
        account.balance += 8;
        txn.insert(account).unwrap();

        assert_eq!(txn.get_by_id(id).unwrap().balance, 50);

        // Not yet visible outside.
        let reader = ledger.begin(false).await;
        assert_eq!(reader.get_by_id(id).unwrap().balance, 42);
        txn.abort();
    }

    #[tokio::test]
    async fn reader_keeps_its_snapshot_across_commits() {
        let (ledger, id) = seeded("Alex", 42).await;

        let reader = ledger.begin(false).await;

        let mut txn = ledger.begin(true).await;
        let mut account = txn.get_by_id(id).unwrap();
        account.balance = 7;
        txn.insert(account).unwrap();
        txn.insert(Account::open("Sam")).unwrap();
        txn.commit();

        assert_eq!(reader.get_by_id(id).unwrap().balance, 42);
        assert_eq!(reader.list_all().len(), 1);

        let fresh = ledger.begin(false).await;
        assert_eq!(fresh.get_by_id(id).unwrap().balance, 7);
        assert_eq!(fresh.list_all().len(), 2);
    }

    #[tokio::test]
    async fn read_only_rejects_insert() {
        let ledger = Ledger::new();
        let mut txn = ledger.begin(false).await;

        assert!(!txn.is_writable());
        assert_eq!(txn.insert(Account::open("Alex")), Err(StoreError::ReadOnly));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let ledger = Ledger::new();
        let txn = ledger.begin(false).await;
        let id = Uuid::new_v4();

        assert_eq!(txn.get_by_id(id), Err(StoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn writers_are_serialized() {
        let ledger = Ledger::new();
        let first = ledger.begin(true).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), ledger.begin(true)).await;
        assert!(blocked.is_err(), "second writer must wait for the first");

        // Readers are not held up by the open writer.
        let reader = tokio::time::timeout(Duration::from_millis(50), ledger.begin(false)).await;
        assert!(reader.is_ok());

        first.commit();
        let second = tokio::time::timeout(Duration::from_millis(50), ledger.begin(true)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let ledger = Ledger::new();
        let mut txn = ledger.begin(true).await;
        for name in ["a", "b", "c", "d", "e"] {
            txn.insert(Account::open(name)).unwrap();
        }
        txn.commit();

        let ids: Vec<Uuid> = ledger
            .begin(false)
            .await
            .list_all()
            .into_iter()
            .map(|a| a.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
