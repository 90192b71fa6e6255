//! Change notifier - pushes account snapshots to subscribers.
//!
//! One [`Notifier::run`] loop serves one subscriber:
//!
//! 1. On start, snapshot the ledger and push it right away
//! 2. On every tick, snapshot again and push only if it differs from the
//!    last snapshot that was pushed
//! 3. Stop when cancelled, when a push fails, or when the ledger cannot be read
//!
//! Pushes for one subscriber are strictly sequential. The cancellation future
//! is raced against both the timer wait and the push, so a disconnect or
//! shutdown never waits out a full tick.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::{
    db::{Ledger, StoreError},
    models::account::Account,
};

/// How a snapshot is arranged before it is compared and pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Store order (by account ID).
    Raw,
    /// Highest balance first; ties keep store order.
    Leaderboard,
}

impl View {
    pub fn apply(self, mut accounts: Vec<Account>) -> Snapshot {
        if self == View::Leaderboard {
            accounts.sort_by(|a, b| b.balance.cmp(&a.balance));
        }
        Snapshot(accounts)
    }

    /// Subscription channel name.
    pub fn channel(self) -> &'static str {
        match self {
            View::Raw => "outcomes",
            View::Leaderboard => "leaderboard",
        }
    }
}

/// Accounts captured at one poll tick, already arranged by a [`View`].
///
/// Serializes as a plain JSON array of accounts.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Account>);

impl Snapshot {
    pub fn accounts(&self) -> &[Account] {
        &self.0
    }

    pub fn into_accounts(self) -> Vec<Account> {
        self.0
    }

    /// Field-by-field comparison of the ordered sequence.
    ///
    /// Any difference in membership, order, name or balance counts as a change.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|(a, b)| {
                a.id == b.id && a.name == b.name && a.balance == b.balance
            })
    }
}

/// Why a subscriber loop stopped early.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("couldn't read accounts: {0}")]
    Store(#[from] StoreError),

    #[error("push to subscriber failed: {0}")]
    Push(String),
}

/// Where snapshots are read from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;
}

#[async_trait]
impl SnapshotSource for Ledger {
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.begin(false).await.list_all())
    }
}

/// Where snapshots are pushed to, e.g. one WebSocket connection.
#[async_trait]
pub trait SnapshotSink: Send {
    async fn push(&mut self, snapshot: &Snapshot) -> Result<(), NotifierError>;
}

/// Polls a [`SnapshotSource`] and feeds subscribers.
#[derive(Debug, Clone)]
pub struct Notifier<S = Ledger> {
    source: S,
    interval: Duration,
}

impl<S: SnapshotSource> Notifier<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self { source, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current snapshot under `view`.
    pub async fn snapshot(&self, view: View) -> Result<Snapshot, StoreError> {
        Ok(view.apply(self.source.list_accounts().await?))
    }

    /// Serve one subscriber until `cancelled` resolves or an error occurs.
    ///
    /// Returns `Ok(())` on cancellation. A failed push or a failed ledger read
    /// ends the loop with the corresponding error; neither is retried.
    pub async fn run<K, C>(&self, view: View, sink: &mut K, cancelled: C) -> Result<(), NotifierError>
    where
        K: SnapshotSink + ?Sized,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancelled);

        // The first tick completes immediately, which gives the initial push.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_pushed: Option<Snapshot> = None;

        loop {
            tokio::select! {
                biased;
                _ = &mut cancelled => return Ok(()),
                _ = ticker.tick() => {}
            }

            let snapshot = self.snapshot(view).await?;

            if last_pushed
                .as_ref()
                .is_some_and(|last| last.same_as(&snapshot))
            {
                continue;
            }

            tokio::select! {
                biased;
                _ = &mut cancelled => return Ok(()),
                pushed = sink.push(&snapshot) => pushed?,
            }

            tracing::debug!(
                channel = view.channel(),
                accounts = snapshot.accounts().len(),
                "snapshot pushed"
            );
            last_pushed = Some(snapshot);
        }
    }
}
