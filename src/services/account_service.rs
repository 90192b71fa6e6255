//! Account service - Core business logic for wallet operations.
//!
//! This service handles:
//! - Account creation
//! - Deposits and withdrawals with amount validation
//! - Balance queries
//!
//! # Atomicity Guarantees
//!
//! Every operation runs inside exactly one ledger transaction. Deposits and
//! withdrawals read the balance, check it and write it back inside the same
//! writable transaction, and writable transactions never overlap, so two
//! withdrawals can never both pass the funds check against a stale balance.

use uuid::Uuid;

use crate::{
    db::Ledger,
    error::AppError,
    models::account::Account,
};

/// Wallet operations on top of a [`Ledger`].
#[derive(Debug, Clone)]
pub struct AccountService {
    ledger: Ledger,
    min_amount: i64,
}

impl AccountService {
    /// Build a service over `ledger`.
    ///
    /// `min_amount` is the smallest accepted deposit or withdrawal. Values
    /// below 1 are raised to 1; amounts are always strictly positive.
    pub fn new(ledger: Ledger, min_amount: i64) -> Self {
        Self {
            ledger,
            min_amount: min_amount.max(1),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn min_amount(&self) -> i64 {
        self.min_amount
    }

    /// Open a new account with a zero balance and return its ID.
    ///
    /// # Errors
    ///
    /// - `Validation`: name is empty or whitespace
    pub async fn create(&self, name: &str) -> Result<Uuid, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_field("name", "cannot be blank"));
        }

        let account = Account::open(name);
        let id = account.id;

        let mut txn = self.ledger.begin(true).await;
        txn.insert(account)?;
        txn.commit();

        tracing::info!(account_id = %id, "account created");
        Ok(id)
    }

    /// Add `amount` to the account balance.
    ///
    /// # Errors
    ///
    /// - `Validation`: amount is zero, below the minimum, or would overflow the balance
    /// - `AccountNotFound`: no such account
    pub async fn deposit(&self, id: Uuid, amount: i64) -> Result<(), AppError> {
        self.validate_amount(amount)?;

        let mut txn = self.ledger.begin(true).await;
        let mut account = txn.get_by_id(id)?;

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::invalid_field("amount", "would overflow balance"))?;
        let balance = account.balance;

        txn.insert(account)?;
        txn.commit();

        tracing::debug!(account_id = %id, amount, balance, "deposit applied");
        Ok(())
    }

    /// Take `amount` from the account balance.
    ///
    /// # Errors
    ///
    /// - `Validation`: amount is zero or below the minimum
    /// - `AccountNotFound`: no such account
    /// - `InsufficientFunds`: balance is lower than `amount`; nothing is changed
    pub async fn withdraw(&self, id: Uuid, amount: i64) -> Result<(), AppError> {
        self.validate_amount(amount)?;

        let mut txn = self.ledger.begin(true).await;
        let mut account = txn.get_by_id(id)?;

        // Dropping `txn` on this path aborts it.
        if account.balance < amount {
            return Err(AppError::InsufficientFunds);
        }

        account.balance -= amount;
        let balance = account.balance;

        txn.insert(account)?;
        txn.commit();

        tracing::debug!(account_id = %id, amount, balance, "withdrawal applied");
        Ok(())
    }

    /// Current balance of the account.
    pub async fn get_balance(&self, id: Uuid) -> Result<i64, AppError> {
        let txn = self.ledger.begin(false).await;
        Ok(txn.get_by_id(id)?.balance)
    }

    /// Snapshot of every account, ordered by ID.
    pub async fn list_all(&self) -> Result<Vec<Account>, AppError> {
        let txn = self.ledger.begin(false).await;
        Ok(txn.list_all())
    }

    fn validate_amount(&self, amount: i64) -> Result<(), AppError> {
        if amount == 0 {
            return Err(AppError::invalid_field("amount", "cannot be blank"));
        }
        if amount < self.min_amount {
            return Err(AppError::invalid_field(
                "amount",
                format!("must be no less than {}", self.min_amount),
            ));
        }
        Ok(())
    }
}
