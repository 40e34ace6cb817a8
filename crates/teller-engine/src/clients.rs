//! Client CRUD and transaction orchestration.
//!
//! Every operation follows the same cycle: permission gate → fresh
//! full-file load → locate/mutate/append → full-file persist. A refused
//! gate performs no load at all.

use crate::error::OpError;
use crate::transaction::Transaction;
use teller_auth::{Permissions, Session};
use teller_store::{Client, FileStore};
use tracing::{debug, info};

/// Replacement data for an update.
///
/// The account number is the immutable key and is deliberately absent:
/// everything else is replaced wholesale, matching the interactive
/// update flow that re-collects every field.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientUpdate {
    pub pin: u32,
    pub name: String,
    pub phone_number: String,
    pub balance: f64,
}

/// Result of a confirm-gated removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The tombstone was set and the file rewritten.
    Removed,
    /// The operator declined; nothing was mutated or persisted.
    Aborted,
}

/// Result of a confirm-gated transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionOutcome {
    /// The balance change was applied and persisted.
    Applied { new_balance: f64 },
    /// The operator declined; nothing was mutated or persisted.
    Aborted,
}

/// Permission-gated operations over the client store.
///
/// # Example
///
/// ```no_run
/// use teller_engine::{ClientOps, Permissions, Session};
/// use teller_store::{Client, FileStore};
///
/// # fn main() -> Result<(), teller_engine::OpError> {
/// let ops = ClientOps::new(FileStore::new("CLIENTS.txt"));
/// let session = Session::new("admin", Permissions::FULL_ACCESS);
///
/// ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))?;
/// let outcome = ops.deposit(&session, "A1", 50.0, |_balance| true)?;
/// # let _ = outcome;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientOps {
    store: FileStore<Client>,
}

impl ClientOps {
    /// Creates the orchestration layer over a client store.
    #[must_use]
    pub fn new(store: FileStore<Client>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &FileStore<Client> {
        &self.store
    }

    /// Adds a new client after checking key uniqueness against the
    /// freshly loaded snapshot.
    ///
    /// # Errors
    ///
    /// [`OpError::EmptyKey`] for an empty account number,
    /// [`OpError::DuplicateKey`] when the account number already exists
    /// (the caller re-prompts), plus the usual gate and store errors.
    pub fn add(&self, session: &Session, client: Client) -> Result<(), OpError> {
        session.require(Permissions::ADD_CLIENT, "add client")?;

        if client.account_number.is_empty() {
            return Err(OpError::EmptyKey);
        }

        let clients = self.store.load_all()?;
        if FileStore::find_index(&clients, &client.account_number).is_some() {
            return Err(OpError::DuplicateKey(client.account_number));
        }

        info!(account = %client.account_number, "adding client");
        self.store.append(&client)?;
        Ok(())
    }

    /// Returns every client in the store, in file order.
    pub fn list(&self, session: &Session) -> Result<Vec<Client>, OpError> {
        session.require(Permissions::LIST_CLIENTS, "list clients")?;
        Ok(self.store.load_all()?)
    }

    /// Looks up one client by account number.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no client matches; the caller
    /// reports it and the program continues.
    pub fn find(&self, session: &Session, account_number: &str) -> Result<Client, OpError> {
        session.require(Permissions::FIND_CLIENT, "find client")?;

        let clients = self.store.load_all()?;
        let index = FileStore::find_index(&clients, account_number)
            .ok_or_else(|| OpError::KeyNotFound(account_number.to_string()))?;
        Ok(clients[index].clone())
    }

    /// Updates a client in place.
    ///
    /// `decide` receives the current record and returns the replacement
    /// data, or `None` to abort without mutation. The account number is
    /// immutable; only pin, name, phone number, and balance change.
    ///
    /// Returns the updated record, or `None` when the caller declined.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no client matches.
    pub fn update(
        &self,
        session: &Session,
        account_number: &str,
        decide: impl FnOnce(&Client) -> Option<ClientUpdate>,
    ) -> Result<Option<Client>, OpError> {
        session.require(Permissions::UPDATE_CLIENT, "update client")?;

        let mut clients = self.store.load_all()?;
        let index = FileStore::find_index(&clients, account_number)
            .ok_or_else(|| OpError::KeyNotFound(account_number.to_string()))?;

        let Some(update) = decide(&clients[index]) else {
            debug!(account = %account_number, "update declined");
            return Ok(None);
        };

        let client = &mut clients[index];
        client.pin = update.pin;
        client.name = update.name;
        client.phone_number = update.phone_number;
        client.balance = update.balance;
        let updated = client.clone();

        info!(account = %account_number, "updating client");
        self.store.persist_all(&clients)?;
        Ok(Some(updated))
    }

    /// Tombstones a client behind a confirm gate.
    ///
    /// `confirm` receives the located record (so the caller can show it)
    /// and returns the confirmation decision. Declining aborts with no
    /// mutation and no persist. On confirmation the tombstone is set and
    /// the full list rewritten, physically dropping the record.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no client matches.
    pub fn remove(
        &self,
        session: &Session,
        account_number: &str,
        confirm: impl FnOnce(&Client) -> bool,
    ) -> Result<RemoveOutcome, OpError> {
        session.require(Permissions::REMOVE_CLIENT, "remove client")?;

        let mut clients = self.store.load_all()?;
        let index = FileStore::find_index(&clients, account_number)
            .ok_or_else(|| OpError::KeyNotFound(account_number.to_string()))?;

        if !confirm(&clients[index]) {
            debug!(account = %account_number, "removal declined");
            return Ok(RemoveOutcome::Aborted);
        }

        clients[index].is_deleted = true;
        info!(account = %account_number, "removing client");
        self.store.persist_all(&clients)?;
        Ok(RemoveOutcome::Removed)
    }

    /// Runs a transaction through the fixed validate → confirm → apply
    /// ordering.
    ///
    /// `confirm` receives the current balance and returns the
    /// confirmation decision; it is only consulted after the amount has
    /// validated, so the operator never confirms an invalid amount.
    /// Declining aborts with no mutation and no persist. The balance is
    /// never written in a negative state.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no client matches,
    /// [`OpError::InvalidAmount`] when validation rejects the amount
    /// (the caller re-prompts).
    pub fn transact(
        &self,
        session: &Session,
        account_number: &str,
        transaction: Transaction,
        confirm: impl FnOnce(f64) -> bool,
    ) -> Result<TransactionOutcome, OpError> {
        session.require(Permissions::TRANSACTIONS, "transactions")?;

        let mut clients = self.store.load_all()?;
        let index = FileStore::find_index(&clients, account_number)
            .ok_or_else(|| OpError::KeyNotFound(account_number.to_string()))?;

        let balance = clients[index].balance;
        transaction.validate(balance)?;

        if !confirm(balance) {
            debug!(account = %account_number, %transaction, "transaction declined");
            return Ok(TransactionOutcome::Aborted);
        }

        let new_balance = transaction.apply(balance);
        clients[index].balance = new_balance;

        info!(account = %account_number, %transaction, new_balance, "applying transaction");
        self.store.persist_all(&clients)?;
        Ok(TransactionOutcome::Applied { new_balance })
    }

    /// Deposit convenience wrapper over [`transact`](Self::transact).
    ///
    /// # Errors
    ///
    /// As [`transact`](Self::transact), plus
    /// [`OpError::InvalidAmount`] for a non-positive amount.
    pub fn deposit(
        &self,
        session: &Session,
        account_number: &str,
        amount: f64,
        confirm: impl FnOnce(f64) -> bool,
    ) -> Result<TransactionOutcome, OpError> {
        let tx = Transaction::deposit(amount)?;
        self.transact(session, account_number, tx, confirm)
    }

    /// Withdrawal convenience wrapper over [`transact`](Self::transact).
    ///
    /// # Errors
    ///
    /// As [`transact`](Self::transact), plus
    /// [`OpError::InvalidAmount`] for a non-positive amount.
    pub fn withdraw(
        &self,
        session: &Session,
        account_number: &str,
        amount: f64,
        confirm: impl FnOnce(f64) -> bool,
    ) -> Result<TransactionOutcome, OpError> {
        let tx = Transaction::withdraw(amount)?;
        self.transact(session, account_number, tx, confirm)
    }

    /// Sums the balances of every client in the store.
    ///
    /// The report reads the same snapshot as [`list`](Self::list) and is
    /// gated by the same capability; it moves no money.
    pub fn total_balances(&self, session: &Session) -> Result<f64, OpError> {
        session.require(Permissions::LIST_CLIENTS, "total balances")?;

        let clients = self.store.load_all()?;
        Ok(clients.iter().map(|c| c.balance).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ops() -> (ClientOps, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let ops = ClientOps::new(FileStore::new(temp.path().join("CLIENTS.txt")));
        (ops, temp)
    }

    fn admin() -> Session {
        Session::new("admin", Permissions::FULL_ACCESS)
    }

    #[test]
    fn add_then_find() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let found = ops.find(&session, "A1").expect("find");
        assert_eq!(found.name, "Jo");
        assert_eq!(found.balance, 100.0);
    }

    #[test]
    fn add_duplicate_key_is_rejected_and_store_unchanged() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("first add");
        let err = ops
            .add(&session, Client::new("A1", 1, "Other", "556", 0.0))
            .expect_err("duplicate key");

        assert!(matches!(err, OpError::DuplicateKey(ref k) if k == "A1"));

        let clients = ops.list(&session).expect("list");
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].name, "Jo");
    }

    #[test]
    fn add_empty_key_is_rejected() {
        let (ops, _temp) = ops();
        let err = ops
            .add(&admin(), Client::new("", 1, "x", "y", 0.0))
            .expect_err("empty key");
        assert!(matches!(err, OpError::EmptyKey));
    }

    #[test]
    fn gate_refusal_is_side_effect_free() {
        let (ops, _temp) = ops();
        let session = Session::new("jo", Permissions::FIND_CLIENT);

        let err = ops
            .add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect_err("no ADD_CLIENT capability");
        assert!(matches!(err, OpError::AccessDenied(_)));

        // Nothing was created: a denied add never touches the file.
        assert!(!ops.store().path().exists());
    }

    #[test]
    fn find_unknown_key_is_not_found() {
        let (ops, _temp) = ops();
        let err = ops.find(&admin(), "missing").expect_err("no such key");
        assert!(matches!(err, OpError::KeyNotFound(ref k) if k == "missing"));
    }

    #[test]
    fn update_replaces_everything_but_the_key() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let updated = ops
            .update(&session, "A1", |current| {
                assert_eq!(current.name, "Jo");
                Some(ClientUpdate {
                    pin: 4321,
                    name: "Joanna".to_string(),
                    phone_number: "556".to_string(),
                    balance: 250.0,
                })
            })
            .expect("update")
            .expect("confirmed");

        assert_eq!(updated.account_number, "A1");
        assert_eq!(updated.pin, 4321);

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.name, "Joanna");
        assert_eq!(reloaded.balance, 250.0);
    }

    #[test]
    fn declined_update_persists_nothing() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let outcome = ops.update(&session, "A1", |_| None).expect("update call");
        assert!(outcome.is_none());

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.name, "Jo");
    }

    #[test]
    fn remove_tombstones_after_confirmation() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let outcome = ops
            .remove(&session, "A1", |client| {
                assert_eq!(client.account_number, "A1");
                true
            })
            .expect("remove");
        assert_eq!(outcome, RemoveOutcome::Removed);

        // Invisible to every subsequent load.
        let err = ops.find(&session, "A1").expect_err("tombstoned");
        assert!(matches!(err, OpError::KeyNotFound(_)));
        assert!(ops.list(&session).expect("list").is_empty());
    }

    #[test]
    fn declined_remove_leaves_record_live() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let outcome = ops.remove(&session, "A1", |_| false).expect("remove call");
        assert_eq!(outcome, RemoveOutcome::Aborted);
        assert!(ops.find(&session, "A1").is_ok());
    }

    #[test]
    fn deposit_applies_and_persists() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let outcome = ops
            .deposit(&session, "A1", 50.0, |balance| {
                assert_eq!(balance, 100.0);
                true
            })
            .expect("deposit");
        assert_eq!(
            outcome,
            TransactionOutcome::Applied { new_balance: 150.0 }
        );

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.balance, 150.0);
    }

    #[test]
    fn overdraw_is_rejected_before_confirmation() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let err = ops
            .withdraw(&session, "A1", 200.0, |_| {
                panic!("confirm must not run for an invalid amount")
            })
            .expect_err("exceeds balance");
        assert!(matches!(
            err,
            OpError::InvalidAmount(crate::InvalidAmount::ExceedsBalance { .. })
        ));

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.balance, 100.0, "balance unchanged after rejection");
    }

    #[test]
    fn declined_transaction_persists_nothing() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let outcome = ops
            .withdraw(&session, "A1", 40.0, |_| false)
            .expect("withdraw call");
        assert_eq!(outcome, TransactionOutcome::Aborted);

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.balance, 100.0);
    }

    #[test]
    fn total_balances_sums_the_snapshot() {
        let (ops, _temp) = ops();
        let session = admin();

        ops.add(&session, Client::new("A1", 1, "a", "1", 100.0))
            .expect("add");
        ops.add(&session, Client::new("B2", 2, "b", "2", 250.5))
            .expect("add");

        assert_eq!(ops.total_balances(&session).expect("sum"), 350.5);
    }

    #[test]
    fn total_balances_is_a_listing_capability() {
        let (ops, _temp) = ops();
        ops.add(&admin(), Client::new("A1", 1, "a", "1", 100.0))
            .expect("add");

        // The report follows LIST_CLIENTS, not TRANSACTIONS.
        let lister = Session::new("lister", Permissions::LIST_CLIENTS);
        assert_eq!(ops.total_balances(&lister).expect("sum"), 100.0);

        let teller = Session::new("teller", Permissions::TRANSACTIONS);
        assert!(matches!(
            ops.total_balances(&teller),
            Err(OpError::AccessDenied(_))
        ));
    }

    #[test]
    fn transactions_gate_does_not_accept_other_capabilities() {
        let (ops, _temp) = ops();
        let session = Session::new("jo", Permissions::FIND_CLIENT | Permissions::ADD_CLIENT);

        ops.add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
            .expect("add");

        let err = ops
            .deposit(&session, "A1", 10.0, |_| true)
            .expect_err("no TRANSACTIONS capability");
        assert!(matches!(err, OpError::AccessDenied(_)));

        let reloaded = ops.find(&session, "A1").expect("find");
        assert_eq!(reloaded.balance, 100.0);
    }
}
