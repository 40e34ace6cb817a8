//! End-to-end flows over real files: login, gated CRUD, transactions,
//! and persistence across separate store handles.

use teller_engine::{
    authenticate, ensure_bootstrap_admin, Client, ClientOps, ClientUpdate, FileStore, OpError,
    Permissions, RemoveOutcome, Session, TransactionOutcome, User, UserOps, UserUpdate,
};
use tempfile::TempDir;

struct Fixture {
    clients: ClientOps,
    users: UserOps,
    _temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        Self {
            clients: ClientOps::new(FileStore::new(temp.path().join("CLIENTS.txt"))),
            users: UserOps::new(FileStore::new(temp.path().join("USERS.txt"))),
            _temp: temp,
        }
    }
}

fn admin() -> Session {
    Session::new("admin", Permissions::FULL_ACCESS)
}

#[test]
fn fresh_install_bootstrap_then_full_working_day() {
    let fx = Fixture::new();

    // Empty user store: seed the bootstrap administrator and log in.
    assert!(ensure_bootstrap_admin(fx.users.store()).expect("seed"));
    let session = authenticate(fx.users.store(), "admin", 9999).expect("login");
    assert!(session.is_administrator());

    // Add two clients, run a deposit and a withdrawal.
    fx.clients
        .add(&session, Client::new("A150", 1234, "Mohammed", "0100", 4000.0))
        .expect("add A150");
    fx.clients
        .add(&session, Client::new("A151", 5678, "Sara", "0101", 1500.0))
        .expect("add A151");

    let outcome = fx
        .clients
        .deposit(&session, "A150", 600.0, |_| true)
        .expect("deposit");
    assert_eq!(outcome, TransactionOutcome::Applied { new_balance: 4600.0 });

    let outcome = fx
        .clients
        .withdraw(&session, "A151", 1500.0, |_| true)
        .expect("withdraw to zero");
    assert_eq!(outcome, TransactionOutcome::Applied { new_balance: 0.0 });

    assert_eq!(fx.clients.total_balances(&session).expect("sum"), 4600.0);

    // A separate handle over the same file sees everything.
    let reopened = ClientOps::new(FileStore::new(fx.clients.store().path()));
    let all = reopened.list(&session).expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].balance, 4600.0);
    assert_eq!(all[1].balance, 0.0);
}

#[test]
fn restricted_teller_is_gated_out_of_everything_but_their_grants() {
    let fx = Fixture::new();
    let root = admin();

    fx.users
        .add(
            &root,
            User::new("teller1", 1111, Permissions::FIND_CLIENT | Permissions::TRANSACTIONS),
        )
        .expect("create teller");
    fx.clients
        .add(&root, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("seed client");

    let session = authenticate(fx.users.store(), "teller1", 1111).expect("login");

    // Granted: find and transactions.
    assert!(fx.clients.find(&session, "A1").is_ok());
    assert!(fx.clients.deposit(&session, "A1", 10.0, |_| true).is_ok());

    // Denied: everything else, with no side effects.
    assert!(matches!(
        fx.clients.add(&session, Client::new("B2", 1, "x", "y", 0.0)),
        Err(OpError::AccessDenied(_))
    ));
    assert!(matches!(
        fx.clients.list(&session),
        Err(OpError::AccessDenied(_))
    ));
    assert!(matches!(
        fx.clients.remove(&session, "A1", |_| true),
        Err(OpError::AccessDenied(_))
    ));
    assert!(matches!(
        fx.users.list(&session),
        Err(OpError::AccessDenied(_))
    ));

    // The denied add left no trace.
    assert!(matches!(
        fx.clients.find(&session, "B2"),
        Err(OpError::KeyNotFound(_))
    ));
}

#[test]
fn removal_tombstone_survives_reload_and_frees_the_key() {
    let fx = Fixture::new();
    let session = admin();

    fx.clients
        .add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("add");
    fx.clients
        .add(&session, Client::new("B2", 5678, "Sam", "556", 50.0))
        .expect("add");

    let outcome = fx
        .clients
        .remove(&session, "A1", |_| true)
        .expect("remove");
    assert_eq!(outcome, RemoveOutcome::Removed);

    // The rewrite physically dropped the record.
    let raw = std::fs::read_to_string(fx.clients.store().path()).expect("read file");
    assert!(!raw.contains("A1"), "tombstoned record still on disk: {raw}");
    assert!(raw.contains("B2"));

    // The key is free for reuse.
    fx.clients
        .add(&session, Client::new("A1", 4321, "New Jo", "557", 0.0))
        .expect("key reusable after removal");
    let reloaded = fx.clients.find(&session, "A1").expect("find");
    assert_eq!(reloaded.name, "New Jo");
}

#[test]
fn permission_change_takes_effect_at_next_login_only() {
    let fx = Fixture::new();
    let root = admin();

    fx.users
        .add(&root, User::new("jo", 1111, Permissions::FIND_CLIENT))
        .expect("create user");
    fx.clients
        .add(&root, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("seed client");

    let old_session = authenticate(fx.users.store(), "jo", 1111).expect("login");

    fx.users
        .update(&root, "jo", |_| {
            Some(UserUpdate {
                password: 1111,
                permissions: Permissions::FIND_CLIENT | Permissions::TRANSACTIONS,
            })
        })
        .expect("update")
        .expect("confirmed");

    // The live session keeps the permissions resolved at its login.
    assert!(matches!(
        fx.clients.deposit(&old_session, "A1", 10.0, |_| true),
        Err(OpError::AccessDenied(_))
    ));

    // A fresh login picks up the new grant.
    let new_session = authenticate(fx.users.store(), "jo", 1111).expect("re-login");
    assert!(fx.clients.deposit(&new_session, "A1", 10.0, |_| true).is_ok());
}

#[test]
fn overdraw_then_corrected_amount() {
    let fx = Fixture::new();
    let session = admin();

    fx.clients
        .add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("add");

    // First attempt exceeds the balance and is rejected outright.
    assert!(matches!(
        fx.clients.withdraw(&session, "A1", 150.0, |_| true),
        Err(OpError::InvalidAmount(_))
    ));

    // The caller re-prompts and retries with a valid amount.
    let outcome = fx
        .clients
        .withdraw(&session, "A1", 100.0, |_| true)
        .expect("exact balance");
    assert_eq!(outcome, TransactionOutcome::Applied { new_balance: 0.0 });
}

#[test]
fn update_flow_collects_new_fields_keeping_the_key() {
    let fx = Fixture::new();
    let session = admin();

    fx.clients
        .add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("add");

    fx.clients
        .update(&session, "A1", |current| {
            Some(ClientUpdate {
                pin: current.pin,
                name: "Joanna".into(),
                phone_number: current.phone_number.clone(),
                balance: current.balance,
            })
        })
        .expect("update")
        .expect("confirmed");

    let reopened = ClientOps::new(FileStore::new(fx.clients.store().path()));
    let reloaded = reopened.find(&session, "A1").expect("find");
    assert_eq!(reloaded.name, "Joanna");
    assert_eq!(reloaded.pin, 1234);
}

#[test]
fn administrators_cannot_be_edited_even_by_administrators() {
    let fx = Fixture::new();
    let root = admin();

    ensure_bootstrap_admin(fx.users.store()).expect("seed");

    assert!(matches!(
        fx.users.remove(&root, "admin", |_| true),
        Err(OpError::ProtectedUser(_))
    ));
    assert!(matches!(
        fx.users.update(&root, "admin", |_| None),
        Err(OpError::ProtectedUser(_))
    ));

    // Still able to log in afterwards.
    assert!(authenticate(fx.users.store(), "admin", 9999).is_ok());
}

#[test]
fn corrupt_record_file_fails_fast_with_location() {
    let fx = Fixture::new();
    let session = admin();

    fx.clients
        .add(&session, Client::new("A1", 1234, "Jo", "555", 100.0))
        .expect("add");

    // Append a truncated line by hand.
    let path = fx.clients.store().path();
    let mut raw = std::fs::read_to_string(&path).expect("read");
    raw.push_str("B2 /##/ 9999\n");
    std::fs::write(&path, raw).expect("write");

    let err = fx.clients.list(&session).expect_err("malformed line");
    assert!(err.is_fatal());
    let msg = err.to_string();
    assert!(msg.contains("line 2"), "got: {msg}");
}
