use charachat_database::Database;
use charachat_domain::config::{ApiConfig, KdfConfig};
use charachat_session::{Account, Accounts, LoginRequest, Session, SessionError, init};

const CHEAP_KDF: KdfConfig = KdfConfig { memory_kib: 256, iterations: 1, parallelism: 1 };

async fn accounts() -> (Database, Accounts) {
    let db = Database::builder()
        .url("mem://")
        .session("charachat", "session")
        .init()
        .await
        .expect("connect to mem://");
    let accounts = Accounts::new(&db, &CHEAP_KDF);
    (db, accounts)
}

#[tokio::test]
async fn first_login_registers_and_later_logins_reuse_the_key() {
    let (db, accounts) = accounts().await;

    let first = accounts.login(&LoginRequest::new("aria@example.com", "lighthouse")).await.unwrap();
    assert!(first.created);
    assert_eq!(first.owner_id, first.key.owner_id().unwrap());

    let again = accounts.login(&LoginRequest::new("  ARIA@example.com ", "lighthouse")).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.owner_id, first.owner_id);
    assert_eq!(again.key.to_hex(), first.key.to_hex());

    let stored = db
        .table::<Account>("account")
        .find_by("email", "aria@example.com")
        .await
        .unwrap()
        .expect("account row");
    assert_eq!(stored.owner_id, first.owner_id);
    assert_ne!(stored.verifier, first.key.to_hex(), "the key itself is never stored");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (_, accounts) = accounts().await;
    accounts.login(&LoginRequest::new("bob@example.com", "correct horse")).await.unwrap();

    let err = accounts.login(&LoginRequest::new("bob@example.com", "battery staple")).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials { .. }));
}

#[tokio::test]
async fn different_users_get_different_owners() {
    let (_, accounts) = accounts().await;
    let aria = accounts.login(&LoginRequest::new("aria@example.com", "same")).await.unwrap();
    let bob = accounts.login(&LoginRequest::new("bob@example.com", "same")).await.unwrap();
    assert_ne!(aria.owner_id, bob.owner_id);
}

#[tokio::test]
async fn malformed_requests_fail_validation() {
    let (_, accounts) = accounts().await;

    let err = accounts.login(&LoginRequest::new("not-an-email", "pw")).await.unwrap_err();
    assert!(matches!(err, SessionError::Validation { .. }));
    let err = accounts.login(&LoginRequest::new("aria@example.com", "")).await.unwrap_err();
    assert!(matches!(err, SessionError::Validation { .. }));
}

#[tokio::test]
async fn init_registers_the_session_slice() {
    let (db, _) = accounts().await;
    let slice = init(&ApiConfig::default(), &db);

    assert_eq!(slice.id, std::any::TypeId::of::<Session>());
    assert_eq!(slice.name, "session");
}

#[test]
fn debug_output_hides_the_password() {
    let request = LoginRequest::new("aria@example.com", "hunter2");
    assert!(!format!("{request:?}").contains("hunter2"));
}

#[tokio::test]
async fn concurrent_first_logins_share_one_account() {
    let (db, accounts) = accounts().await;
    let request = LoginRequest::new("cleo@example.com", "twin");

    let (first, second) = tokio::join!(accounts.login(&request), accounts.login(&request));
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.owner_id, second.owner_id);
    assert_eq!(u8::from(first.created) + u8::from(second.created), 1);
    assert!(db.table::<Account>("account").find_by("email", "cleo@example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn concurrent_first_login_with_another_password_is_rejected() {
    let (_, accounts) = accounts().await;
    let owner = LoginRequest::new("dana@example.com", "first");
    let intruder = LoginRequest::new("dana@example.com", "second");

    let (a, b) = tokio::join!(accounts.login(&owner), accounts.login(&intruder));

    let rejected = [&a, &b]
        .iter()
        .filter(|r| matches!(r, Err(SessionError::InvalidCredentials { .. })))
        .count();
    assert_eq!(rejected, 1);
    assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
}
