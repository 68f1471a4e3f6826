use charachat_database::Database;
use charachat_kernel::domain::config::RecordsConfig;
use charachat_kernel::prelude::*;
use charachat_profiles::{Profile, Profiles, init};
use charachat_vault::{FieldKey, is_sealed};

async fn records() -> (Database, Records) {
    let db = Database::builder()
        .url("mem://")
        .session("charachat", "profiles")
        .init()
        .await
        .expect("connect to mem://");
    (db.clone(), Records::new(db, &RecordsConfig::default()))
}

fn aria(is_private: bool) -> Profile {
    Profile {
        first_name: "Aria".to_owned(),
        last_name: "Holt".to_owned(),
        bio: "Writes at night".to_owned(),
        is_private,
        ..Profile::default()
    }
}

#[tokio::test]
async fn going_public_stores_plaintext_and_going_private_seals() {
    let (db, records) = records().await;
    let ctx = SecurityContext::for_key(&FieldKey::from_bytes([3; 32]), false).unwrap();
    let table = db.table::<Profile>("profile");

    let created = records.create(&ctx, aria(true)).await.unwrap();
    assert!(is_sealed(&table.fetch(&created.uid).await.unwrap().unwrap().first_name));

    records.update(&ctx, &created.uid, aria(false)).await.unwrap();
    let stored = table.fetch(&created.uid).await.unwrap().unwrap();
    assert_eq!(stored.first_name, "Aria");
    assert_eq!(stored.bio, "Writes at night");

    records.update(&ctx, &created.uid, aria(true)).await.unwrap();
    let stored = table.fetch(&created.uid).await.unwrap().unwrap();
    assert!(is_sealed(&stored.first_name));
    assert!(is_sealed(&stored.last_name));

    let fetched: Profile = records.get(&ctx, &created.uid).await.unwrap();
    assert_eq!(fetched.display_name(), "Aria Holt");
}

#[test]
fn empty_values_are_never_sealed_or_shown() {
    let mut profile = aria(true);
    profile.last_name.clear();
    assert_eq!(profile.display_name(), "Aria");

    let key = FieldKey::from_bytes([3; 32]);
    let sealed = charachat_vault::encrypt_fields(profile, &key).unwrap();
    assert!(is_sealed(&sealed.first_name));
    assert!(sealed.last_name.is_empty());
}

#[test]
fn init_registers_the_slice() {
    let slice = init();
    assert_eq!(slice.id, std::any::TypeId::of::<Profiles>());
    assert_eq!(slice.name, "profiles");
}
