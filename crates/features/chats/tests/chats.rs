use charachat_chats::{CHARACTER_ROLE, Chat, Chats, Message, append, edit, init, messages};
use charachat_database::Database;
use charachat_kernel::domain::config::RecordsConfig;
use charachat_kernel::prelude::*;
use charachat_vault::{FieldKey, is_sealed};

async fn records() -> (Database, Records) {
    let db = Database::builder()
        .url("mem://")
        .session("charachat", "chats")
        .init()
        .await
        .expect("connect to mem://");
    (db.clone(), Records::new(db, &RecordsConfig::default()))
}

fn session(seed: u8) -> SecurityContext {
    SecurityContext::for_key(&FieldKey::from_bytes([seed; 32]), false).unwrap()
}

fn say(content: &str) -> Message {
    Message { content: content.to_owned(), ..Message::default() }
}

async fn open_chat(records: &Records, ctx: &SecurityContext) -> Chat {
    let chat = Chat { character_id: "Uakgb4J7fX2m".to_owned(), ..Chat::default() };
    records.create(ctx, chat).await.unwrap()
}

#[tokio::test]
async fn chats_and_messages_are_always_sealed() {
    let (db, records) = records().await;
    let ctx = session(1);
    let chat = open_chat(&records, &ctx).await;

    let (message, updated) = append(&records, &ctx, &chat.uid, say("Is the lamp lit?")).await.unwrap();
    assert_eq!(message.content, "Is the lamp lit?");
    assert_eq!(message.chat_id, chat.uid);
    assert_eq!(message.role, "user");
    assert_eq!(updated.last_message, "Is the lamp lit?");

    let stored_message = db.table::<Message>("message").fetch(&message.uid).await.unwrap().unwrap();
    assert!(is_sealed(&stored_message.content));
    let stored_chat = db.table::<Chat>("chat").fetch(&chat.uid).await.unwrap().unwrap();
    assert!(is_sealed(&stored_chat.last_message));
    assert_eq!(stored_chat.character_id, "Uakgb4J7fX2m");
}

#[tokio::test]
async fn messages_come_back_in_order_as_plaintext() {
    let (_, records) = records().await;
    let ctx = session(1);
    let chat = open_chat(&records, &ctx).await;

    append(&records, &ctx, &chat.uid, say("Hello?")).await.unwrap();
    let reply = Message { role: CHARACTER_ROLE.to_owned(), ..say("You're late.") };
    append(&records, &ctx, &chat.uid, reply).await.unwrap();

    let listed = messages(&records, &ctx, &chat.uid).await.unwrap();
    let contents: Vec<_> = listed.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["Hello?", "You're late."]);

    let chat: Chat = records.get(&ctx, &chat.uid).await.unwrap();
    assert_eq!(chat.last_message, "You're late.");
}

#[tokio::test]
async fn other_owners_cannot_read_or_append() {
    let (_, records) = records().await;
    let aria = session(1);
    let bob = session(2);
    let chat = open_chat(&records, &aria).await;
    append(&records, &aria, &chat.uid, say("secret")).await.unwrap();

    let err = messages(&records, &bob, &chat.uid).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));
    let err = append(&records, &bob, &chat.uid, say("hi")).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));
    let err = append(&records, &SecurityContext::anonymous(), &chat.uid, say("hi")).await.unwrap_err();
    assert!(matches!(err, RecordError::MissingKey { .. }));

    let bobs_chats: Vec<Chat> = records.list(&bob).await.unwrap();
    assert!(bobs_chats.is_empty());
}

#[tokio::test]
async fn bad_messages_fail_validation() {
    let (_, records) = records().await;
    let ctx = session(1);
    let chat = open_chat(&records, &ctx).await;

    let err = append(&records, &ctx, &chat.uid, say("   ")).await.unwrap_err();
    assert!(matches!(err, RecordError::Validation { .. }));
    let narrator = Message { role: "narrator".to_owned(), ..say("Thunder.") };
    let err = append(&records, &ctx, &chat.uid, narrator).await.unwrap_err();
    assert!(matches!(err, RecordError::Validation { .. }));
}

#[tokio::test]
async fn edits_stay_in_their_chat_and_refresh_the_preview() {
    let (_, records) = records().await;
    let ctx = session(1);
    let chat = open_chat(&records, &ctx).await;
    let other = open_chat(&records, &ctx).await;
    let (first, _) = append(&records, &ctx, &chat.uid, say("Hello?")).await.unwrap();
    let (last, _) = append(&records, &ctx, &chat.uid, say("Anyone?")).await.unwrap();

    let moved = Message { chat_id: other.uid.clone(), ..say("Hello there?") };
    let edited = edit(&records, &ctx, &first.uid, moved).await.unwrap();
    assert_eq!(edited.chat_id, chat.uid);
    assert_eq!(edited.created_at, first.created_at);
    let stale: Chat = records.get(&ctx, &chat.uid).await.unwrap();
    assert_eq!(stale.last_message, "Anyone?", "an older message does not move the preview");

    edit(&records, &ctx, &last.uid, say("Anyone at all?")).await.unwrap();
    let fresh: Chat = records.get(&ctx, &chat.uid).await.unwrap();
    assert_eq!(fresh.last_message, "Anyone at all?");
    assert!(messages(&records, &ctx, &other.uid).await.unwrap().is_empty());
}

#[tokio::test]
async fn edits_are_validated_and_owner_only() {
    let (_, records) = records().await;
    let aria = session(1);
    let chat = open_chat(&records, &aria).await;
    let (message, _) = append(&records, &aria, &chat.uid, say("secret")).await.unwrap();

    let err = edit(&records, &aria, &message.uid, say("")).await.unwrap_err();
    assert!(matches!(err, RecordError::Validation { .. }));
    let shout = Message { role: "narrator".to_owned(), ..say("Thunder.") };
    let err = edit(&records, &aria, &message.uid, shout).await.unwrap_err();
    assert!(matches!(err, RecordError::Validation { .. }));
    let err = edit(&records, &session(2), &message.uid, say("mine now")).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));

    let kept: Message = records.get(&aria, &message.uid).await.unwrap();
    assert_eq!(kept.content, "secret");
}

#[test]
fn chats_are_private_without_a_flag() {
    assert!(Chat::default().is_private());
    assert!(Message::default().is_private());
}

#[test]
fn init_registers_the_slice() {
    let slice = init();
    assert_eq!(slice.id, std::any::TypeId::of::<Chats>());
    assert_eq!(slice.name, "chats");
}
