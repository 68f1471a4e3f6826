use crate::model::{CHARACTER_ROLE, Chat, Message, USER_ROLE};
use charachat_kernel::records::{RecordError, Records};
use charachat_kernel::security::SecurityContext;
use tracing::{debug, instrument};

/// Characters of `last_message` kept as the chat preview.
const PREVIEW_LEN: usize = 280;

/// Messages of one of the caller's chats, oldest first.
///
/// # Errors
/// * [`RecordError::NotFound`] If the chat does not exist or belongs to someone else.
/// * [`RecordError::Validation`] For a malformed chat id.
#[instrument(level = "debug", skip(records, ctx))]
pub async fn messages(
    records: &Records,
    ctx: &SecurityContext,
    chat_id: &str,
) -> Result<Vec<Message>, RecordError> {
    records.get::<Chat>(ctx, chat_id).await?;
    records.list_by::<Message>(ctx, "chat_id", chat_id).await
}

/// Appends `message` to one of the caller's chats and refreshes the chat preview.
///
/// Returns the stored message and the updated chat, both as plaintext.
///
/// # Errors
/// * [`RecordError::MissingKey`] Without a session.
/// * [`RecordError::NotFound`] If the chat is not the caller's.
/// * [`RecordError::Validation`] For an unknown role or empty content.
#[instrument(level = "debug", skip(records, ctx, message))]
pub async fn append(
    records: &Records,
    ctx: &SecurityContext,
    chat_id: &str,
    mut message: Message,
) -> Result<(Message, Chat), RecordError> {
    ctx.require_owner()?;
    validate(&mut message)?;

    let mut chat = records.get::<Chat>(ctx, chat_id).await?;
    message.chat_id = chat.uid.clone();
    let message = records.create(ctx, message).await?;

    chat.last_message = preview(&message);
    let chat = records.update(ctx, chat_id, chat).await?;
    debug!(chat_id, message_id = %message.uid, "Appended message");

    Ok((message, chat))
}

/// Replaces the role and content of one of the caller's messages.
///
/// The message stays in its chat whatever `chat_id` the caller sends. If it is the
/// newest message of the chat, the chat preview follows the edit.
///
/// # Errors
/// * [`RecordError::MissingKey`] Without a session.
/// * [`RecordError::NotFound`] If the message is not the caller's.
/// * [`RecordError::Validation`] For an unknown role or empty content.
#[instrument(level = "debug", skip(records, ctx, message))]
pub async fn edit(
    records: &Records,
    ctx: &SecurityContext,
    message_id: &str,
    mut message: Message,
) -> Result<Message, RecordError> {
    ctx.require_owner()?;
    validate(&mut message)?;

    let existing = records.get::<Message>(ctx, message_id).await?;
    message.chat_id = existing.chat_id;
    let message = records.update(ctx, message_id, message).await?;

    let thread = records.list_by::<Message>(ctx, "chat_id", &message.chat_id).await?;
    if thread.last().is_some_and(|newest| newest.uid == message.uid) {
        let mut chat = records.get::<Chat>(ctx, &message.chat_id).await?;
        chat.last_message = preview(&message);
        records.update(ctx, &message.chat_id, chat).await?;
    }
    debug!(chat_id = %message.chat_id, message_id, "Edited message");

    Ok(message)
}

/// Defaults the role to `user` and rejects unknown roles or blank content.
fn validate(message: &mut Message) -> Result<(), RecordError> {
    if message.role.is_empty() {
        message.role = USER_ROLE.to_owned();
    }
    if message.role != USER_ROLE && message.role != CHARACTER_ROLE {
        return Err(RecordError::Validation {
            message: format!("unknown role '{}'", message.role.escape_debug()).into(),
            context: Some("message".into()),
        });
    }
    if message.content.trim().is_empty() {
        return Err(RecordError::Validation {
            message: "message is empty".into(),
            context: Some("message".into()),
        });
    }
    Ok(())
}

fn preview(message: &Message) -> String {
    message.content.chars().take(PREVIEW_LEN).collect()
}
