//! Chats feature slice: chats and the messages inside them.
//!
//! Both kinds are always private. Chats use the uniform record routes and also expose their
//! message list. Messages keep the same route shape, but every write goes through
//! [`append`] or [`edit`], so a message always belongs to one of the caller's chats and
//! the chat's `last_message` preview stays current.

mod conversation;
mod model;

pub use conversation::{append, edit, messages};
pub use model::{CHARACTER_ROLE, Chat, Message, USER_ROLE};

use charachat_kernel::domain::registry::InitializedSlice;

/// Chats feature state.
#[charachat_derive::charachat_slice]
pub struct Chats {}

/// Initialize the chats feature (messages included).
#[must_use]
pub fn init() -> InitializedSlice {
    tracing::info!("Chats slice initialized");
    InitializedSlice::new(Chats::new(ChatsInner {}))
}

#[cfg(feature = "server")]
mod api {
    use crate::{Chat, Message};
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use charachat_derive::api_handler;
    use charachat_kernel::domain::constants::CHATS_TAG;
    use charachat_kernel::records::{RecordError, SweepReport};
    use charachat_kernel::security::SecurityContext;
    use charachat_kernel::server::{ApiState, ErrorBody};
    use utoipa_axum::router::OpenApiRouter;
    use utoipa_axum::routes;

    charachat_kernel::record_routes! {
        mod chat_api;
        model: Chat,
        tag: CHATS_TAG,
        collection: "/api/chats",
        item: "/api/chats/{id}",
        migrate: "/api/chats/migrate",
    }

    /// `/api/chats` and `/api/messages` routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        chat_api::router()
            .routes(routes!(list_messages, append_message))
            .routes(routes!(list_own_messages, create_message))
            .routes(routes!(fetch_message, replace_message, remove_message))
            .routes(routes!(migrate_messages))
    }

    #[api_handler(
        get,
        path = "/api/chats/{id}/messages",
        params(("id" = String, Path, description = "Chat id")),
        responses(
            (status = OK, description = "Messages, oldest first", body = Vec<Message>),
            (status = NOT_FOUND, description = "Unknown chat", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn list_messages(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Path(id): Path<String>,
    ) -> Result<Json<Vec<Message>>, RecordError> {
        Ok(Json(crate::messages(&state.records, &ctx, &id).await?))
    }

    #[api_handler(
        post,
        path = "/api/chats/{id}/messages",
        params(("id" = String, Path, description = "Chat id")),
        request_body = Message,
        responses(
            (status = CREATED, description = "Appended", body = Message),
            (status = UNAUTHORIZED, description = "No session key", body = ErrorBody),
            (status = NOT_FOUND, description = "Unknown chat", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn append_message(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Path(id): Path<String>,
        Json(message): Json<Message>,
    ) -> Result<(StatusCode, Json<Message>), RecordError> {
        let (message, _) = crate::append(&state.records, &ctx, &id, message).await?;
        Ok((StatusCode::CREATED, Json(message)))
    }

    #[api_handler(
        get,
        path = "/api/messages",
        responses((status = OK, description = "The caller's messages", body = Vec<Message>)),
        tag = CHATS_TAG,
    )]
    async fn list_own_messages(
        State(state): State<ApiState>,
        ctx: SecurityContext,
    ) -> Result<Json<Vec<Message>>, RecordError> {
        Ok(Json(state.records.list::<Message>(&ctx).await?))
    }

    #[api_handler(
        post,
        path = "/api/messages",
        request_body = Message,
        responses(
            (status = CREATED, description = "Appended to the chat named by `chatId`", body = Message),
            (status = UNAUTHORIZED, description = "No session key", body = ErrorBody),
            (status = NOT_FOUND, description = "Unknown chat", body = ErrorBody),
            (status = UNPROCESSABLE_ENTITY, description = "Unknown role or empty content", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn create_message(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Json(message): Json<Message>,
    ) -> Result<(StatusCode, Json<Message>), RecordError> {
        let chat_id = message.chat_id.clone();
        let (message, _) = crate::append(&state.records, &ctx, &chat_id, message).await?;
        Ok((StatusCode::CREATED, Json(message)))
    }

    #[api_handler(
        get,
        path = "/api/messages/{id}",
        params(("id" = String, Path, description = "Message id")),
        responses(
            (status = OK, description = "Plaintext message", body = Message),
            (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn fetch_message(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Path(id): Path<String>,
    ) -> Result<Json<Message>, RecordError> {
        Ok(Json(state.records.get::<Message>(&ctx, &id).await?))
    }

    #[api_handler(
        put,
        path = "/api/messages/{id}",
        params(("id" = String, Path, description = "Message id")),
        request_body = Message,
        responses(
            (status = OK, description = "Replaced", body = Message),
            (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
            (status = UNPROCESSABLE_ENTITY, description = "Unknown role or empty content", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn replace_message(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Path(id): Path<String>,
        Json(message): Json<Message>,
    ) -> Result<Json<Message>, RecordError> {
        Ok(Json(crate::edit(&state.records, &ctx, &id, message).await?))
    }

    #[api_handler(
        delete,
        path = "/api/messages/{id}",
        params(("id" = String, Path, description = "Message id")),
        responses(
            (status = NO_CONTENT, description = "Deleted"),
            (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn remove_message(
        State(state): State<ApiState>,
        ctx: SecurityContext,
        Path(id): Path<String>,
    ) -> Result<StatusCode, RecordError> {
        state.records.delete::<Message>(&ctx, &id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    #[api_handler(
        post,
        path = "/api/messages/migrate",
        responses(
            (status = OK, description = "Sweep summary", body = SweepReport),
            (status = UNAUTHORIZED, description = "No session key", body = ErrorBody),
        ),
        tag = CHATS_TAG,
    )]
    async fn migrate_messages(
        State(state): State<ApiState>,
        ctx: SecurityContext,
    ) -> Result<Json<SweepReport>, RecordError> {
        Ok(Json(state.records.migrate_legacy::<Message>(&ctx).await?))
    }
}

#[cfg(feature = "server")]
pub use api::router;
