//! The uniform route set of a record kind.

/// Generates a module with the six standard handlers of a record kind and its router.
///
/// | Route | Handler |
/// |---|---|
/// | `GET collection` | visible records (own plus public) |
/// | `POST collection` | create, requires a session |
/// | `GET item` | fetch |
/// | `PUT item` | replace, owner only |
/// | `DELETE item` | hard delete, owner only |
/// | `POST migrate` | legacy plaintext sweep over the caller's records |
///
/// The model and tag are resolved in the invoking module; the crate needs `axum`,
/// `utoipa` and `utoipa-axum` as dependencies.
///
/// ```rust,ignore
/// charachat_kernel::record_routes! {
///     mod persona_api;
///     model: Persona,
///     tag: PERSONAS_TAG,
///     collection: "/api/personas",
///     item: "/api/personas/{id}",
///     migrate: "/api/personas/migrate",
/// }
///
/// let router = persona_api::router();
/// ```
#[macro_export]
macro_rules! record_routes {
    (
        mod $module:ident;
        model: $model:ident,
        tag: $tag:ident,
        collection: $collection:tt,
        item: $item:tt,
        migrate: $migrate:tt $(,)?
    ) => {
        pub(crate) mod $module {
            use super::*;
            use ::axum::Json;
            use ::axum::extract::{Path, State};
            use ::axum::http::StatusCode;
            use ::utoipa_axum::router::OpenApiRouter;
            use $crate::records::{RecordError, SweepReport};
            use $crate::security::SecurityContext;
            use $crate::server::{ApiState, ErrorBody};

            #[::utoipa::path(
                get,
                path = $collection,
                responses((status = OK, description = "Own and public records", body = Vec<$model>)),
                tag = $tag,
            )]
            pub(crate) async fn list(
                State(state): State<ApiState>,
                ctx: SecurityContext,
            ) -> Result<Json<Vec<$model>>, RecordError> {
                Ok(Json(state.records.list::<$model>(&ctx).await?))
            }

            #[::utoipa::path(
                post,
                path = $collection,
                request_body = $model,
                responses(
                    (status = CREATED, description = "Created", body = $model),
                    (status = UNAUTHORIZED, description = "No session key", body = ErrorBody),
                ),
                tag = $tag,
            )]
            pub(crate) async fn create(
                State(state): State<ApiState>,
                ctx: SecurityContext,
                Json(record): Json<$model>,
            ) -> Result<(StatusCode, Json<$model>), RecordError> {
                let created = state.records.create(&ctx, record).await?;
                Ok((StatusCode::CREATED, Json(created)))
            }

            #[::utoipa::path(
                get,
                path = $item,
                params(("id" = String, Path, description = "Record id")),
                responses(
                    (status = OK, description = "Plaintext record", body = $model),
                    (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
                ),
                tag = $tag,
            )]
            pub(crate) async fn fetch(
                State(state): State<ApiState>,
                ctx: SecurityContext,
                Path(id): Path<String>,
            ) -> Result<Json<$model>, RecordError> {
                Ok(Json(state.records.get::<$model>(&ctx, &id).await?))
            }

            #[::utoipa::path(
                put,
                path = $item,
                params(("id" = String, Path, description = "Record id")),
                request_body = $model,
                responses(
                    (status = OK, description = "Replaced", body = $model),
                    (status = FORBIDDEN, description = "Owned by someone else", body = ErrorBody),
                    (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
                ),
                tag = $tag,
            )]
            pub(crate) async fn replace(
                State(state): State<ApiState>,
                ctx: SecurityContext,
                Path(id): Path<String>,
                Json(record): Json<$model>,
            ) -> Result<Json<$model>, RecordError> {
                Ok(Json(state.records.update(&ctx, &id, record).await?))
            }

            #[::utoipa::path(
                delete,
                path = $item,
                params(("id" = String, Path, description = "Record id")),
                responses(
                    (status = NO_CONTENT, description = "Deleted"),
                    (status = FORBIDDEN, description = "Owned by someone else", body = ErrorBody),
                    (status = NOT_FOUND, description = "Unknown or not visible", body = ErrorBody),
                ),
                tag = $tag,
            )]
            pub(crate) async fn remove(
                State(state): State<ApiState>,
                ctx: SecurityContext,
                Path(id): Path<String>,
            ) -> Result<StatusCode, RecordError> {
                state.records.delete::<$model>(&ctx, &id).await?;
                Ok(StatusCode::NO_CONTENT)
            }

            #[::utoipa::path(
                post,
                path = $migrate,
                responses(
                    (status = OK, description = "Sweep summary", body = SweepReport),
                    (status = UNAUTHORIZED, description = "No session key", body = ErrorBody),
                ),
                tag = $tag,
            )]
            pub(crate) async fn migrate(
                State(state): State<ApiState>,
                ctx: SecurityContext,
            ) -> Result<Json<SweepReport>, RecordError> {
                Ok(Json(state.records.migrate_legacy::<$model>(&ctx).await?))
            }

            pub(crate) fn router() -> OpenApiRouter<ApiState> {
                OpenApiRouter::new()
                    .routes(::utoipa_axum::routes!(list, create))
                    .routes(::utoipa_axum::routes!(fetch, replace, remove))
                    .routes(::utoipa_axum::routes!(migrate))
            }
        }
    };
}
