use crate::error::SessionError;
use crate::model::{LoginRequest, LoginResponse, SessionStatus};
use crate::Session;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use charachat_derive::api_handler;
use charachat_kernel::domain::constants::SESSION_TAG;
use charachat_kernel::security::SecurityContext;
use charachat_kernel::server::{ApiState, ErrorBody};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/api/session` routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(login, status, logout))
}

#[api_handler(
    post,
    path = "/api/session",
    request_body = LoginRequest,
    responses(
        (status = OK, description = "Key cookie set", body = LoginResponse),
        (status = UNAUTHORIZED, description = "Wrong password", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed credentials", body = ErrorBody),
    ),
    tag = SESSION_TAG,
)]
async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, SessionError> {
    let session = state.try_get_slice::<Session>().map_err(|e| SessionError::from(e.to_string()))?;
    let login = session.accounts.login(&request).await?;

    let cookie = state.keys.issue_cookie(&login.key);
    let body = LoginResponse { owner_id: login.owner_id, created: login.created };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

#[api_handler(
    get,
    path = "/api/session",
    responses((status = OK, description = "Current session", body = SessionStatus)),
    tag = SESSION_TAG,
)]
async fn status(ctx: SecurityContext) -> Json<SessionStatus> {
    Json(SessionStatus {
        authenticated: ctx.is_authenticated(),
        owner_id: ctx.owner_id().map(ToOwned::to_owned),
    })
}

#[api_handler(
    delete,
    path = "/api/session",
    responses((status = NO_CONTENT, description = "Key cookie cleared")),
    tag = SESSION_TAG,
)]
async fn logout(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, state.keys.clear_cookie())])
}
