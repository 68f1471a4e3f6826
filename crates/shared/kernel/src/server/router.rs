use super::{ApiState, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes served whatever slices are enabled: liveness and database readiness.
pub fn system_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(health::health_handler))
        .routes(routes!(health::ready_handler))
}
