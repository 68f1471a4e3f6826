//! axum integration: shared state, the [`SecurityContext`](crate::security::SecurityContext)
//! extractor, error responses and the route builders used by feature slices.

mod extract;
mod health;
mod response;
pub mod router;
mod routes;
mod state;

pub use response::ErrorBody;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
