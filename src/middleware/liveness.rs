use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::router::CalendarState;

/// Gate every request on a fresh liveness check of the shared handle.
///
/// A dead handle triggers exactly one reconnect attempt; if that fails too,
/// the request is rejected with a 500 and the handler never runs. The probe
/// runs on the hot path for every request, with no cached last-known-good
/// state.
pub async fn require_live_database(
    State(state): State<CalendarState>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(err) = state.db.ensure_live().await {
        error!(error = %err, "failed to reconnect to the database");
        return err.into_response();
    }
    next.run(request).await
}
