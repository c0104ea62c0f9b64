use axum::routing::get;
use axum::{Router, middleware};

use crate::db::Database;
use crate::middleware::require_live_database;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct CalendarState {
    pub db: Database,
}

impl CalendarState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Build the application router: the single root route, gated by the
/// database-liveness layer.
pub fn calendar_router(state: CalendarState) -> Router {
    Router::new()
        .route("/", get(hello))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_live_database,
        ))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Hello, Calendar!"
}
