use axum::http::StatusCode;
use axum::response::IntoResponse;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ServiceError {
    #[error("invalid database configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("no database connection established")]
    Unconnected,

    #[error("failed to connect to database: {0}")]
    Connect(#[source] SqlxError),

    #[error("failed to get database session: {0}")]
    Acquire(#[source] SqlxError),

    #[error("failed to ping database: {0}")]
    Ping(#[source] SqlxError),
}

/// Every failure the service can surface is a database-liveness problem, so
/// the HTTP mapping is uniformly a 500 with an opaque body. The underlying
/// cause is logged at the call site, never exposed to the client.
impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Database connection error").into_response()
    }
}
