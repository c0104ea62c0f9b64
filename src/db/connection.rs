use std::sync::Arc;

use sqlx::Connection;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::db::settings::DbSettings;
use crate::error::ServiceError;

/// Owner of the shared database handle.
///
/// At most one live handle exists at any time. It is created by
/// [`Database::establish`], replaced (never mutated) on reconnect, and closed
/// exactly once by [`Database::teardown`]. Callers share the owner by
/// cloning; the handle itself never leaves this module.
#[derive(Clone)]
pub struct Database {
    shared: Arc<Shared>,
}

struct Shared {
    handle: RwLock<Option<MySqlPool>>,
    /// Serializes reconnect attempts so concurrent failing requests produce
    /// one `establish` instead of a stampede.
    reconnect: Mutex<()>,
}

impl Database {
    /// An empty manager with no handle. The first `establish` call installs
    /// one.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                handle: RwLock::new(None),
                reconnect: Mutex::new(()),
            }),
        }
    }

    /// Open a fresh connection and make it the shared handle.
    ///
    /// Settings are re-read from the environment on every call. The new pool
    /// is opened, a session acquired from it and pinged before anything is
    /// replaced; on any failure the previous handle, working or not, stays in
    /// place. The displaced pool is closed so the single-handle invariant
    /// holds.
    pub async fn establish(&self) -> Result<(), ServiceError> {
        let settings = DbSettings::from_env()?;

        let pool = MySqlPoolOptions::new()
            .connect_with(settings.connect_options())
            .await
            .map_err(ServiceError::Connect)?;

        let mut session = pool.acquire().await.map_err(ServiceError::Acquire)?;
        session.ping().await.map_err(ServiceError::Ping)?;
        drop(session);

        let previous = self.shared.handle.write().await.replace(pool);
        if let Some(previous) = previous {
            previous.close().await;
        }

        info!("database connected successfully");
        Ok(())
    }

    /// Round-trip check of the current handle. Read-only: a failed probe
    /// leaves the handle untouched.
    pub async fn probe(&self) -> Result<(), ServiceError> {
        let pool = {
            let guard = self.shared.handle.read().await;
            guard.as_ref().cloned()
        };
        let pool = pool.ok_or(ServiceError::Unconnected)?;

        let mut session = pool.acquire().await.map_err(ServiceError::Acquire)?;
        session.ping().await.map_err(ServiceError::Ping)
    }

    /// Probe the handle and reconnect once if it is dead.
    ///
    /// Reconnection is single-flight: whoever holds the guard re-probes
    /// first, since a concurrent caller may already have replaced the handle
    /// while this one was waiting.
    pub async fn ensure_live(&self) -> Result<(), ServiceError> {
        if self.probe().await.is_ok() {
            return Ok(());
        }

        let _guard = self.shared.reconnect.lock().await;
        if self.probe().await.is_ok() {
            return Ok(());
        }

        warn!("reconnecting to the database");
        self.establish().await
    }

    /// Close the shared handle. A no-op when none was ever established or it
    /// was already taken; otherwise the underlying sessions are closed
    /// exactly once.
    pub async fn teardown(&self) {
        let handle = self.shared.handle.write().await.take();
        if let Some(pool) = handle {
            pool.close().await;
            info!("database connection closed successfully");
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
