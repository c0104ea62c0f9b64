use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::sync::LazyLock;

/// Ambient service configuration, read once at startup.
///
/// Database credentials are intentionally not part of this struct: they are
/// re-read from the environment on every connection attempt (see
/// [`crate::db::DbSettings`]).
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Listen address for the HTTP server.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Fallback log filter when `RUST_LOG` is not set.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["listen_addr", "loglevel"]))
            .extract()
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("invalid service configuration in environment")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        unsafe {
            std::env::remove_var("LISTEN_ADDR");
            std::env::remove_var("LOGLEVEL");
        }
        let cfg = Config::from_env().expect("extraction failed");
        assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
        assert_eq!(cfg.loglevel, "info");
    }
}
