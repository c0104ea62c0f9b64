//! Database module: lifecycle of the shared MySQL handle.
//!
//! Layout:
//! - `settings.rs`: connection settings read from the environment per attempt
//! - `connection.rs`: the handle owner (establish / probe / teardown)

pub mod connection;
pub mod settings;

pub use connection::Database;
pub use settings::DbSettings;
