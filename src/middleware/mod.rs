pub mod liveness;

pub use liveness::require_live_database;
