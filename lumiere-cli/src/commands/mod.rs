//! Command implementations for the lumiere CLI

pub mod migrate;
pub mod openapi;
pub mod serve;

pub use migrate::run_migrate;
pub use openapi::run_openapi;
pub use serve::run_serve;
