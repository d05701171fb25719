//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool, one short-lived repo per request
//! - Related rows are aggregated in the same statement (no N+1)
//! - Conflicts come from DB constraints (no check-then-insert for uniqueness)

pub mod awards;
pub mod categories;
pub mod photos;

pub use awards::AwardRepo;
pub use categories::CategoryRepo;
pub use photos::PhotoRepo;
