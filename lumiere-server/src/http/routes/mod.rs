//! Route handlers organized by resource

pub mod auth;
pub mod awards;
pub mod categories;
pub mod health;
pub mod media;
pub mod photos;
