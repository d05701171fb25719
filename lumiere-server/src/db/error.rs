//! Repository error type

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A unique constraint rejected the write
    #[error("{message}")]
    Conflict { message: &'static str },

    /// Row is still referenced and may not be removed
    #[error("{message}")]
    InUse { message: &'static str },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// SQLSTATE of a database-reported error, if any.
fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Map a unique violation to `DbError::Conflict`, everything else passes through.
pub(crate) fn on_unique_violation(message: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |err| match sqlstate(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => DbError::Conflict { message },
        _ => DbError::Sqlx(err),
    }
}

/// Map a foreign key violation to `DbError::InUse`, everything else passes through.
pub(crate) fn on_foreign_key_violation(message: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |err| match sqlstate(&err).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => DbError::InUse { message },
        _ => DbError::Sqlx(err),
    }
}
