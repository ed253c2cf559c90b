use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("account not found")]
    AccountNotFound,
    #[error("transaction references an unknown association")]
    InvalidAssociation,
    #[error("transaction conflict")]
    Conflict,
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("insufficient position")]
    InsufficientPosition,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Postgres foreign-key violation, surfaced by inserts whose referenced
/// rows are client-supplied.
pub(crate) fn is_fk_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23503")
    )
}
