use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("invalid IBAN")]
    InvalidIban,
    #[error("invalid BIC")]
    InvalidBic,
    #[error("account holder does not match verified identity")]
    HolderMismatch,
    #[error("IBAN already registered by another user")]
    IbanInUse,
    #[error("withdrawal method not found")]
    MethodNotFound,
    #[error("withdrawal method is referenced by existing withdrawals")]
    MethodInUse,
    #[error("account not found")]
    AccountNotFound,
    #[error("withdrawal currency does not match the account")]
    CurrencyMismatch,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("insufficient balance")]
    InsufficientBalance,
}
