use alloy::primitives::Address;
use shared::token::TokenError;
use thiserror::Error;

/// Failures surfaced by the incentives ledger. All are synchronous and
/// returned to the caller; nothing is retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Rounds haven't started yet")]
    NotStarted,

    #[error("{0}")]
    InvalidConfig(&'static str),

    #[error("Input arrays must have the same length")]
    LengthMismatch,

    #[error("Unknown token {0}")]
    UnknownToken(Address),

    #[error("Token transfer failed: {0}")]
    TransferFailed(String),

    #[error("Not enough tokens to withdraw")]
    InsufficientPoolFunds,

    #[error("Reward rate is not 0")]
    RateMustBeZero,

    #[error("Already claimed this reward for this round")]
    AlreadyClaimed,

    #[error("Stake oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Arithmetic overflow in reward accounting")]
    ArithmeticOverflow,
}

impl From<TokenError> for LedgerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::UnknownToken(token) => LedgerError::UnknownToken(token),
            TokenError::TransferFailed(reason) => LedgerError::TransferFailed(reason),
        }
    }
}
