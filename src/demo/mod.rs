//! Simulated wallet for demo mode.
//!
//! All balances are plain `f64` SOL amounts priced from the token catalog's
//! `current_value`. Nothing here touches the chain.

mod store;
mod wallet;

pub use store::{DemoSessions, DemoStore};
pub use wallet::{
    DemoPosition, DemoState, DemoTransaction, DemoTxKind, DemoWallet, INITIAL_DEMO_BALANCE,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DemoError {
    #[error("Demo mode is not active")]
    Inactive,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient SOL balance: need {needed}, have {available}")]
    InsufficientBalance { needed: f64, available: f64 },

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Insufficient {symbol} holdings: need {needed}, have {available}")]
    InsufficientHoldings {
        symbol: String,
        needed: f64,
        available: f64,
    },

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}
