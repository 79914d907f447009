/// Domain failures that callers are expected to tell apart.
///
/// Plumbing errors (RPC, decoding, IO) travel as plain `anyhow::Error`; the HTTP
/// layer downcasts to this enum to pick a status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Solana client error: {0}")]
    SolanaClient(String),

    #[error("Raydium pool error: {0}")]
    RaydiumPool(String),

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(f64),

    #[error("Unsupported swap action: {0}")]
    InvalidAction(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Pool {0} has no SOL side")]
    PoolWithoutSol(String),

    #[error("Pool {0} has empty reserves")]
    EmptyReserves(String),

    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User already exists")]
    UserExists,
}
