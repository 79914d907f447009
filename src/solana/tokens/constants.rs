// Known token information (name, symbol, mint)
pub const KNOWN_TOKENS: &[(&str, &str, &str)] = &[
    ("Wrapped SOL", "SOL", "So11111111111111111111111111111111111111112"),
    ("USD Coin", "USDC", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
    ("Tether USD", "USDT", "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB"),
    ("Raydium", "RAY", "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"),
    ("Bonk", "BONK", "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"),
    ("Jupiter", "JUP", "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN"),
];

pub const SOL_NAME: &str = "Solana";
pub const SOL_SYMBOL: &str = "SOL";
pub const SOL_DECIMALS: u8 = 9;

// Fee constants
pub const ESTIMATED_SOL_FEE: u64 = 5000; // in lamports

// Token account layout (shared by Token and Token-2022)
pub const TOKEN_ACCOUNT_MINT_OFFSET: usize = 0;
pub const TOKEN_ACCOUNT_OWNER_OFFSET: usize = 32;
pub const TOKEN_ACCOUNT_AMOUNT_OFFSET: usize = 64;
pub const TOKEN_ACCOUNT_MIN_LEN: usize = 72;

// Mint layout
pub const MINT_DECIMALS_OFFSET: usize = 44;
