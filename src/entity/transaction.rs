/// Validated transfer request; amounts are in UI units of the token.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub private_key: String,
    pub recipient: String,
    pub amount: f64,
    pub mint: Option<String>,
    pub is_native_sol: bool,
}
