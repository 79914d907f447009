use solana_sdk::pubkey::Pubkey;

use crate::entity::AppError;
use crate::solana::tokens::constants::KNOWN_TOKENS;

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Convert lamports to SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// Convert raw token units to a display amount
pub fn ui_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10_f64.powi(decimals as i32)
}

/// Convert a display amount to raw token units.
///
/// Zero, negative, non-finite and overflowing amounts are rejected.
pub fn to_raw_amount(amount: f64, decimals: u8) -> Result<u64, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidAmount);
    }

    let scaled = (amount * 10_f64.powi(decimals as i32)).floor();
    if scaled < 1.0 || scaled >= u64::MAX as f64 {
        return Err(AppError::InvalidAmount);
    }

    Ok(scaled as u64)
}

/// Name and symbol for a known mint
pub fn known_token(mint: &Pubkey) -> Option<(&'static str, &'static str)> {
    let mint = mint.to_string();
    KNOWN_TOKENS
        .iter()
        .find(|(_, _, address)| *address == mint)
        .map(|(name, symbol, _)| (*name, *symbol))
}

/// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }

    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn raw_amount_conversion() {
        assert_eq!(to_raw_amount(1.5, 9).unwrap(), 1_500_000_000);
        assert_eq!(to_raw_amount(0.000001, 6).unwrap(), 1);
        assert!(matches!(to_raw_amount(0.0, 9), Err(AppError::InvalidAmount)));
        assert!(matches!(to_raw_amount(-2.0, 9), Err(AppError::InvalidAmount)));
        assert!(matches!(to_raw_amount(f64::NAN, 9), Err(AppError::InvalidAmount)));
        // below one raw unit
        assert!(matches!(to_raw_amount(0.0000001, 6), Err(AppError::InvalidAmount)));
    }

    #[test]
    fn ui_amount_applies_decimals() {
        assert_eq!(ui_amount(2_500_000, 6), 2.5);
        assert_eq!(lamports_to_sol(1_000_000_000), 1.0);
    }

    #[test]
    fn resolves_known_mints() {
        let usdc = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        assert_eq!(known_token(&usdc), Some(("USD Coin", "USDC")));
        assert_eq!(known_token(&Pubkey::new_unique()), None);
    }

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            shorten_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            "EPjF...Dt1v"
        );
        assert_eq!(shorten_address("short"), "short");
    }
}
