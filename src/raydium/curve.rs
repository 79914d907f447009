use crate::entity::AppError;
use crate::raydium::FEE_RATE_DENOMINATOR;

/// Outcome of a base-input swap against constant-product reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapCalculation {
    pub source_amount_swapped: u64,
    pub destination_amount_swapped: u64,
    pub trade_fee: u64,
}

fn ceil_div(numerator: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    numerator
        .checked_add(denominator - 1)
        .map(|n| n / denominator)
}

/// Trade fee charged on the input, rounded up
pub fn trading_fee(amount: u64, trade_fee_rate: u64) -> Option<u64> {
    let fee = ceil_div(
        (amount as u128).checked_mul(trade_fee_rate as u128)?,
        FEE_RATE_DENOMINATOR as u128,
    )?;
    u64::try_from(fee).ok()
}

/// Swap `source_amount` into a pool holding `swap_source` / `swap_destination`.
///
/// Returns `None` when either reserve is empty or the fee swallows the input.
pub fn swap_base_input(
    source_amount: u64,
    swap_source: u64,
    swap_destination: u64,
    trade_fee_rate: u64,
) -> Option<SwapCalculation> {
    if swap_source == 0 || swap_destination == 0 {
        return None;
    }

    let trade_fee = trading_fee(source_amount, trade_fee_rate)?;
    let source_less_fees = source_amount.checked_sub(trade_fee)?;
    if source_less_fees == 0 {
        return None;
    }

    // out = in * y / (x + in), floored
    let numerator = (source_less_fees as u128).checked_mul(swap_destination as u128)?;
    let denominator = (swap_source as u128).checked_add(source_less_fees as u128)?;
    let destination_amount_swapped = u64::try_from(numerator / denominator).ok()?;

    Some(SwapCalculation {
        source_amount_swapped: source_amount,
        destination_amount_swapped,
        trade_fee,
    })
}

/// Share of the spot output lost to moving the reserves, in `[0, 1]`
pub fn price_impact(calculation: &SwapCalculation, swap_source: u64, swap_destination: u64) -> f64 {
    let input = (calculation.source_amount_swapped - calculation.trade_fee) as f64;
    let spot_output = input * swap_destination as f64 / swap_source as f64;
    if spot_output <= 0.0 {
        return 0.0;
    }
    (1.0 - calculation.destination_amount_swapped as f64 / spot_output).clamp(0.0, 1.0)
}

/// Slippage tolerance as a fraction in `[0, 1)` to the nearest basis point
pub fn slippage_to_bps(slippage: f64) -> Result<u64, AppError> {
    if !slippage.is_finite() || !(0.0..1.0).contains(&slippage) {
        return Err(AppError::InvalidSlippage(slippage));
    }
    Ok((slippage * 10_000.0).round() as u64)
}

/// Lowest acceptable output after slippage
pub fn minimum_amount_out(amount_out: u64, slippage_bps: u64) -> u64 {
    let kept = 10_000u128.saturating_sub(slippage_bps as u128);
    (amount_out as u128 * kept / 10_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_rounds_up() {
        // 0.25% of 1_000 is 2.5, charged as 3
        assert_eq!(trading_fee(1_000, 2_500), Some(3));
        assert_eq!(trading_fee(1_000_000, 2_500), Some(2_500));
        assert_eq!(trading_fee(0, 2_500), Some(0));
    }

    #[test]
    fn constant_product_output() {
        // 1_000_000 in, fee 2_500, 997_500 swapped into 1e9 / 2e9 reserves
        let calc = swap_base_input(1_000_000, 1_000_000_000, 2_000_000_000, 2_500).unwrap();
        assert_eq!(calc.trade_fee, 2_500);
        assert_eq!(
            calc.destination_amount_swapped,
            (997_500u128 * 2_000_000_000 / 1_000_997_500) as u64
        );
        assert_eq!(calc.source_amount_swapped, 1_000_000);
    }

    #[test]
    fn product_never_decreases() {
        let (x, y) = (5_000_000u64, 80_000_000u64);
        let calc = swap_base_input(123_456, x, y, 2_500).unwrap();
        let new_x = (x + calc.source_amount_swapped - calc.trade_fee) as u128;
        let new_y = (y - calc.destination_amount_swapped) as u128;
        assert!(new_x * new_y >= x as u128 * y as u128);
    }

    #[test]
    fn empty_reserves_or_dust_give_none() {
        assert!(swap_base_input(1_000, 0, 1_000, 2_500).is_none());
        assert!(swap_base_input(1_000, 1_000, 0, 2_500).is_none());
        // fee of one unit consumes the whole input
        assert!(swap_base_input(1, 1_000, 1_000, 2_500).is_none());
    }

    #[test]
    fn slippage_bounds() {
        assert_eq!(slippage_to_bps(0.0).unwrap(), 0);
        assert_eq!(slippage_to_bps(0.005).unwrap(), 50);
        assert_eq!(slippage_to_bps(0.01).unwrap(), 100);
        assert_eq!(slippage_to_bps(0.0029).unwrap(), 29);
        assert_eq!(slippage_to_bps(0.00004).unwrap(), 0);
        assert!(slippage_to_bps(1.0).is_err());
        assert!(slippage_to_bps(-0.01).is_err());
        assert!(slippage_to_bps(f64::INFINITY).is_err());
    }

    #[test]
    fn minimum_out_applies_tolerance() {
        assert_eq!(minimum_amount_out(10_000, 100), 9_900);
        assert_eq!(minimum_amount_out(10_000, 0), 10_000);
        assert_eq!(minimum_amount_out(999, 50), 994);
    }

    #[test]
    fn impact_grows_with_size() {
        let small = swap_base_input(1_000, 1_000_000, 1_000_000, 0).unwrap();
        let large = swap_base_input(500_000, 1_000_000, 1_000_000, 0).unwrap();
        assert!(price_impact(&small, 1_000_000, 1_000_000) < price_impact(&large, 1_000_000, 1_000_000));
    }
}
