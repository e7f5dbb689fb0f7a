// src/domain/pricing.rs

/// Channel sale price: discount, floor to the nearest 1,000 below, then add the flat adjustment.
///
/// Rounding always goes down, never to nearest.
pub fn final_price(base_price: i64, discount_percent: f64, flat_adjustment: i64) -> i64 {
    let after_discount = base_price as f64 * (1.0 - discount_percent / 100.0);
    // Nudge past float noise so 300000 * 0.7 lands on 210000, not 209000.
    let floored = (after_discount / 1000.0 + 1e-9).floor() as i64 * 1000;
    floored + flat_adjustment
}
