use super::core_math::Decimal;

/// Presentation of a price: scientific below 1e-6, ten decimals below 1000,
/// six decimals above, trailing zeros stripped.
pub fn format_price(price: &Decimal) -> String {
    if price.is_zero() {
        return "0".to_string();
    }
    let magnitude = price.abs();
    if magnitude < Decimal::new(1, -6) {
        price.to_scientific(2)
    } else if magnitude < Decimal::new(1000, 0) {
        strip_zeros(price.to_fixed(10))
    } else {
        strip_zeros(price.to_fixed(6))
    }
}

fn strip_zeros(fixed: String) -> String {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
