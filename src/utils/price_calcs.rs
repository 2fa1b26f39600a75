//! Conversions between tick indexes and prices on the `1.0001^tick` grid.
//!
//! Prices are [`Decimal`]s rounded to [`PRECISION`] significant digits. Intermediate
//! powers are carried at working precision so that `1.0001^559680` is still
//! correct in its 50th digit.

use std::sync::OnceLock;

use log::{debug, warn};

use super::core_math::{Decimal, PRECISION};
use super::error::RangeError;

/// Largest tick magnitude; prices live in `[BASE^-MAX_TICK, BASE^MAX_TICK]`.
pub const MAX_TICK: i32 = 559_680;

const BASE_F64: f64 = 1.0001;

/// 1.0001
pub fn base() -> Decimal {
    Decimal::new(10_001, -4)
}

// sqrt(1.0001) to 70 digits: BASE^tick * sqrt_base() is the geometric midpoint
// between `tick` and `tick + 1`.
fn sqrt_base() -> Decimal {
    Decimal::from_halves(
        10_000_499_987_500_624_960_940_234_169_937_986,
        97_215_498_950_656_864_788_436_870_065_842_192,
        -69,
    )
}

#[derive(Debug, Clone, Copy)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

static PRICE_BOUNDS: OnceLock<PriceBounds> = OnceLock::new();

/// `[BASE^-MAX_TICK, BASE^MAX_TICK]` at [`PRECISION`], derived once from [`MAX_TICK`].
pub fn price_bounds() -> &'static PriceBounds {
    PRICE_BOUNDS.get_or_init(|| PriceBounds {
        min: price_at(-MAX_TICK).round_sig(PRECISION),
        max: price_at(MAX_TICK).round_sig(PRECISION),
    })
}

pub fn min_price() -> Decimal {
    price_bounds().min
}

pub fn max_price() -> Decimal {
    price_bounds().max
}

// BASE^tick at working precision, no range check.
fn price_at(tick: i32) -> Decimal {
    let magnitude = base().powi(tick.unsigned_abs());
    if tick >= 0 {
        magnitude
    } else {
        // a power of 1.0001 is never zero
        magnitude.recip().unwrap_or_default()
    }
}

fn checked_tick(tick: i64) -> Result<i32, RangeError> {
    match i32::try_from(tick) {
        Ok(tick) if tick.unsigned_abs() <= MAX_TICK.unsigned_abs() => Ok(tick),
        _ => Err(RangeError::TickOutOfBounds {
            tick,
            max_tick: MAX_TICK,
        }),
    }
}

/// Price of token0 in token1 at `tick`: `1.0001^tick`.
pub fn tick_to_price(tick: i64) -> Result<Decimal, RangeError> {
    let tick = checked_tick(tick)?;
    let price = price_at(tick).round_sig(PRECISION);
    debug!("tick {} -> price {}", tick, price);
    Ok(price)
}

/// Nearest tick (in log space) to `price`.
pub fn price_to_tick(price: &Decimal) -> Result<i32, RangeError> {
    if !price.is_positive() {
        return Err(RangeError::PriceNotPositive);
    }
    let bounds = price_bounds();
    if *price < bounds.min || *price > bounds.max {
        return Err(RangeError::PriceOutOfBounds {
            price: *price,
            min: bounds.min,
            max: bounds.max,
        });
    }

    let estimate = estimate_tick(price);
    let tick = refine_tick(price, estimate);
    if tick != estimate {
        debug!("price {}: float estimate {} corrected to {}", price, estimate, tick);
    }
    debug!("price {} -> tick {}", price, tick);
    Ok(tick)
}

fn log_base(value: f64) -> i32 {
    (value.ln() / BASE_F64.ln()).round() as i32
}

// Float logarithm, within a tick of the answer. Prices below one are inverted
// first so the logarithm never sees a value near zero.
fn estimate_tick(price: &Decimal) -> i32 {
    let estimate = if *price >= Decimal::one() {
        log_base(price.to_f64())
    } else {
        price.recip().map_or(0, |inverse| -log_base(inverse.to_f64()))
    };
    estimate.clamp(-MAX_TICK, MAX_TICK)
}

fn upper_midpoint(tick: i32) -> Decimal {
    price_at(tick) * sqrt_base()
}

// Walks the estimate until BASE^(tick - 1/2) <= price < BASE^(tick + 1/2).
// Both sides use upper_midpoint so the walk cannot oscillate.
fn refine_tick(price: &Decimal, estimate: i32) -> i32 {
    let mut tick = estimate;
    loop {
        if tick < MAX_TICK && *price >= upper_midpoint(tick) {
            tick += 1;
        } else if tick > -MAX_TICK && *price < upper_midpoint(tick - 1) {
            tick -= 1;
        } else {
            return tick;
        }
    }
}

/// Reciprocal price: token1 in token0.
pub fn price_0to1_to_1to0(price: &Decimal) -> Result<Decimal, RangeError> {
    if !price.is_positive() {
        return Err(RangeError::PriceNotPositive);
    }
    price
        .recip()
        .map(|inverse| inverse.round_sig(PRECISION))
        .ok_or(RangeError::PriceNotPositive)
}

/// True when tick -> price -> tick lands within one tick of the start.
/// Any conversion failure counts as inaccurate.
pub fn validate_round_trip(tick: i64) -> bool {
    match tick_to_price(tick).and_then(|price| price_to_tick(&price)) {
        Ok(recovered) => (tick - i64::from(recovered)).abs() <= 1,
        Err(err) => {
            warn!("round trip for tick {} failed: {}", tick, err);
            false
        }
    }
}

/// Distance between `price` and the price of `tick`, in percent of `price`.
pub fn price_accuracy(price: &Decimal, tick: i32) -> Result<f64, RangeError> {
    if !price.is_positive() {
        return Err(RangeError::PriceNotPositive);
    }
    let snapped = tick_to_price(i64::from(tick))?;
    let relative = price
        .abs_diff(&snapped)
        .checked_div(price)
        .ok_or(RangeError::PriceNotPositive)?;
    Ok(relative.to_f64() * 100.0)
}
