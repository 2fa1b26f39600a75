use crate::utils::core_math::Decimal;
use crate::utils::error::RangeError;
use crate::utils::price_calcs::{
    price_0to1_to_1to0, price_accuracy, price_to_tick, tick_to_price, validate_round_trip,
};

/// Ticks shown by the examples table, with the ratio each one roughly encodes.
pub const EXAMPLE_TICKS: [(i32, &str); 5] = [
    (0, "1:1 price ratio"),
    (23027, "~10:1 price ratio"),
    (-23027, "~0.1:1 price ratio"),
    (69078, "~1000:1 price ratio"),
    (-69078, "~0.001:1 price ratio"),
];

/// Below this (in percent) a snapped price is reported as highly accurate.
pub const HIGH_ACCURACY_PCT: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct TickConversion {
    pub tick: i64,
    pub price_0to1: Decimal,
    pub price_1to0: Decimal,
    pub round_trip_ok: bool,
}

impl TickConversion {
    pub fn from_tick(tick: i64) -> Result<Self, RangeError> {
        let price_0to1 = tick_to_price(tick)?;
        let price_1to0 = price_0to1_to_1to0(&price_0to1)?;
        Ok(Self {
            tick,
            price_0to1,
            price_1to0,
            round_trip_ok: validate_round_trip(tick),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceConversion {
    pub price: Decimal,
    pub tick: i32,
    pub verified_price: Decimal,
    pub inverse_price: Decimal,
    // percent
    pub accuracy: f64,
}

impl PriceConversion {
    pub fn from_price(price: Decimal) -> Result<Self, RangeError> {
        let tick = price_to_tick(&price)?;
        Ok(Self {
            price,
            tick,
            verified_price: tick_to_price(i64::from(tick))?,
            inverse_price: price_0to1_to_1to0(&price)?,
            accuracy: price_accuracy(&price, tick)?,
        })
    }

    pub fn is_high_accuracy(&self) -> bool {
        self.accuracy < HIGH_ACCURACY_PCT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExampleRow {
    pub tick: i32,
    pub price: Decimal,
    pub description: &'static str,
}

pub fn example_rows() -> Result<Vec<ExampleRow>, RangeError> {
    EXAMPLE_TICKS
        .iter()
        .map(|&(tick, description)| {
            Ok(ExampleRow {
                tick,
                price: tick_to_price(i64::from(tick))?,
                description,
            })
        })
        .collect()
}
