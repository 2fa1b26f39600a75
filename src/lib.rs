pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use utils::core_math::{Decimal, PRECISION, WORKING_DIGITS};
pub use utils::error::{ParseDecimalError, ParseError, RangeError};
pub use utils::price_calcs::{
    max_price, min_price, price_0to1_to_1to0, price_to_tick, tick_to_price, validate_round_trip,
    MAX_TICK,
};
