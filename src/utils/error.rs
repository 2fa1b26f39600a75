use std::error::Error;
use std::fmt;

use super::core_math::Decimal;

/// Input outside the domain of a conversion. Never retried: the input is simply invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeError {
    TickOutOfBounds { tick: i64, max_tick: i32 },
    PriceNotPositive,
    PriceOutOfBounds {
        price: Decimal,
        min: Decimal,
        max: Decimal,
    },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RangeError::TickOutOfBounds { tick, max_tick } => {
                write!(f, "Tick {} is out of bounds. Max: ±{}", tick, max_tick)
            }
            RangeError::PriceNotPositive => write!(f, "Price must be positive"),
            RangeError::PriceOutOfBounds { price, min, max } => write!(
                f,
                "Price {} is out of bounds [{}, {}]",
                price,
                min.to_scientific(5),
                max.to_scientific(5)
            ),
        }
    }
}

impl Error for RangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseDecimalError {
    Empty,
    InvalidDigit,
    InvalidExponent,
    ExponentOutOfRange,
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseDecimalError::Empty => write!(f, "empty decimal"),
            ParseDecimalError::InvalidDigit => write!(f, "invalid digit in decimal"),
            ParseDecimalError::InvalidExponent => write!(f, "invalid exponent"),
            ParseDecimalError::ExponentOutOfRange => write!(f, "exponent out of range"),
        }
    }
}

impl Error for ParseDecimalError {}

/// Command text the shell could not turn into a conversion request.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    InvalidFormat(String),
    UnknownCommand(String),
    InvalidTick(String),
    InvalidPrice {
        input: String,
        source: ParseDecimalError,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidFormat(line) => write!(
                f,
                "Invalid format: '{}'. Use: t <tick> or p <price>",
                line
            ),
            ParseError::UnknownCommand(command) => write!(
                f,
                "Unknown command: '{}'. Use 't' for tick or 'p' for price",
                command
            ),
            ParseError::InvalidTick(value) => {
                write!(f, "Invalid tick: '{}' is not a valid integer", value)
            }
            ParseError::InvalidPrice { input, .. } => {
                write!(f, "Invalid price: '{}' is not a valid number", input)
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::InvalidPrice { source, .. } => Some(source),
            _ => None,
        }
    }
}
