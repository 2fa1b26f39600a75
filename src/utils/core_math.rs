use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;
use std::sync::OnceLock;

use uint::construct_uint;

use super::error::ParseDecimalError;

construct_uint! {
    pub struct U512(8);
}

/// Significant digits of every value handed back to callers.
pub const PRECISION: u32 = 50;

/// Significant digits kept by intermediate results (20 guard digits).
pub const WORKING_DIGITS: u32 = 70;

// Anything beyond this is rejected when parsing.
const MAX_EXPONENT: i64 = 999_999_999;

// 10^154 is the largest power of ten below 2^512.
const MAX_POW10: usize = 154;

static POWERS_OF_TEN: OnceLock<Vec<U512>> = OnceLock::new();

/// `10^n` from a table built on first use.
pub fn pow10(n: usize) -> U512 {
    let table = POWERS_OF_TEN.get_or_init(|| {
        let mut powers = Vec::with_capacity(MAX_POW10 + 1);
        let mut power = U512::one();
        powers.push(power);
        for _ in 0..MAX_POW10 {
            power = power * 10u64;
            powers.push(power);
        }
        powers
    });
    table.get(n).copied().unwrap_or_else(|| U512::exp10(n))
}

/// Number of decimal digits in `value` (0 for zero).
pub fn digit_count(value: &U512) -> u32 {
    if value.is_zero() {
        return 0;
    }
    // 0.30102 < log10(2), so this never overshoots.
    let bits = value.bits() as u64;
    let mut digits = ((bits - 1) * 30_102 / 100_000) as usize + 1;
    while digits <= MAX_POW10 && *value >= pow10(digits) {
        digits += 1;
    }
    digits as u32
}

/// Signed decimal floating point number: `(-1)^negative * coefficient * 10^exponent`.
///
/// Every arithmetic result is rounded half-even to [`WORKING_DIGITS`] significant
/// digits, which bounds coefficients to 70 digits so that products and scaled
/// dividends always fit in a [`U512`].
#[derive(Clone, Copy, Debug)]
pub struct Decimal {
    negative: bool,
    coefficient: U512,
    exponent: i64,
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl Decimal {
    /// `coefficient * 10^exponent`.
    pub fn new(coefficient: u128, exponent: i64) -> Self {
        Self::from_parts(false, U512::from(coefficient), exponent)
    }

    /// `(hi * 10^35 + lo) * 10^exponent`, for constants longer than a `u128`.
    pub fn from_halves(hi: u128, lo: u128, exponent: i64) -> Self {
        let coefficient = U512::from(hi) * pow10(35) + U512::from(lo);
        Self::from_parts(false, coefficient, exponent)
    }

    pub fn zero() -> Self {
        Self {
            negative: false,
            coefficient: U512::zero(),
            exponent: 0,
        }
    }

    pub fn one() -> Self {
        Self {
            negative: false,
            coefficient: U512::one(),
            exponent: 0,
        }
    }

    fn from_parts(negative: bool, coefficient: U512, exponent: i64) -> Self {
        if coefficient.is_zero() {
            return Self::zero();
        }
        Self {
            negative,
            coefficient,
            exponent,
        }
        .round_sig(WORKING_DIGITS)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..*self
        }
    }

    pub fn coefficient(&self) -> U512 {
        self.coefficient
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Exponent of the most significant digit, i.e. `floor(log10(|self|))`.
    pub fn adjusted(&self) -> i64 {
        self.exponent + i64::from(digit_count(&self.coefficient)) - 1
    }

    /// Drops the `drop` least significant digits, rounding half-even.
    fn drop_digits(&self, drop: u32) -> Self {
        if drop == 0 {
            return *self;
        }
        let exponent = self.exponent + i64::from(drop);
        if drop > digit_count(&self.coefficient) {
            // below half a unit of the new last place
            return Self {
                negative: false,
                coefficient: U512::zero(),
                exponent,
            };
        }
        let divisor = pow10(drop as usize);
        let (mut quotient, remainder) = self.coefficient.div_mod(divisor);
        let half = divisor / 2u64;
        if remainder > half || (remainder == half && quotient.low_u64() & 1 == 1) {
            quotient = quotient + U512::one();
        }
        Self {
            negative: self.negative && !quotient.is_zero(),
            coefficient: quotient,
            exponent,
        }
    }

    /// Rounds half-even to `digits` significant digits.
    pub fn round_sig(&self, digits: u32) -> Self {
        let count = digit_count(&self.coefficient);
        if count <= digits {
            return *self;
        }
        let mut rounded = self.drop_digits(count - digits);
        // 99.5 -> 100: carry produced an extra digit
        if digit_count(&rounded.coefficient) > digits {
            rounded.coefficient = rounded.coefficient / 10u64;
            rounded.exponent += 1;
        }
        rounded
    }

    /// Rounds half-even so that the last kept digit sits at `10^exponent`.
    fn quantize(&self, exponent: i64) -> Self {
        if self.exponent >= exponent {
            return *self;
        }
        let drop = exponent - self.exponent;
        match u32::try_from(drop) {
            Ok(drop) => self.drop_digits(drop),
            Err(_) => Self {
                negative: false,
                coefficient: U512::zero(),
                exponent,
            },
        }
    }

    pub fn checked_div(&self, rhs: &Decimal) -> Option<Decimal> {
        if rhs.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }
        // Scale the dividend so the quotient carries WORKING_DIGITS + 1 digits.
        let shift = WORKING_DIGITS + 1 + digit_count(&rhs.coefficient) - digit_count(&self.coefficient);
        let dividend = self.coefficient * pow10(shift as usize);
        let (quotient, remainder) = dividend.div_mod(rhs.coefficient);
        // Sticky digit keeps an inexact quotient off the exact half-way point.
        let sticky = if remainder.is_zero() { 0u64 } else { 1u64 };
        Some(Self::from_parts(
            self.negative != rhs.negative,
            quotient * 10u64 + sticky,
            self.exponent - rhs.exponent - i64::from(shift) - 1,
        ))
    }

    pub fn recip(&self) -> Option<Decimal> {
        Self::one().checked_div(self)
    }

    /// `self^exponent` by square-and-multiply.
    pub fn powi(&self, exponent: u32) -> Decimal {
        let mut result = Self::one();
        let mut square = *self;
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result * square;
            }
            remaining >>= 1;
            if remaining > 0 {
                square = square * square;
            }
        }
        result
    }

    /// `|self - other|`.
    pub fn abs_diff(&self, other: &Decimal) -> Decimal {
        let (big, small) = match self.cmp_magnitude(other) {
            Ordering::Less => (other, self),
            _ => (self, other),
        };
        if small.is_zero() || big.adjusted() - small.adjusted() > i64::from(WORKING_DIGITS) + 2 {
            return big.abs();
        }
        let exponent = big.exponent.min(small.exponent);
        let big_coefficient = big.coefficient * pow10((big.exponent - exponent) as usize);
        let small_coefficient = small.coefficient * pow10((small.exponent - exponent) as usize);
        let coefficient = if self.negative == other.negative {
            big_coefficient - small_coefficient
        } else {
            big_coefficient + small_coefficient
        };
        Self::from_parts(false, coefficient, exponent)
    }

    fn cmp_magnitude(&self, other: &Decimal) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        match self.adjusted().cmp(&other.adjusted()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        // Same leading position, so the exponents differ by less than 70.
        if self.exponent >= other.exponent {
            let scaled = self.coefficient * pow10((self.exponent - other.exponent) as usize);
            scaled.cmp(&other.coefficient)
        } else {
            let scaled = other.coefficient * pow10((other.exponent - self.exponent) as usize);
            self.coefficient.cmp(&scaled)
        }
    }

    /// Nearest `f64`; overflows to infinity and underflows to zero like a float literal.
    pub fn to_f64(&self) -> f64 {
        let magnitude = format!("{}e{}", self.coefficient, self.exponent)
            .parse::<f64>()
            .unwrap_or(f64::NAN);
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Fixed-point rendering with exactly `decimals` fractional digits.
    pub fn to_fixed(&self, decimals: u32) -> String {
        // 10^100 and up would mean padding with an unbounded number of zeros
        if !self.is_zero() && self.adjusted() > 100 {
            return self.to_scientific(decimals);
        }
        let value = self.quantize(-i64::from(decimals));
        let mut digits = value.coefficient.to_string();
        if value.exponent > -i64::from(decimals) {
            let pad = (value.exponent + i64::from(decimals)) as usize;
            digits.push_str(&"0".repeat(pad));
        }
        let decimals = decimals as usize;
        if digits.len() <= decimals {
            digits = format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits);
        }
        let sign = if value.is_negative() { "-" } else { "" };
        if decimals == 0 {
            return format!("{sign}{digits}");
        }
        let (integer, fraction) = digits.split_at(digits.len() - decimals);
        format!("{sign}{integer}.{fraction}")
    }

    /// Scientific rendering with `decimals` digits after the point, e.g. `4.95e-25`.
    pub fn to_scientific(&self, decimals: u32) -> String {
        let value = self.round_sig(decimals + 1);
        let adjusted = if value.is_zero() { 0 } else { value.adjusted() };
        let mut digits = value.coefficient.to_string();
        let wanted = decimals as usize + 1;
        if digits.len() < wanted {
            digits.push_str(&"0".repeat(wanted - digits.len()));
        }
        let sign = if value.is_negative() { "-" } else { "" };
        let exponent_sign = if adjusted < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{sign}{head}e{exponent_sign}{}", adjusted.abs())
        } else {
            format!("{sign}{head}.{tail}e{exponent_sign}{}", adjusted.abs())
        }
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal::from_parts(
            self.negative != rhs.negative,
            self.coefficient * rhs.coefficient,
            self.exponent + rhs.exponent,
        )
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.coefficient.to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let adjusted = self.exponent + digits.len() as i64 - 1;

        if self.exponent <= 0 && adjusted >= -6 {
            if self.exponent == 0 {
                return write!(f, "{}{}", sign, digits);
            }
            let point = digits.len() as i64 + self.exponent;
            if point > 0 {
                let (integer, fraction) = digits.split_at(point as usize);
                write!(f, "{}{}.{}", sign, integer, fraction)
            } else {
                write!(f, "{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
            }
        } else {
            let (head, tail) = digits.split_at(1);
            let exponent_sign = if adjusted < 0 { '-' } else { '+' };
            if tail.is_empty() {
                write!(f, "{}{}E{}{}", sign, head, exponent_sign, adjusted.abs())
            } else {
                write!(f, "{}{}.{}E{}{}", sign, head, tail, exponent_sign, adjusted.abs())
            }
        }
    }
}

fn parse_exponent(text: &str) -> Result<i64, ParseDecimalError> {
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDecimalError::InvalidExponent);
    }
    let magnitude = digits.trim_start_matches('0');
    if magnitude.len() > 9 {
        return Err(ParseDecimalError::ExponentOutOfRange);
    }
    let value: i64 = if magnitude.is_empty() {
        0
    } else {
        magnitude
            .parse()
            .map_err(|_| ParseDecimalError::InvalidExponent)?
    };
    if value > MAX_EXPONENT {
        return Err(ParseDecimalError::ExponentOutOfRange);
    }
    Ok(if text.starts_with('-') { -value } else { value })
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseDecimalError::Empty);
        }
        let negative = text.starts_with('-');
        let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);

        let (mantissa, mut exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(index) => (&unsigned[..index], parse_exponent(&unsigned[index + 1..])?),
            None => (unsigned, 0),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(ParseDecimalError::InvalidDigit);
        }
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ParseDecimalError::InvalidDigit);
        }

        exponent -= fraction.len() as i64;
        let all_digits = format!("{integer}{fraction}");
        let significant = all_digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(Self::zero());
        }

        // Keep one digit past working precision plus a sticky digit for the rest.
        let keep = WORKING_DIGITS as usize + 1;
        let coefficient = if significant.len() > keep {
            let (head, tail) = significant.split_at(keep);
            let sticky = u64::from(tail.bytes().any(|b| b != b'0'));
            exponent += (tail.len() - 1) as i64;
            U512::from_dec_str(head).map_err(|_| ParseDecimalError::InvalidDigit)? * 10u64 + sticky
        } else {
            U512::from_dec_str(significant).map_err(|_| ParseDecimalError::InvalidDigit)?
        };

        Ok(Self::from_parts(negative, coefficient, exponent))
    }
}
