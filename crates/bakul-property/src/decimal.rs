//! Fixed-point decimal numbers for `decimal` properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PropertyError, PropertyResult};

/// Digits kept after the decimal point.
pub const DECIMAL_PLACES: u32 = 10;

/// Total significant digits a value may have.
pub const MAX_DIGITS: u32 = 30;

const SCALE: i128 = 10_i128.pow(DECIMAL_PLACES);
const LIMIT: i128 = 10_i128.pow(MAX_DIGITS);

/// Exact decimal with 10 fractional digits and at most 30 digits overall.
///
/// Stored as an integer count of `10^-10` units, so equality and ordering
/// are exact. Serialized as its canonical string form.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    units: i128,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal { units: 0 };

    /// Build from a raw count of `10^-10` units.
    pub fn from_units(units: i128) -> PropertyResult<Self> {
        if units.unsigned_abs() >= LIMIT.unsigned_abs() {
            return Err(PropertyError::InvalidDecimal {
                input: units.to_string(),
                reason: format!("more than {MAX_DIGITS} digits"),
            });
        }
        Ok(Self { units })
    }

    /// The raw count of `10^-10` units.
    pub fn units(&self) -> i128 {
        self.units
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// Nearest `f64`; may lose precision.
    pub fn to_f64(&self) -> f64 {
        self.units as f64 / SCALE as f64
    }

    /// Parse a plain decimal literal such as `-12.5` or `.25`.
    pub fn parse(input: &str) -> PropertyResult<Self> {
        let invalid = |reason: &str| PropertyError::InvalidDecimal {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("unexpected character"));
        }
        if frac_part.len() > DECIMAL_PLACES as usize {
            return Err(invalid("too many decimal places"));
        }

        let int_digits = int_part.trim_start_matches('0');
        if int_digits.len() > (MAX_DIGITS - DECIMAL_PLACES) as usize {
            return Err(invalid("too many digits"));
        }

        let int_value: i128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid("too many digits"))?
        };
        let frac_value: i128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<width$}", width = DECIMAL_PLACES as usize);
            padded.parse().map_err(|_| invalid("unexpected character"))?
        };

        let magnitude = int_value * SCALE + frac_value;
        let units = if negative { -magnitude } else { magnitude };
        Self::from_units(units).map_err(|_| invalid("too many digits"))
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.units.unsigned_abs();
        let int_part = magnitude / SCALE as u128;
        let frac_part = magnitude % SCALE as u128;
        if self.units < 0 {
            f.write_str("-")?;
        }
        write!(f, "{int_part}")?;
        if frac_part != 0 {
            let frac = format!("{frac_part:0>width$}", width = DECIMAL_PLACES as usize);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl FromStr for Decimal {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Decimal {
    type Error = PropertyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Decimal> for String {
    fn from(d: Decimal) -> Self {
        d.to_string()
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        // 19 integer digits always fit under the 30-digit limit.
        Self {
            units: n as i128 * SCALE,
        }
    }
}
