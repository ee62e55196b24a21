use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::error::{PropertyError, PropertyResult};
use crate::kind::PropertyKind;

/// A property value of any native type.
///
/// `String` and `Text` properties both hold [`PropertyValue::Text`];
/// `NullBoolean` holds [`PropertyValue::Bool`] or [`PropertyValue::Null`].
///
/// Borrowed text (`&str`, `char`, `Cow<str>`) converts into the owned
/// [`PropertyValue::Text`] form, so callers never need to allocate by hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Null,
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    #[serde(rename = "datetime")]
    DateTime(DateTime<Utc>),
    Decimal(Decimal),
    Float(f64),
    Integer(i64),
    Time(NaiveTime),
}

impl PropertyValue {
    /// Name of this value's native type, used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Decimal(_) => "decimal",
            Self::Float(_) => "float",
            Self::Integer(_) => "integer",
            Self::Time(_) => "time",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Parse raw text as a value of `kind`.
    ///
    /// Meant for presentation layers that only hold strings. Text kinds take
    /// the input verbatim; for every other nullable kind the literal `null`
    /// yields [`PropertyValue::Null`].
    pub fn parse_as(kind: PropertyKind, input: &str) -> PropertyResult<Self> {
        let fail = |reason: String| PropertyError::Parse {
            kind: kind.to_string(),
            input: input.to_string(),
            reason,
        };

        let is_text = matches!(kind, PropertyKind::String | PropertyKind::Text);
        let trimmed = input.trim();
        if !is_text && kind.is_nullable() && trimmed.eq_ignore_ascii_case("null") {
            return Ok(Self::Null);
        }

        match kind {
            PropertyKind::String | PropertyKind::Text => Ok(Self::Text(input.to_string())),
            PropertyKind::Boolean | PropertyKind::NullBoolean => match trimmed {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                _ => Err(fail("expected true or false".into())),
            },
            PropertyKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|e| fail(e.to_string())),
            PropertyKind::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| fail(e.to_string())),
            PropertyKind::Decimal => Decimal::parse(trimmed)
                .map(Self::Decimal)
                .map_err(|e| fail(e.to_string())),
            PropertyKind::Float => match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Self::Float(f)),
                Ok(_) => Err(fail("float must be finite".into())),
                Err(e) => Err(fail(e.to_string())),
            },
            PropertyKind::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| fail(e.to_string())),
            PropertyKind::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                .map(Self::Time)
                .map_err(|e| fail(e.to_string())),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Cow<'_, str>> for PropertyValue {
    fn from(s: Cow<'_, str>) -> Self {
        Self::Text(s.into_owned())
    }
}

impl From<char> for PropertyValue {
    fn from(c: char) -> Self {
        Self::Text(c.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Option<bool>> for PropertyValue {
    fn from(b: Option<bool>) -> Self {
        b.map_or(Self::Null, Self::Bool)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Decimal> for PropertyValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<NaiveTime> for PropertyValue {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}
