use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::error::PropertyError;
use crate::value::PropertyValue;

/// The closed set of property variants.
///
/// Each kind has a short name (`"integer"`) used in schemas and an
/// implementation name (`"IntegerProperty"`) recorded on field types.
/// Either parses back into the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Boolean,
    NullBoolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Decimal,
    Float,
    Integer,
    Text,
    Time,
}

impl PropertyKind {
    /// Every kind, in declaration order.
    pub const ALL: [PropertyKind; 10] = [
        Self::String,
        Self::Boolean,
        Self::NullBoolean,
        Self::Date,
        Self::DateTime,
        Self::Decimal,
        Self::Float,
        Self::Integer,
        Self::Text,
        Self::Time,
    ];

    /// Schema-facing name, e.g. `"null_boolean"`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::NullBoolean => "null_boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Time => "time",
        }
    }

    /// Implementation name, e.g. `"NullBooleanProperty"`.
    pub fn implementation_name(&self) -> &'static str {
        match self {
            Self::String => "StringProperty",
            Self::Boolean => "BooleanProperty",
            Self::NullBoolean => "NullBooleanProperty",
            Self::Date => "DateProperty",
            Self::DateTime => "DateTimeProperty",
            Self::Decimal => "DecimalProperty",
            Self::Float => "FloatProperty",
            Self::Integer => "IntegerProperty",
            Self::Text => "TextProperty",
            Self::Time => "TimeProperty",
        }
    }

    /// Name of the native value type, used in mismatch reports.
    pub fn native_type(&self) -> &'static str {
        match self {
            Self::String | Self::Text => "text",
            Self::Boolean => "bool",
            Self::NullBoolean => "bool or null",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Time => "time",
        }
    }

    /// Whether the kind admits [`PropertyValue::Null`].
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Self::Boolean)
    }

    /// Whether `value` has this kind's native type.
    ///
    /// Floats must be finite: NaN and infinities have no JSON form.
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (_, PropertyValue::Null) => self.is_nullable(),
            (Self::String | Self::Text, PropertyValue::Text(_)) => true,
            (Self::Boolean | Self::NullBoolean, PropertyValue::Bool(_)) => true,
            (Self::Date, PropertyValue::Date(_)) => true,
            (Self::DateTime, PropertyValue::DateTime(_)) => true,
            (Self::Decimal, PropertyValue::Decimal(_)) => true,
            (Self::Float, PropertyValue::Float(f)) => f.is_finite(),
            (Self::Integer, PropertyValue::Integer(_)) => true,
            (Self::Time, PropertyValue::Time(_)) => true,
            _ => false,
        }
    }

    /// Value a freshly instantiated property of this kind holds.
    ///
    /// Temporal kinds start at `now`.
    pub fn default_value(&self, now: DateTime<Utc>) -> PropertyValue {
        match self {
            Self::String | Self::Text => PropertyValue::Text(String::new()),
            Self::Boolean | Self::NullBoolean => PropertyValue::Bool(false),
            Self::Date => PropertyValue::Date(now.date_naive()),
            Self::DateTime => PropertyValue::DateTime(now),
            Self::Decimal => PropertyValue::Decimal(Decimal::ZERO),
            Self::Float => PropertyValue::Float(0.0),
            Self::Integer => PropertyValue::Integer(0),
            Self::Time => PropertyValue::Time(now.time()),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for PropertyKind {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.short_name() == s || k.implementation_name() == s)
            .ok_or_else(|| PropertyError::UnknownKind(s.to_string()))
    }
}
