use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PropertyError, PropertyResult};
use crate::kind::PropertyKind;
use crate::value::PropertyValue;

/// A value bound to a [`PropertyKind`].
///
/// The held value is always accepted by the kind: construction, assignment
/// and deserialization all go through [`PropertyKind::accepts`]. The check
/// is against the kind's declared native type, never against whatever value
/// happens to be stored, so a null value does not loosen it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTypedValue")]
pub struct TypedValue {
    kind: PropertyKind,
    value: PropertyValue,
}

#[derive(Deserialize)]
struct RawTypedValue {
    kind: PropertyKind,
    value: PropertyValue,
}

impl TryFrom<RawTypedValue> for TypedValue {
    type Error = PropertyError;

    fn try_from(raw: RawTypedValue) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.value)
    }
}

impl TypedValue {
    /// Bind `value` to `kind`, failing if the native types differ.
    pub fn new(kind: PropertyKind, value: impl Into<PropertyValue>) -> PropertyResult<Self> {
        let value = check(kind, value.into())?;
        Ok(Self { kind, value })
    }

    /// The kind's default value; temporal kinds start at `now`.
    pub fn with_default(kind: PropertyKind, now: DateTime<Utc>) -> Self {
        Self {
            kind,
            value: kind.default_value(now),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn into_value(self) -> PropertyValue {
        self.value
    }

    /// Replace the value, returning the previous one.
    ///
    /// On mismatch the stored value is left untouched.
    pub fn assign(&mut self, value: impl Into<PropertyValue>) -> PropertyResult<PropertyValue> {
        let value = check(self.kind, value.into())?;
        Ok(std::mem::replace(&mut self.value, value))
    }

    /// Check `value` against this kind without assigning it.
    pub fn check(&self, value: &PropertyValue) -> PropertyResult<()> {
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(mismatch(self.kind, value))
        }
    }
}

fn check(kind: PropertyKind, value: PropertyValue) -> PropertyResult<PropertyValue> {
    if kind.accepts(&value) {
        Ok(value)
    } else {
        Err(mismatch(kind, &value))
    }
}

fn mismatch(kind: PropertyKind, value: &PropertyValue) -> PropertyError {
    PropertyError::TypeMismatch {
        expected: kind.native_type().to_string(),
        found: match value {
            PropertyValue::Float(f) if !f.is_finite() => format!("non-finite {}", value.type_name()),
            _ => value.type_name().to_string(),
        },
    }
}
