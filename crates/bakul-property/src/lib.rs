//! Typed property values for Bakul.
//!
//! A property is a leaf of the item tree holding exactly one value. Its
//! [`PropertyKind`] fixes the native type of that value, and every write goes
//! through a compatibility check that either accepts the value unchanged or
//! fails with [`PropertyError::TypeMismatch`]. Nothing is coerced.
//!
//! # Kinds
//!
//! | Kind           | Native value                 | Nullable |
//! |----------------|------------------------------|----------|
//! | `string`       | `String`                     | yes      |
//! | `boolean`      | `bool`                       | no       |
//! | `null_boolean` | `Option<bool>`               | yes      |
//! | `date`         | `chrono::NaiveDate`          | yes      |
//! | `datetime`     | `chrono::DateTime<Utc>`      | yes      |
//! | `decimal`      | [`Decimal`]                  | yes      |
//! | `float`        | `f64`                        | yes      |
//! | `integer`      | `i64`                        | yes      |
//! | `text`         | `String`                     | yes      |
//! | `time`         | `chrono::NaiveTime`          | yes      |
//!
//! # Modules
//!
//! - [`kind`] — [`PropertyKind`] and its naming/default rules
//! - [`value`] — [`PropertyValue`], the dynamically typed value
//! - [`typed`] — [`TypedValue`], a value bound to a kind
//! - [`decimal`] — fixed-point [`Decimal`]
//! - [`error`] — [`PropertyError`]

pub mod decimal;
pub mod error;
pub mod kind;
pub mod typed;
pub mod value;

pub use decimal::Decimal;
pub use error::{PropertyError, PropertyResult};
pub use kind::PropertyKind;
pub use typed::TypedValue;
pub use value::PropertyValue;
