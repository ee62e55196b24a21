//! Schema name validation.
//!
//! Valid field type, node type and field names:
//! - Must be non-empty
//! - Must be at most [`MAX_NAME_LEN`] characters
//! - Must not contain whitespace or control characters

use crate::error::{Result, SchemaError};

/// Longest accepted schema name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Validate a schema name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use bakul_schema::names::validate_name;
///
/// assert!(validate_name("article").is_ok());
/// assert!(validate_name("bakul:node").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("two words").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".into(),
        });
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: format!("longer than {MAX_NAME_LEN} characters ({len})"),
        });
    }

    if let Some(ch) = name.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }

    Ok(())
}
