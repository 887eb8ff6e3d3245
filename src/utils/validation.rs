//! Value validation for individual global options.
//!
//! Each validator receives one scalar value, or one entry of a list option,
//! and returns the reason it was rejected. The mutation engine turns that
//! reason into an `InvalidValue` error naming the option.

use crate::constants::{OMITTABLE_CONTAINERS, TABLE_STYLES, XDEBUG_IDE_LOCATIONS};
use std::net::IpAddr;

/// Validate a `table-style` value. Empty clears the style.
///
/// # Example
///
/// ```ignore
/// use crate::utils::validation::validate_table_style;
///
/// assert!(validate_table_style("bright").is_ok());
/// assert!(validate_table_style("fancy").is_err());
/// ```
pub fn validate_table_style(value: &str) -> Result<(), String> {
    if value.is_empty() || TABLE_STYLES.contains(&value) {
        Ok(())
    } else {
        Err(format!("must be one of {}", TABLE_STYLES.join(", ")))
    }
}

/// Reject values that would break the one-line-per-option listing
pub fn validate_single_line(value: &str) -> Result<(), String> {
    if value.chars().any(char::is_control) {
        Err("must not contain control characters".to_string())
    } else {
        Ok(())
    }
}

/// Validate one entry of `omit-containers`
pub fn validate_omittable_container(value: &str) -> Result<(), String> {
    if OMITTABLE_CONTAINERS.contains(&value) {
        Ok(())
    } else {
        Err(format!("only {} may be omitted", OMITTABLE_CONTAINERS.join(", ")))
    }
}

/// Validate an `xdebug-ide-location`: empty, a named location, or an IP address
pub fn validate_xdebug_ide_location(value: &str) -> Result<(), String> {
    if value.is_empty()
        || XDEBUG_IDE_LOCATIONS.contains(&value)
        || value.parse::<IpAddr>().is_ok()
    {
        Ok(())
    } else {
        Err(format!(
            "must be empty, {} or an IP address",
            XDEBUG_IDE_LOCATIONS.join(", ")
        ))
    }
}
