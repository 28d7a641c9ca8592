use bigdecimal::BigDecimal;
use std::fmt;

pub const SELLER_NAME_MAX_LEN: usize = 255;
pub const SELLER_ID_MAX_LEN: usize = 32;
pub const SELLER_ADDRESS_MAX_LEN: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Drops non-whitespace control characters and collapses runs of whitespace.
pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control() || ch.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_seller_name(name: &str) -> ValidationResult {
    validate_required("seller_name", name)?;
    validate_max_len("seller_name", name, SELLER_NAME_MAX_LEN)
}

pub fn validate_seller_id(id_number: &str) -> ValidationResult {
    validate_required("seller_id", id_number)?;
    validate_max_len("seller_id", id_number, SELLER_ID_MAX_LEN)
}

pub fn validate_seller_address(address: &str) -> ValidationResult {
    validate_required("seller_address", address)?;
    validate_max_len("seller_address", address, SELLER_ADDRESS_MAX_LEN)
}

pub fn validate_non_negative(field: &'static str, value: &BigDecimal) -> ValidationResult {
    if value < &BigDecimal::from(0) {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    Ok(())
}
