//! Salesperson validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during salesperson validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SalespersonValidationError {
    #[error("Salesperson ID must be a positive integer, got {0}")]
    NonPositiveId(i64),

    #[error("Salesperson ID is not an integer: '{0}'")]
    InvalidId(String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email is not a valid address: '{0}'")]
    InvalidEmail(String),

    #[error("A salesperson cannot be their own manager")]
    SelfManaged,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a salesperson ID (database identity, always positive)
pub fn validate_salesperson_id(id: i64) -> Result<(), SalespersonValidationError> {
    if id <= 0 {
        return Err(SalespersonValidationError::NonPositiveId(id));
    }

    Ok(())
}

/// Validate a display name
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 100 characters
pub fn validate_name(name: &str) -> Result<(), SalespersonValidationError> {
    if name.trim().is_empty() {
        return Err(SalespersonValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(SalespersonValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 255 characters
/// - Must be an address the login request validator accepts
pub fn validate_email(email: &str) -> Result<(), SalespersonValidationError> {
    if email.is_empty() {
        return Err(SalespersonValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(SalespersonValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !email.validate_email() {
        return Err(SalespersonValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a plaintext password before hashing
pub fn validate_password(password: &str) -> Result<(), SalespersonValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(SalespersonValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(SalespersonValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
