use thiserror::Error;

/// Authentication rejections.
///
/// Each variant folds every sub-condition that produces it; callers cannot
/// tell an unknown email from a wrong password, or an expired token from a
/// tampered one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email, inactive account or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Malformed, tampered, expired or subject-less token
    #[error("Invalid token")]
    InvalidToken,
}
