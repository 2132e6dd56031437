//! Authentication infrastructure module
//!
//! This module provides signed JWT issuance and verification.

mod jwt;

pub use jwt::{
    parse_algorithm, JwtClaims, JwtConfig, JwtService, TokenService, MAX_EXPIRATION_SECONDS,
    TOKEN_TYPE,
};
