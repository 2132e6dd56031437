//! Authentication domain
//!
//! Token claim types and the rejection taxonomy shared by the credential
//! verifier and the token service.

mod claims;
mod error;

pub use claims::{AuthenticatedIdentity, TokenClaims, TokenSubject};
pub use error::AuthError;
