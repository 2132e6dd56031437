//! Identity claims carried inside signed tokens

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::salesperson::{Salesperson, SalespersonId};

/// Claims to embed when issuing a token. The subject is mandatory by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub salesperson_id: SalespersonId,
    pub email: Option<String>,
}

impl TokenSubject {
    pub fn new(salesperson_id: SalespersonId, email: Option<String>) -> Self {
        Self {
            salesperson_id,
            email,
        }
    }

    pub fn from_salesperson(salesperson: &Salesperson) -> Self {
        Self::new(salesperson.id(), Some(salesperson.email().to_string()))
    }
}

/// Claims recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: SalespersonId,
    pub email: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// The subject/email pair, as it was handed to the issuer
    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject::new(self.subject, self.email.clone())
    }
}

/// The caller of a protected request, built fresh from token claims.
///
/// It is not re-checked against the directory: a salesperson deactivated
/// after login keeps a working token until it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub salesperson_id: SalespersonId,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenClaims> for AuthenticatedIdentity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            salesperson_id: claims.subject,
            email: claims.email,
            expires_at: claims.expires_at,
        }
    }
}
