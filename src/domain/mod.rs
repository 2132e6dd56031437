//! Domain layer - Core business logic and entities

pub mod auth;
pub mod error;
pub mod salesperson;

pub use auth::{AuthError, AuthenticatedIdentity, TokenClaims, TokenSubject};
pub use error::DomainError;
pub use salesperson::{
    is_manager, ManagerIndex, NewSalesperson, Salesperson, SalespersonId, SalespersonRepository,
    SalespersonValidationError,
};
