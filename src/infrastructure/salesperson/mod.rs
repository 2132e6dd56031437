//! Salesperson infrastructure module
//!
//! Password hashing with Argon2, the in-memory and PostgreSQL directories,
//! and the service behind login.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresSalespersonRepository;
pub use repository::InMemorySalespersonRepository;
pub use service::{LoginError, LoginOutcome, RegisterSalespersonRequest, SalespersonService};
