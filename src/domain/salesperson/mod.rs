//! Salesperson domain
//!
//! Salesperson accounts, the manager hierarchy and the directory trait the
//! authentication flow reads from.

mod entity;
mod hierarchy;
mod repository;
mod validation;

pub use entity::{NewSalesperson, Salesperson, SalespersonId};
pub use hierarchy::{is_manager, ManagerIndex};
pub use repository::SalespersonRepository;
pub use validation::{
    validate_email, validate_name, validate_password, validate_salesperson_id,
    SalespersonValidationError,
};

#[cfg(test)]
pub use repository::MockSalespersonRepository;
