//! Salesperson directory trait

use std::collections::HashSet;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewSalesperson, Salesperson, SalespersonId};
use crate::domain::DomainError;

/// Read/write access to the salesperson directory
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SalespersonRepository: Send + Sync {
    /// Get a salesperson by ID
    async fn get(&self, id: SalespersonId) -> Result<Option<Salesperson>, DomainError>;

    /// Get a salesperson by email (login identifier)
    async fn get_by_email(&self, email: &str) -> Result<Option<Salesperson>, DomainError>;

    /// List every salesperson, ordered by ID
    async fn list(&self) -> Result<Vec<Salesperson>, DomainError>;

    /// Every ID referenced as someone's manager
    async fn manager_ids(&self) -> Result<HashSet<SalespersonId>, DomainError>;

    /// Store a new salesperson and assign its ID.
    /// Fails with a conflict on duplicate email and with a validation error
    /// when the referenced manager does not exist.
    async fn create(&self, salesperson: NewSalesperson) -> Result<Salesperson, DomainError>;
}
