//! In-memory salesperson directory

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::salesperson::{NewSalesperson, Salesperson, SalespersonId, SalespersonRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Directory {
    salespeople: BTreeMap<SalespersonId, Salesperson>,
    /// Index for email -> salesperson ID lookup
    email_index: HashMap<String, SalespersonId>,
    /// IDs referenced as someone's manager
    manager_ids: HashSet<SalespersonId>,
}

impl Directory {
    fn insert(&mut self, salesperson: Salesperson) -> Result<(), DomainError> {
        if self.salespeople.contains_key(&salesperson.id()) {
            return Err(DomainError::conflict(format!(
                "Salesperson with ID '{}' already exists",
                salesperson.id()
            )));
        }

        if self.email_index.contains_key(salesperson.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                salesperson.email()
            )));
        }

        self.email_index
            .insert(salesperson.email().to_string(), salesperson.id());

        if let Some(manager_id) = salesperson.manager_id() {
            self.manager_ids.insert(manager_id);
        }

        self.salespeople.insert(salesperson.id(), salesperson);

        Ok(())
    }

    fn next_id(&self) -> Result<SalespersonId, DomainError> {
        let next = self
            .salespeople
            .keys()
            .next_back()
            .map(|id| id.value() + 1)
            .unwrap_or(1);

        SalespersonId::new(next).map_err(|e| DomainError::internal(e.to_string()))
    }
}

/// In-memory implementation of SalespersonRepository
#[derive(Debug, Default)]
pub struct InMemorySalespersonRepository {
    directory: Arc<RwLock<Directory>>,
}

impl InMemorySalespersonRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial salespeople.
    /// Entries may reference managers that appear later in the list.
    pub fn with_salespeople(salespeople: Vec<Salesperson>) -> Result<Self, DomainError> {
        let ids: HashSet<SalespersonId> = salespeople.iter().map(|sp| sp.id()).collect();

        if let Some(orphan) = salespeople
            .iter()
            .find(|sp| sp.manager_id().is_some_and(|m| !ids.contains(&m)))
        {
            return Err(DomainError::validation(format!(
                "Manager of salesperson '{}' does not exist",
                orphan.id()
            )));
        }

        let mut directory = Directory::default();

        for salesperson in salespeople {
            directory.insert(salesperson)?;
        }

        Ok(Self {
            directory: Arc::new(RwLock::new(directory)),
        })
    }
}

#[async_trait]
impl SalespersonRepository for InMemorySalespersonRepository {
    async fn get(&self, id: SalespersonId) -> Result<Option<Salesperson>, DomainError> {
        let directory = self.directory.read().await;
        Ok(directory.salespeople.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Salesperson>, DomainError> {
        let directory = self.directory.read().await;

        Ok(directory
            .email_index
            .get(email)
            .and_then(|id| directory.salespeople.get(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Salesperson>, DomainError> {
        let directory = self.directory.read().await;
        Ok(directory.salespeople.values().cloned().collect())
    }

    async fn manager_ids(&self) -> Result<HashSet<SalespersonId>, DomainError> {
        let directory = self.directory.read().await;

        Ok(directory.manager_ids.clone())
    }

    async fn create(&self, salesperson: NewSalesperson) -> Result<Salesperson, DomainError> {
        let mut directory = self.directory.write().await;

        if let Some(manager_id) = salesperson.manager_id {
            if !directory.salespeople.contains_key(&manager_id) {
                return Err(DomainError::validation(format!(
                    "Manager '{}' does not exist",
                    manager_id
                )));
            }
        }

        let id = directory.next_id()?;
        let salesperson = salesperson
            .into_salesperson(id)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        directory.insert(salesperson.clone())?;

        Ok(salesperson)
    }
}
