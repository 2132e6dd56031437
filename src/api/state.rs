//! Application state for shared services

use std::sync::Arc;

use crate::domain::salesperson::SalespersonRepository;
use crate::domain::{DomainError, Salesperson};
use crate::infrastructure::auth::TokenService;
use crate::infrastructure::salesperson::{
    LoginError, LoginOutcome, PasswordHasher, RegisterSalespersonRequest, SalespersonService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub salesperson_service: Arc<dyn SalespersonServiceTrait>,
    pub token_service: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(
        salesperson_service: Arc<dyn SalespersonServiceTrait>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            salesperson_service,
            token_service,
        }
    }
}

/// Trait for salesperson service operations
#[async_trait::async_trait]
pub trait SalespersonServiceTrait: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError>;
    async fn register(
        &self,
        request: RegisterSalespersonRequest,
    ) -> Result<Salesperson, DomainError>;
    async fn list(&self) -> Result<Vec<Salesperson>, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> SalespersonServiceTrait for SalespersonService<R, H>
where
    R: SalespersonRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        SalespersonService::login(self, email, password).await
    }

    async fn register(
        &self,
        request: RegisterSalespersonRequest,
    ) -> Result<Salesperson, DomainError> {
        SalespersonService::register(self, request).await
    }

    async fn list(&self) -> Result<Vec<Salesperson>, DomainError> {
        SalespersonService::list(self).await
    }
}
