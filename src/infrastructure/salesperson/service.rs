//! Salesperson service for login and directory management

use std::sync::Arc;

use thiserror::Error;

use crate::domain::auth::AuthError;
use crate::domain::salesperson::{
    validate_password, ManagerIndex, NewSalesperson, Salesperson, SalespersonId,
    SalespersonRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new salesperson
#[derive(Debug, Clone)]
pub struct RegisterSalespersonRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub manager_id: Option<SalespersonId>,
    pub is_active: bool,
}

/// A successful login: the account and its derived role
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub salesperson: Salesperson,
    pub is_manager: bool,
}

/// Login failure
#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Rejected(#[from] AuthError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Salesperson service for authentication and management
#[derive(Debug)]
pub struct SalespersonService<R: SalespersonRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: SalespersonRepository, H: PasswordHasher> SalespersonService<R, H> {
    /// Create a new salesperson service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Check an email and password against the directory.
    ///
    /// Returns `None` for an unknown email, an inactive account or a wrong
    /// password alike.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Salesperson>, DomainError> {
        let salesperson = match self.repository.get_by_email(email).await? {
            Some(s) => s,
            None => return Ok(None),
        };

        if !salesperson.is_active() {
            return Ok(None);
        }

        if !self.hasher.verify(password, salesperson.password_hash()) {
            return Ok(None);
        }

        Ok(Some(salesperson))
    }

    /// Root of the hierarchy, or manager of at least one other salesperson
    pub async fn is_manager(&self, salesperson: &Salesperson) -> Result<bool, DomainError> {
        if salesperson.is_root() {
            return Ok(true);
        }

        let index = ManagerIndex::new(self.repository.manager_ids().await?);
        Ok(index.is_manager(salesperson))
    }

    /// Authenticate and derive the manager flag
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        let salesperson = self
            .authenticate(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_manager = self.is_manager(&salesperson).await?;

        Ok(LoginOutcome {
            salesperson,
            is_manager,
        })
    }

    /// Validate, hash and store a new salesperson
    pub async fn register(
        &self,
        request: RegisterSalespersonRequest,
    ) -> Result<Salesperson, DomainError> {
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;

        let mut new_salesperson = NewSalesperson::new(
            request.name,
            request.email,
            password_hash,
            request.manager_id,
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;
        new_salesperson.is_active = request.is_active;

        self.repository.create(new_salesperson).await
    }

    /// List all salespeople
    pub async fn list(&self) -> Result<Vec<Salesperson>, DomainError> {
        self.repository.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::salesperson::MockSalespersonRepository;
    use crate::infrastructure::salesperson::password::{Argon2Hasher, MockPasswordHasher};
    use crate::infrastructure::salesperson::repository::InMemorySalespersonRepository;

    /// Stores passwords as `plain:<password>`
    #[derive(Debug, Default)]
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            Ok(format!("plain:{}", password))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            hash == format!("plain:{}", password)
        }
    }

    fn stored_salesperson(email: &str) -> Salesperson {
        Salesperson::new(
            SalespersonId::new(1).unwrap(),
            "Yamada",
            email,
            "stored-hash",
            Some(SalespersonId::new(10).unwrap()),
        )
        .unwrap()
    }

    fn register_request(
        name: &str,
        email: &str,
        manager_id: Option<SalespersonId>,
    ) -> RegisterSalespersonRequest {
        RegisterSalespersonRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            manager_id,
            is_active: true,
        }
    }

    async fn seeded_service() -> SalespersonService<InMemorySalespersonRepository, PlainHasher> {
        let service = SalespersonService::new(
            Arc::new(InMemorySalespersonRepository::new()),
            Arc::new(PlainHasher),
        );

        let root = service
            .register(register_request("Sato", "sato@example.com", None))
            .await
            .unwrap();
        service
            .register(register_request(
                "Yamada",
                "yamada@example.com",
                Some(root.id()),
            ))
            .await
            .unwrap();

        let mut inactive = register_request("Former", "former@example.com", Some(root.id()));
        inactive.is_active = false;
        service.register(inactive).await.unwrap();

        service
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = seeded_service().await;

        let salesperson = service
            .authenticate("yamada@example.com", "password123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(salesperson.name(), "Yamada");
    }

    #[tokio::test]
    async fn test_unknown_email_skips_hasher() {
        let mut repository = MockSalespersonRepository::new();
        repository.expect_get_by_email().returning(|_| Ok(None));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let service = SalespersonService::new(Arc::new(repository), Arc::new(hasher));

        let result = service
            .authenticate("nobody@example.com", "password123")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let mut repository = MockSalespersonRepository::new();
        repository
            .expect_get_by_email()
            .returning(|email| Ok(Some(stored_salesperson(email))));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, hash| password == "wrong-password" && hash == "stored-hash")
            .times(1)
            .returning(|_, _| false);

        let service = SalespersonService::new(Arc::new(repository), Arc::new(hasher));

        let result = service
            .authenticate("yamada@example.com", "wrong-password")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_inactive_skips_hasher() {
        let mut repository = MockSalespersonRepository::new();
        repository
            .expect_get_by_email()
            .returning(|email| Ok(Some(stored_salesperson(email).with_active(false))));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let service = SalespersonService::new(Arc::new(repository), Arc::new(hasher));

        let result = service
            .authenticate("yamada@example.com", "password123")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_inactive_rejected_with_correct_password() {
        let service = seeded_service().await;

        let result = service
            .authenticate("former@example.com", "password123")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_login_rejections_are_indistinguishable() {
        let service = seeded_service().await;

        let attempts = [
            ("nobody@example.com", "password123"),
            ("former@example.com", "password123"),
            ("yamada@example.com", "wrong-password"),
        ];

        let mut messages = Vec::new();
        for (email, password) in attempts {
            match service.login(email, password).await {
                Err(LoginError::Rejected(err)) => {
                    assert_eq!(err, AuthError::InvalidCredentials);
                    messages.push(err.to_string());
                }
                other => panic!("expected rejection, got {:?}", other),
            }
        }

        messages.dedup();
        assert_eq!(messages, vec!["Invalid email or password".to_string()]);
    }

    #[tokio::test]
    async fn test_login_derives_manager_flag() {
        let service = seeded_service().await;

        let root = service.login("sato@example.com", "password123").await.unwrap();
        assert!(root.is_manager);

        let leaf = service.login("yamada@example.com", "password123").await.unwrap();
        assert!(!leaf.is_manager);
    }

    #[tokio::test]
    async fn test_middle_manager() {
        let hasher = Arc::new(Argon2Hasher::new());
        let service =
            SalespersonService::new(Arc::new(InMemorySalespersonRepository::new()), hasher);

        let root = service
            .register(register_request("Sato", "sato@example.com", None))
            .await
            .unwrap();
        let middle = service
            .register(register_request("Yamada", "yamada@example.com", Some(root.id())))
            .await
            .unwrap();
        service
            .register(register_request("Suzuki", "suzuki@example.com", Some(middle.id())))
            .await
            .unwrap();

        let outcome = service.login("yamada@example.com", "password123").await.unwrap();
        assert_eq!(outcome.salesperson.id(), middle.id());
        assert!(outcome.is_manager);

        let leaf = service.login("suzuki@example.com", "password123").await.unwrap();
        assert!(!leaf.is_manager);
    }

    #[tokio::test]
    async fn test_register_validates_password() {
        let service = seeded_service().await;

        let mut request = register_request("Short", "short@example.com", None);
        request.password = "short".to_string();

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = seeded_service().await;

        let result = service
            .register(register_request("Again", "yamada@example.com", None))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut repository = MockSalespersonRepository::new();
        repository
            .expect_get_by_email()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let service = SalespersonService::new(
            Arc::new(repository),
            Arc::new(PlainHasher),
        );

        let result = service.login("yamada@example.com", "password123").await;
        assert!(matches!(
            result,
            Err(LoginError::Domain(DomainError::Storage { .. }))
        ));
    }

    #[tokio::test]
    async fn test_root_skips_manager_lookup() {
        let mut repository = MockSalespersonRepository::new();
        repository.expect_manager_ids().never();

        let service = SalespersonService::new(
            Arc::new(repository),
            Arc::new(PlainHasher),
        );

        let root = Salesperson::new(
            SalespersonId::new(10).unwrap(),
            "Sato",
            "sato@example.com",
            "plain:password123",
            None,
        )
        .unwrap();

        assert!(service.is_manager(&root).await.unwrap());
    }
}
