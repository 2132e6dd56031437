//! Router fixtures shared by handler tests

use std::sync::Arc;

use crate::api::state::AppState;
use crate::domain::{DomainError, Salesperson, SalespersonId};
use crate::infrastructure::auth::{JwtConfig, JwtService};
use crate::infrastructure::salesperson::{
    InMemorySalespersonRepository, PasswordHasher, SalespersonService,
};

pub const TEST_PASSWORD: &str = "password123";
pub const TEST_SECRET: &str = "router-test-secret";

/// Stores passwords with a marker prefix so tests skip Argon2's cost
#[derive(Debug, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{}", password)
    }
}

fn salesperson(id: i64, name: &str, email: &str, manager: Option<i64>) -> Salesperson {
    Salesperson::new(
        SalespersonId::new(id).unwrap(),
        name,
        email,
        format!("plain:{}", TEST_PASSWORD),
        manager.map(|m| SalespersonId::new(m).unwrap()),
    )
    .unwrap()
}

/// Yamada (1) reports to Sato (10, root); account 99 is inactive.
pub fn test_state() -> (AppState, Arc<JwtService>) {
    let repository = InMemorySalespersonRepository::with_salespeople(vec![
        salesperson(1, "Yamada Taro", "yamada@example.com", Some(10)),
        salesperson(10, "Sato Manager", "sato@example.com", None),
        salesperson(99, "Inactive User", "inactive@example.com", Some(10)).with_active(false),
    ])
    .unwrap();

    let service = SalespersonService::new(Arc::new(repository), Arc::new(PlainHasher));
    let tokens = Arc::new(JwtService::new(JwtConfig::new(TEST_SECRET, 86_400)));

    (AppState::new(Arc::new(service), tokens.clone()), tokens)
}
