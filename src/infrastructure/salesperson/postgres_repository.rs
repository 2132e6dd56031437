//! PostgreSQL salesperson directory

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::salesperson::{NewSalesperson, Salesperson, SalespersonId, SalespersonRepository};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "id, name, email, password_hash, manager_id, is_active, created_at, updated_at";

/// PostgreSQL implementation of SalespersonRepository
#[derive(Debug, Clone)]
pub struct PostgresSalespersonRepository {
    pool: PgPool,
}

impl PostgresSalespersonRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the salesperson table and its manager index if missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS salesperson (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                manager_id BIGINT NULL REFERENCES salesperson(id),
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT salesperson_not_self_managed
                    CHECK (manager_id IS NULL OR manager_id <> id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create salesperson table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_salesperson_manager_id ON salesperson (manager_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create manager index: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl SalespersonRepository for PostgresSalespersonRepository {
    async fn get(&self, id: SalespersonId) -> Result<Option<Salesperson>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM salesperson WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get salesperson: {}", e)))?;

        row.as_ref().map(row_to_salesperson).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Salesperson>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM salesperson WHERE email = $1",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get salesperson by email: {}", e)))?;

        row.as_ref().map(row_to_salesperson).transpose()
    }

    async fn list(&self) -> Result<Vec<Salesperson>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM salesperson ORDER BY id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list salespeople: {}", e)))?;

        rows.iter().map(row_to_salesperson).collect()
    }

    async fn manager_ids(&self) -> Result<HashSet<SalespersonId>, DomainError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT manager_id FROM salesperson WHERE manager_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list manager IDs: {}", e)))?;

        ids.into_iter()
            .map(|id| {
                SalespersonId::new(id).map_err(|e| {
                    DomainError::storage(format!("Invalid manager ID in database: {}", e))
                })
            })
            .collect()
    }

    async fn create(&self, salesperson: NewSalesperson) -> Result<Salesperson, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO salesperson (name, email, password_hash, manager_id, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&salesperson.name)
        .bind(&salesperson.email)
        .bind(&salesperson.password_hash)
        .bind(salesperson.manager_id.map(|id| id.value()))
        .bind(salesperson.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Email '{}' already exists", salesperson.email))
            } else if msg.contains("foreign key") {
                DomainError::validation("Manager does not exist")
            } else {
                DomainError::storage(format!("Failed to create salesperson: {}", e))
            }
        })?;

        row_to_salesperson(&row)
    }
}

fn row_to_salesperson(row: &sqlx::postgres::PgRow) -> Result<Salesperson, DomainError> {
    let id: i64 = row.get("id");
    let name: String = row.get("name");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let manager_id: Option<i64> = row.get("manager_id");
    let is_active: bool = row.get("is_active");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let id = parse_stored_id(id)?;
    let manager_id = manager_id.map(parse_stored_id).transpose()?;

    let salesperson =
        Salesperson::new(id, name, email, password_hash, manager_id).map_err(|e| {
            DomainError::storage(format!("Invalid salesperson '{}' in database: {}", id, e))
        })?;

    Ok(salesperson
        .with_active(is_active)
        .with_timestamps(created_at, updated_at))
}

fn parse_stored_id(id: i64) -> Result<SalespersonId, DomainError> {
    SalespersonId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid salesperson ID in database: {}", e)))
}
