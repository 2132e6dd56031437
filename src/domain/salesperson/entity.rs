//! Salesperson entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_name, validate_salesperson_id, SalespersonValidationError,
};

/// Salesperson identifier - positive database identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SalespersonId(i64);

impl SalespersonId {
    /// Create a new SalespersonId after validation
    pub fn new(id: i64) -> Result<Self, SalespersonValidationError> {
        validate_salesperson_id(id)?;
        Ok(Self(id))
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for SalespersonId {
    type Error = SalespersonValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SalespersonId> for i64 {
    fn from(id: SalespersonId) -> Self {
        id.0
    }
}

impl FromStr for SalespersonId {
    type Err = SalespersonValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| SalespersonValidationError::InvalidId(s.to_string()))?;
        Self::new(id)
    }
}

impl std::fmt::Display for SalespersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A salesperson account. Managers are salespeople too; the hierarchy is
/// expressed through `manager_id` only.
#[derive(Debug, Clone, Serialize)]
pub struct Salesperson {
    id: SalespersonId,
    name: String,
    email: String,
    /// One-way password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    manager_id: Option<SalespersonId>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Salesperson {
    /// Create a new active salesperson
    pub fn new(
        id: SalespersonId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        manager_id: Option<SalespersonId>,
    ) -> Result<Self, SalespersonValidationError> {
        let name = name.into();
        let email = email.into();

        validate_name(&name)?;
        validate_email(&email)?;

        if manager_id == Some(id) {
            return Err(SalespersonValidationError::SelfManaged);
        }

        let now = Utc::now();

        Ok(Self {
            id,
            name,
            email,
            password_hash: password_hash.into(),
            manager_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Restore persisted timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Set the active flag at construction time
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    // Getters

    pub fn id(&self) -> SalespersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn manager_id(&self) -> Option<SalespersonId> {
        self.manager_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check if the salesperson can log in
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// True when the salesperson sits at the root of the hierarchy
    pub fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }
}

/// A salesperson that has not been persisted yet; the directory assigns the ID.
#[derive(Debug, Clone)]
pub struct NewSalesperson {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub manager_id: Option<SalespersonId>,
    pub is_active: bool,
}

impl NewSalesperson {
    /// Create a validated, active new salesperson
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        manager_id: Option<SalespersonId>,
    ) -> Result<Self, SalespersonValidationError> {
        let name = name.into();
        let email = email.into();

        validate_name(&name)?;
        validate_email(&email)?;

        Ok(Self {
            name,
            email,
            password_hash: password_hash.into(),
            manager_id,
            is_active: true,
        })
    }

    /// Assign an ID, producing the stored entity
    pub fn into_salesperson(
        self,
        id: SalespersonId,
    ) -> Result<Salesperson, SalespersonValidationError> {
        Salesperson::new(id, self.name, self.email, self.password_hash, self.manager_id)
            .map(|s| s.with_active(self.is_active))
    }
}
