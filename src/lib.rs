//! Sales Report API
//!
//! Backend for daily sales visit reports. This crate holds the
//! authentication core:
//! - Credential verification against the salesperson directory
//! - Manager-role derivation from the reporting hierarchy
//! - Signed bearer token issue and verification

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, SalespersonServiceTrait};
use config::{AuthConfig, StorageBackend};
use infrastructure::{
    auth::{JwtConfig, JwtService, TokenService},
    salesperson::{
        Argon2Hasher, InMemorySalespersonRepository, PostgresSalespersonRepository,
        RegisterSalespersonRequest, SalespersonService,
    },
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// Password given to the demo accounts
pub const DEMO_PASSWORD: &str = "password123";

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let token_service = create_token_service(&config.auth)?;
    let password_hasher = Arc::new(Argon2Hasher::new());

    let salesperson_service: Arc<dyn SalespersonServiceTrait> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory salesperson directory");
            Arc::new(SalespersonService::new(
                Arc::new(InMemorySalespersonRepository::new()),
                password_hasher,
            ))
        }
        StorageBackend::Postgres => {
            let database_url = config.storage.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url is required for the postgres backend")
            })?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            info!("PostgreSQL connection established");

            let repository = PostgresSalespersonRepository::new(pg_pool);
            repository.ensure_schema().await?;

            Arc::new(SalespersonService::new(Arc::new(repository), password_hasher))
        }
    };

    if config.storage.seed_demo_data {
        seed_demo_salespeople(salesperson_service.as_ref()).await?;
    }

    Ok(AppState::new(salesperson_service, token_service))
}

fn create_token_service(config: &AuthConfig) -> anyhow::Result<Arc<dyn TokenService>> {
    if config.jwt_secret == AuthConfig::default().jwt_secret {
        warn!(
            "Using the built-in JWT secret. Set APP__AUTH__JWT_SECRET before exposing this server."
        );
    }

    let jwt_config = JwtConfig::try_from(config)?;
    info!(
        algorithm = ?jwt_config.algorithm,
        expire_seconds = jwt_config.expiration_seconds,
        "Token service configured"
    );

    Ok(Arc::new(JwtService::new(jwt_config)))
}

/// Register a root manager, one subordinate and one inactive account when
/// the directory is empty
async fn seed_demo_salespeople(service: &dyn SalespersonServiceTrait) -> anyhow::Result<()> {
    if !service.list().await?.is_empty() {
        return Ok(());
    }

    let manager = service
        .register(demo_request("Sato Manager", "sato@example.com", None, true))
        .await?;

    service
        .register(demo_request(
            "Yamada Taro",
            "yamada@example.com",
            Some(manager.id()),
            true,
        ))
        .await?;

    service
        .register(demo_request(
            "Inactive User",
            "inactive@example.com",
            Some(manager.id()),
            false,
        ))
        .await?;

    for line in demo_summary() {
        info!("{}", line);
    }

    Ok(())
}

/// Start-up notice for the demo accounts. Never includes the password.
fn demo_summary() -> [&'static str; 6] {
    [
        "===========================================",
        "Demo salespeople created",
        "Manager: sato@example.com",
        "Member:  yamada@example.com",
        "Password: sales_report_api::DEMO_PASSWORD",
        "===========================================",
    ]
}

fn demo_request(
    name: &str,
    email: &str,
    manager_id: Option<domain::SalespersonId>,
    is_active: bool,
) -> RegisterSalespersonRequest {
    RegisterSalespersonRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: DEMO_PASSWORD.to_string(),
        manager_id,
        is_active,
    }
}
