//! Authentication API endpoints
//!
//! Login issues a bearer token; logout and `/me` require one.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageData, SuccessResponse};
use crate::domain::{AuthenticatedIdentity, TokenSubject};
use crate::infrastructure::auth::TOKEN_TYPE;
use crate::infrastructure::salesperson::{LoginError, LoginOutcome};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Token and account summary returned on login
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub salesperson_id: i64,
    pub name: String,
    pub email: String,
    pub is_manager: bool,
}

impl From<&LoginOutcome> for LoginUser {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            salesperson_id: outcome.salesperson.id().value(),
            name: outcome.salesperson.name().to_string(),
            email: outcome.salesperson.email().to_string(),
            is_manager: outcome.is_manager,
        }
    }
}

/// POST /api/v1/auth/login
///
/// Unknown email, inactive account and wrong password all produce the same
/// 401 response.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SuccessResponse<LoginData>>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let outcome = state
        .salesperson_service
        .login(&request.email, &request.password)
        .await
        .inspect_err(|e| {
            if matches!(e, LoginError::Rejected(_)) {
                info!("Login rejected");
            }
        })?;

    let access_token = state
        .token_service
        .issue(&TokenSubject::from_salesperson(&outcome.salesperson))?;

    info!(salesperson_id = %outcome.salesperson.id(), "Login succeeded");

    Ok(Json(SuccessResponse::new(LoginData {
        access_token,
        token_type: TOKEN_TYPE,
        expires_in: state.token_service.expiration_seconds(),
        user: LoginUser::from(&outcome),
    })))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(_user: RequireUser) -> Json<SuccessResponse<MessageData>> {
    Json(SuccessResponse::new(MessageData::new("Logged out")))
}

/// GET /api/v1/auth/me
pub async fn get_current_user(
    RequireUser(identity): RequireUser,
) -> Json<SuccessResponse<AuthenticatedIdentity>> {
    Json(SuccessResponse::new(identity))
}
