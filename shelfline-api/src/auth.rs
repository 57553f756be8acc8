use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shelfline_core::identity::User;

use crate::{error::AppError, middleware::auth::Claims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    info!("Registering new user: {}", req.email);

    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::ValidationError("A valid email is required".to_string()));
    }
    if req.password.chars().count() < 6 {
        return Err(AppError::ValidationError("Password must be at least 6 characters".to_string()));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }

    if state.user_repo.email_exists(&req.email).await.map_err(AppError::internal)? {
        return Err(AppError::ValidationError("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    let user = User::new(req.email, password_hash, req.name);
    state.user_repo.create_user(&user).await.map_err(AppError::internal)?;

    info!("User registered successfully: {}", user.email);

    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    info!("Login attempt for user: {}", req.email);

    let user = state
        .user_repo
        .find_by_email(&req.email)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::AuthenticationError("Invalid email or password".to_string()))?;

    if !bcrypt::verify(&req.password, &user.password_hash)? {
        return Err(AppError::AuthenticationError("Invalid email or password".to_string()));
    }

    info!("User logged in successfully: {}", user.email);

    let response = auth_response(&state, &user)?;
    Ok(Json(response))
}

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(state.auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expiration,
        user: UserInfo {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
        },
    })
}
