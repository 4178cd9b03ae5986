//! Auth endpoints: request-shape validation, then one call into the service.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::AuthService;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth: Arc::new(auth) }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub app_id: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct IsAdminRequest {
    #[serde(default)]
    pub user_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::invalid_argument("email is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::invalid_argument("password is required"));
    }
    if req.app_id == 0 {
        return Err(ApiError::invalid_argument("app_id is required"));
    }
    Ok(())
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::invalid_argument("email is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::invalid_argument("password is required"));
    }
    Ok(())
}

pub fn validate_is_admin(req: &IsAdminRequest) -> Result<(), ApiError> {
    if req.user_id == 0 {
        return Err(ApiError::invalid_argument("user_id is required"));
    }
    Ok(())
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    validate_login(&req)?;
    let LoginRequest { email, password, app_id } = req;
    let token = state
        .auth
        .login(LoginInput::new(email, password, app_id))
        .await
        .map_err(|e| ApiError::from_auth(&e, "failed to log in"))?;
    Ok(Json(LoginResponse { token }))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(req) = payload?;
    validate_register(&req)?;
    let RegisterRequest { email, password } = req;
    let user_id = state
        .auth
        .register_new_user(RegisterInput::new(email, password))
        .await
        .map_err(|e| ApiError::from_auth(&e, "failed to register new user"))?;
    Ok(Json(RegisterResponse { user_id }))
}

pub async fn is_admin(
    State(state): State<AppState>,
    payload: Result<Json<IsAdminRequest>, JsonRejection>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    let Json(req) = payload?;
    validate_is_admin(&req)?;
    let is_admin = state
        .auth
        .is_admin(req.user_id)
        .await
        .map_err(|e| ApiError::from_auth(&e, "failed to check admin status"))?;
    Ok(Json(IsAdminResponse { is_admin }))
}
