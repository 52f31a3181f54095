//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use super::dto::{
    AuthResponse, AvatarRequest, ChangePasswordRequest, LoginRequest, SignupRequest,
    UpdateProfileRequest, UserInfo,
};
use crate::domain::user::{ProfileUpdate, User, UserRepository};
use crate::domain::{DomainError, GeoPoint};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<dyn UserRepository>,
    pub jwt_config: JwtConfig,
}

impl AuthHandlerState {
    fn token_response(&self, user: User) -> Result<AuthResponse, ApiError> {
        let token = create_token(&user.id, &user.email, &self.jwt_config)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user: user.into(),
        })
    }

    async fn load_user(&self, user_id: &str) -> Result<User, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;
        Ok(user)
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthResponse>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn signup(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    if state.users.find_by_email(&request.email).await?.is_some() {
        return Err(DomainError::Conflict("Email already registered".to_string()).into());
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| DomainError::Storage(e.to_string()))?;

    let user = User::new(request.name, request.email, password_hash, request.phone_number);
    state.users.insert(user.clone()).await?;
    info!(user_id = %user.id, "User registered");

    let response = state.token_response(user)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("Invalid credentials".to_string()))?;

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(DomainError::Unauthorized("Invalid credentials".to_string()).into());
    }

    info!(user_id = %user.id, "User logged in");
    let response = state.token_response(user)?;
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state.load_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let mut user = state.load_user(&auth.user_id).await?;

    // Coordinates only move together
    let location = match (request.longitude, request.latitude) {
        (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
        (None, None) => None,
        _ => {
            return Err(DomainError::Validation(
                "longitude and latitude must be provided together".to_string(),
            )
            .into())
        }
    };

    user.apply_profile_update(ProfileUpdate {
        name: request.name,
        phone_number: request.phone_number,
        location,
        avatar: None,
        notifications: request.notifications,
    });
    state.users.update(&user).await?;

    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Invalid current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let mut user = state.load_user(&auth.user_id).await?;

    let password_valid =
        verify_password(&request.current_password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(DomainError::Unauthorized("Invalid current password".to_string()).into());
    }

    user.password_hash =
        hash_password(&request.new_password).map_err(|e| DomainError::Storage(e.to_string()))?;
    user.updated_at = chrono::Utc::now();
    state.users.update(&user).await?;
    info!(user_id = %user.id, "Password changed");

    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/avatar",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_avatar(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<AvatarRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let mut user = state.load_user(&auth.user_id).await?;
    user.apply_profile_update(ProfileUpdate {
        avatar: Some(request.avatar),
        ..Default::default()
    });
    state.users.update(&user).await?;
    Ok(Json(ApiResponse::success(user.into())))
}
