//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use examdesk_common::{AppError, AppResult};
use examdesk_core::{
    RegisterAdminInput, RegisterStudentInput, SessionActor,
};
use examdesk_db::entities::user::{self, UserRole};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::Actor,
    middleware::{AppState, SESSION_COOKIE, encode_session_cookie},
    response::ApiResponse,
};

/// Public view of a user account.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_string(),
            student_id: user.student_id,
            staff_id: user.staff_id,
            level: user.level,
            position: user.position.map(|p| p.as_str().to_string()),
            phone: user.phone,
            department: user.department,
            faculty: user.faculty,
            courses: user.courses,
            profile_pic_url: user.profile_pic_url,
        }
    }
}

/// Register a new student account.
async fn register_student(
    State(state): State<AppState>,
    Json(input): Json<RegisterStudentInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.account_service.register_student(input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Register a new admin account.
async fn register_admin(
    State(state): State<AppState>,
    Json(input): Json<RegisterAdminInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.account_service.register_admin(input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Sign in and set the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let role = parse_role(&req.role)?;
    let user = state
        .account_service
        .login(&req.email, &req.password, role)
        .await?;

    let actor = SessionActor::from_user(&user);
    let value = encode_session_cookie(&actor)
        .ok_or_else(|| AppError::Internal("Failed to encode session".to_string()))?;

    let cookie = Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .path("/")
        .build();

    Ok((
        jar.add(cookie),
        ApiResponse::ok(LoginResponse {
            role: actor.role,
            position: actor.position,
        }),
    ))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out by clearing the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<LogoutResponse>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(cookie),
        ApiResponse::ok(LogoutResponse { ok: true }),
    )
}

/// Get the current user's account.
async fn me(
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.account_service.current_user(&actor).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Forgot password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Message-only response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

/// Request a password reset email.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let role = match req.role.as_deref() {
        Some(raw) => parse_role(raw)?,
        None => UserRole::Student,
    };
    state.password_reset_service.request(&req.email, role).await?;
    Ok(ApiResponse::ok(MessageResponse {
        message: "Password reset email sent".to_string(),
    }))
}

/// Reset password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub user_id: String,
    pub password: String,
}

/// Complete a password reset with a token.
async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .password_reset_service
        .reset(&req.token, &req.user_id, &req.password)
        .await?;
    Ok(ApiResponse::ok(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// Change password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the current user's password.
async fn change_password(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .account_service
        .change_password(&actor.user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(ApiResponse::ok(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

fn parse_role(raw: &str) -> AppResult<UserRole> {
    match raw {
        "student" => Ok(UserRole::Student),
        "admin" => Ok(UserRole::Admin),
        other => Err(AppError::BadRequest(format!("Unknown role: {other}"))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/student", post(register_student))
        .route("/register/admin", post(register_admin))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/change-password", post(change_password))
}
