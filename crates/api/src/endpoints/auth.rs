//! Account endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{patch, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;
use wanderblog_common::{AppError, AppResult};
use wanderblog_core::{
    ChangeEmailInput, ChangePasswordInput, ChangePhoneInput, ChangeUsernameInput, LoginInput,
    RegisterInput, ResetPasswordInput, UploadedImage,
};

use crate::{
    extractors::{AuthUser, ResetUser},
    middleware::AppState,
    response::Envelope,
};

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<Envelope<Value>> {
    let (user, token) = state.account_service.register(req).await?;

    Ok(Envelope::created(
        "Register success, please check your email to verify your account",
        json!({ "user": user, "token": token }),
    ))
}

/// Mark the caller's account as verified.
async fn verify(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Envelope<Value>> {
    let user = state.account_service.verify_account(claims.id).await?;

    Ok(Envelope::ok("Account verified", json!({ "user": user })))
}

/// Sign in with username, email, or phone.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginInput>,
) -> AppResult<Envelope<Value>> {
    let (user, token) = state.account_service.login(req).await?;

    Ok(Envelope::ok(
        "Login success",
        json!({ "user": user, "token": token }),
    ))
}

/// Refresh the session from an existing valid token.
async fn keep_login(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Envelope<Value>> {
    let (user, token) = state.account_service.keep_login(claims.id).await?;

    Ok(Envelope::ok(
        "Login still valid",
        json!({ "user": user, "token": token }),
    ))
}

#[derive(Debug, Deserialize, Validate)]
struct ForgotPasswordRequest {
    #[validate(email)]
    email: String,
}

/// Email a password-reset link.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Envelope<Value>> {
    req.validate()?;
    state.account_service.forgot_password(&req.email).await?;

    Ok(Envelope::message(
        "Check your email to reset your password",
    ))
}

/// Set a new password using the emailed reset token.
async fn reset_password(
    ResetUser(claims): ResetUser,
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordInput>,
) -> AppResult<Envelope<Value>> {
    state.account_service.reset_password(claims.id, req).await?;

    Ok(Envelope::message("Password has been reset"))
}

/// Change the password.
async fn change_password(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordInput>,
) -> AppResult<Envelope<Value>> {
    state.account_service.change_password(claims.id, req).await?;

    Ok(Envelope::message("Password changed"))
}

/// Change the username. The account must be re-verified afterwards.
async fn change_username(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangeUsernameInput>,
) -> AppResult<Envelope<Value>> {
    let user = state.account_service.change_username(claims.id, req).await?;

    Ok(Envelope::ok(
        "Username changed, please verify your account again",
        json!({ "user": user }),
    ))
}

/// Change the phone number. The account must be re-verified afterwards.
async fn change_phone(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePhoneInput>,
) -> AppResult<Envelope<Value>> {
    let user = state.account_service.change_phone(claims.id, req).await?;

    Ok(Envelope::ok(
        "Phone changed, please verify your account again",
        json!({ "user": user }),
    ))
}

/// Change the email address. Verification mail goes to the new address.
async fn change_email(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangeEmailInput>,
) -> AppResult<Envelope<Value>> {
    let user = state.account_service.change_email(claims.id, req).await?;

    Ok(Envelope::ok(
        "Email changed, please verify your account again",
        json!({ "user": user }),
    ))
}

/// Upload a new profile photo.
async fn change_photo_profile(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Envelope<Value>> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

            image = Some(UploadedImage {
                file_name,
                content_type,
                data: data.to_vec(),
            });
        }
    }

    let image = image.ok_or_else(|| {
        AppError::BadRequest("Please provide an image file".to_string())
    })?;

    let user = state
        .account_service
        .change_photo_profile(claims.id, image)
        .await?;

    Ok(Envelope::ok(
        "Photo profile updated",
        json!({ "user": user }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register).get(keep_login))
        .route("/verify", patch(verify))
        .route("/login", post(login))
        .route("/forgotPass", put(forgot_password))
        .route("/resetPass", patch(reset_password))
        .route("/changePass", patch(change_password))
        .route("/changeUsername", patch(change_username))
        .route("/changePhone", patch(change_phone))
        .route("/changeEmail", patch(change_email))
        .route("/changePhotoProfile", patch(change_photo_profile))
}
