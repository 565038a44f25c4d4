//! Account service: registration, authentication, and profile mutation.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use wanderblog_common::{
    AppError, AppResult, MAX_UPLOAD_BYTES, StorageBackend, generate_storage_key,
    is_allowed_image_name,
};
use wanderblog_db::{entities::user, repositories::UserRepository};

use crate::services::email::Mailer;
use crate::services::token::{TokenPurpose, TokenService};

/// Rejection message for the password policy.
const PASSWORD_POLICY_MSG: &str =
    "Password must be at least 8 characters long and contain at least one uppercase letter and one number";

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    tokens: TokenService,
    mailer: Mailer,
    storage: Arc<dyn StorageBackend>,
}

/// Input for registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 32))]
    pub phone: String,

    pub password: String,

    pub confirm_password: String,
}

/// Input for login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    /// Username, email, or phone.
    pub identifier: String,
    pub password: String,
}

/// Input for password reset (token-authenticated).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    pub password: String,
    pub confirm_password: String,
}

/// Input for changing the password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Input for changing the username.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUsernameInput {
    pub password: String,
    #[validate(length(min = 1, max = 128))]
    pub new_username: String,
}

/// Input for changing the phone number.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePhoneInput {
    pub password: String,
    #[validate(length(min = 1, max = 32))]
    pub new_phone: String,
}

/// Input for changing the email address.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailInput {
    pub password: String,
    #[validate(email)]
    pub new_email: String,
}

/// An image received through a multipart upload.
#[derive(Debug)]
pub struct UploadedImage {
    /// Original filename as sent by the client.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// Reject anything that is not an acceptable image upload.
    pub fn validate_image(&self) -> AppResult<()> {
        if !is_allowed_image_name(&self.file_name) {
            return Err(AppError::BadRequest(
                "Please provide an image file (jpg, jpeg, png, gif, svg)".to_string(),
            ));
        }
        if self.data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest(
                "File exceeds the 2MB upload limit".to_string(),
            ));
        }
        Ok(())
    }
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        tokens: TokenService,
        mailer: Mailer,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            mailer,
            storage,
        }
    }

    /// Register a new account, returning the user and a fresh token.
    ///
    /// A verification email is sent; delivery failure is logged, not rolled
    /// back.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(user::Model, String)> {
        input.validate()?;
        check_password_pair(&input.password, &input.confirm_password)?;

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            phone: Set(input.phone),
            password: Set(password_hash),
            verified_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        let token = self.tokens.issue(&user, TokenPurpose::Access)?;

        self.deliver_verification(&user, &token).await;

        Ok((user, token))
    }

    /// Mark the account as verified.
    pub async fn verify_account(&self, user_id: i32) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.verified_at.is_some() {
            return Err(AppError::BadRequest(
                "Account is already verified".to_string(),
            ));
        }

        let mut active: user::ActiveModel = user.into();
        active.verified_at = Set(Some(chrono::Utc::now().into()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Authenticate by username/email/phone and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<(user::Model, String)> {
        let user = self
            .user_repo
            .find_by_identifier(&input.identifier)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.verified_at.is_none() {
            return Err(AppError::Unauthorized);
        }

        if !verify_password(&input.password, &user.password)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.tokens.issue(&user, TokenPurpose::Access)?;
        Ok((user, token))
    }

    /// Re-issue a fresh token for an already-authenticated caller.
    pub async fn keep_login(&self, user_id: i32) -> AppResult<(user::Model, String)> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.verified_at.is_none() {
            return Err(AppError::Unauthorized);
        }

        let token = self.tokens.issue(&user, TokenPurpose::Access)?;
        Ok((user, token))
    }

    /// Email a password-reset link to the account behind `email`.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = self.tokens.issue(&user, TokenPurpose::Reset)?;

        self.mailer
            .send_password_reset(&user.email, &user.username, &token)
            .await
    }

    /// Replace the password after a reset-token verification.
    pub async fn reset_password(&self, user_id: i32, input: ResetPasswordInput) -> AppResult<()> {
        check_password_pair(&input.password, &input.confirm_password)?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.password = Set(hash_password(&input.password)?);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Change the password, re-proving the current one.
    pub async fn change_password(&self, user_id: i32, input: ChangePasswordInput) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(&input.current_password, &user.password)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        check_password_pair(&input.new_password, &input.confirm_password)?;

        let mut active: user::ActiveModel = user.into();
        active.password = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Change the username. Verification resets and a new email goes out.
    pub async fn change_username(
        &self,
        user_id: i32,
        input: ChangeUsernameInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        let user = self.reprove_password(user_id, &input.password).await?;

        let mut active: user::ActiveModel = user.into();
        active.username = Set(input.new_username);
        self.apply_identity_change(active).await
    }

    /// Change the phone number. Verification resets and a new email goes out.
    pub async fn change_phone(
        &self,
        user_id: i32,
        input: ChangePhoneInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        let user = self.reprove_password(user_id, &input.password).await?;

        let mut active: user::ActiveModel = user.into();
        active.phone = Set(input.new_phone);
        self.apply_identity_change(active).await
    }

    /// Change the email address. Verification resets and a new email goes
    /// out, bound to the new address.
    pub async fn change_email(
        &self,
        user_id: i32,
        input: ChangeEmailInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        let user = self.reprove_password(user_id, &input.password).await?;

        let mut active: user::ActiveModel = user.into();
        active.email = Set(input.new_email);
        self.apply_identity_change(active).await
    }

    /// Store a new profile photo, dropping the previous one.
    pub async fn change_photo_profile(
        &self,
        user_id: i32,
        upload: UploadedImage,
    ) -> AppResult<user::Model> {
        upload.validate_image()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let previous = user.photo_profile.clone();

        let key = generate_storage_key(&upload.file_name);
        self.storage
            .upload(&key, &upload.data, &upload.content_type)
            .await?;

        let mut active: user::ActiveModel = user.into();
        active.photo_profile = Set(Some(key));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;

        if let Some(old_key) = previous
            && let Err(e) = self.storage.delete(&old_key).await
        {
            tracing::warn!(error = %e, key = %old_key, "Failed to delete previous profile photo");
        }

        Ok(updated)
    }

    /// Public URL for a stored photo key.
    #[must_use]
    pub fn photo_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }

    async fn reprove_password(&self, user_id: i32, password: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::BadRequest("Password is incorrect".to_string()));
        }

        Ok(user)
    }

    /// Persist a username/phone/email change: verification flips off and a
    /// fresh verification email goes to the stored (possibly new) address.
    async fn apply_identity_change(&self, mut active: user::ActiveModel) -> AppResult<user::Model> {
        active.verified_at = Set(None);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        let token = self.tokens.issue(&user, TokenPurpose::Access)?;
        self.deliver_verification(&user, &token).await;

        Ok(user)
    }

    async fn deliver_verification(&self, user: &user::Model, token: &str) {
        if let Err(e) = self
            .mailer
            .send_verification(&user.email, &user.username, token)
            .await
        {
            tracing::warn!(error = %e, user_id = user.id, "Failed to send verification email");
        }
    }
}

/// Reject mismatched or policy-failing passwords.
fn check_password_pair(password: &str, confirm: &str) -> AppResult<()> {
    if password != confirm {
        return Err(AppError::BadRequest(
            "Password and Confirm Password is not same".to_string(),
        ));
    }
    check_password_policy(password)
}

/// Policy: at least 8 characters, one uppercase letter, one digit.
fn check_password_policy(password: &str) -> AppResult<()> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_digit {
        Ok(())
    } else {
        Err(AppError::BadRequest(PASSWORD_POLICY_MSG.to_string()))
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
