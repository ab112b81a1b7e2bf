// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::StaffRepository,
    models::{auth::Claims, staff::Staff},
};

#[derive(Clone)]
pub struct AuthService {
    staff_repo: StaffRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(staff_repo: StaffRepository, jwt_secret: String) -> Self {
        Self {
            staff_repo,
            jwt_secret,
        }
    }

    /// Checks the password and issues a token. A missing account and a wrong
    /// password are indistinguishable to the caller.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let staff = self
            .staff_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = staff.password.clone();

        // bcrypt is CPU-bound, keep it off the async runtime.
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("password verification task failed: {e}"))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&staff)
    }

    /// Decodes the token and loads the staff row behind it, so role changes
    /// and deletions take effect on the next request, not at token expiry.
    pub async fn validate_token(&self, token: &str) -> Result<Staff, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.staff_repo
            .find_by_id(token_data.claims.staff_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, staff: &Staff) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(24);

        let claims = Claims {
            staff_id: staff.staff_id,
            role: staff.role.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
