// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Claims carried inside the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub staff_id: Uuid,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Caller identity, built once by the auth middleware and threaded as a plain
/// argument through handlers, services, and repositories. Non-admins only see
/// rows they own as PIC.
#[derive(Debug, Clone, Copy)]
pub struct AccessScope {
    pub staff_id: Uuid,
    pub is_admin: bool,
}

impl AccessScope {
    pub fn new(staff_id: Uuid, role: &str) -> Self {
        Self {
            staff_id,
            is_admin: role == "admin",
        }
    }

    /// Unrestricted scope for internal reads that follow an explicit access
    /// check, and for background work with no caller.
    pub fn admin() -> Self {
        Self {
            staff_id: Uuid::nil(),
            is_admin: true,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "A valid email address is required."))]
    #[schema(example = "budi@sigma.co.id")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "rahasia123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_admin_role_grants_admin_scope() {
        let id = Uuid::new_v4();
        assert!(AccessScope::new(id, "admin").is_admin);
        assert!(!AccessScope::new(id, "staff").is_admin);
        assert!(!AccessScope::new(id, "Admin").is_admin);
        assert!(!AccessScope::new(id, "").is_admin);
    }
}
