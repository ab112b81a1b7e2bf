// src/models/staff.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A staff member. `nip` is generated at creation from the name initials.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Staff {
    pub staff_id: Uuid,
    pub nip: String,
    pub nama: String,
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,

    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaffPayload {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    #[schema(example = "Iqsan Faisal")]
    pub nama: String,

    #[validate(email(message = "A valid email address is required."))]
    #[schema(example = "iqsan@sigma.co.id")]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "rahasia123")]
    pub password: String,

    #[validate(length(min = 1, message = "Role is required."))]
    #[schema(example = "staff")]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStaffPayload {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub nama: Option<String>,
    #[validate(email(message = "A valid email address is required."))]
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub new_password: String,
}

/// "Iqsan Faisal" becomes "IF" plus six random digits. Single-word names fall
/// back to their first two letters.
pub fn generate_nip(nama: &str) -> String {
    let mut inisial: String = nama
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect();

    if inisial.chars().count() < 2 {
        inisial = nama.chars().take(2).flat_map(|c| c.to_uppercase()).collect();
    }

    let raw = Uuid::new_v4().as_u128() % 1_000_000;
    format!("{inisial}{raw:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nip_uses_initials_of_the_first_two_words() {
        let nip = generate_nip("Iqsan Faisal Muhammad");
        assert!(nip.starts_with("IF"), "got {nip}");
        assert_eq!(nip.len(), 8);
        assert!(nip[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn nip_for_single_word_name_takes_two_letters() {
        let nip = generate_nip("budi");
        assert!(nip.starts_with("BU"), "got {nip}");
    }

    #[test]
    fn nip_digits_are_zero_padded() {
        for _ in 0..32 {
            let nip = generate_nip("Sari Dewi");
            assert_eq!(nip.len(), 8, "got {nip}");
        }
    }
}
