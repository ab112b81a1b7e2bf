// src/services/staff_service.rs

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StaffRepository,
    models::staff::{
        ChangePasswordPayload, CreateStaffPayload, Staff, UpdateStaffPayload, generate_nip,
    },
};

#[derive(Clone)]
pub struct StaffService {
    repo: StaffRepository,
}

impl StaffService {
    pub fn new(repo: StaffRepository) -> Self {
        Self { repo }
    }

    pub async fn create_staff(&self, payload: CreateStaffPayload) -> Result<Staff, AppError> {
        if self.repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))??;

        let nip = generate_nip(&payload.nama);

        self.repo
            .create(
                &nip,
                &payload.nama,
                &payload.email,
                &hashed_password,
                &payload.role,
            )
            .await
    }

    pub async fn get_staff(&self, staff_id: Uuid) -> Result<Staff, AppError> {
        self.repo
            .find_by_id(staff_id)
            .await?
            .ok_or(AppError::NotFound("Staff"))
    }

    pub async fn list_staffs(&self) -> Result<Vec<Staff>, AppError> {
        self.repo.list().await
    }

    /// Merge update. Only the fields present in the payload change; the
    /// password has its own endpoint.
    pub async fn update_staff(
        &self,
        staff_id: Uuid,
        payload: UpdateStaffPayload,
    ) -> Result<Staff, AppError> {
        let mut staff = self.get_staff(staff_id).await?;

        if let Some(email) = &payload.email {
            if *email != staff.email && self.repo.find_by_email(email).await?.is_some() {
                return Err(AppError::EmailAlreadyExists);
            }
        }

        if let Some(nama) = payload.nama {
            staff.nama = nama;
        }
        if let Some(email) = payload.email {
            staff.email = email;
        }
        if let Some(role) = payload.role {
            staff.role = role;
        }

        let rows = self.repo.update_row(&staff).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Staff"));
        }

        self.get_staff(staff_id).await
    }

    pub async fn change_password(
        &self,
        staff_id: Uuid,
        payload: ChangePasswordPayload,
    ) -> Result<(), AppError> {
        // Fail on a bad id before paying for the hash.
        let staff = self.get_staff(staff_id).await?;

        let password = payload.new_password;
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))??;

        self.repo
            .update_password(staff.staff_id, &hashed_password)
            .await?;
        Ok(())
    }

    pub async fn delete_staff(&self, staff_id: Uuid) -> Result<(), AppError> {
        let rows = self.repo.delete(staff_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Staff"));
        }
        Ok(())
    }
}
