// src/db/staff_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::staff::Staff};

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        nip: &str,
        nama: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<Staff, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "INSERT INTO staffs (nip, nama, email, password, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(nip)
        .bind(nama)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn find_by_id(&self, staff_id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staffs WHERE staff_id = $1")
            .bind(staff_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(staff)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staffs WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(staff)
    }

    pub async fn list(&self) -> Result<Vec<Staff>, AppError> {
        let staffs = sqlx::query_as::<_, Staff>("SELECT * FROM staffs ORDER BY nama ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(staffs)
    }

    /// Full-row write of a merged staff record. The password column is not
    /// touched here; `update_password` owns it.
    pub async fn update_row(&self, staff: &Staff) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE staffs SET nama = $1, email = $2, role = $3, updated_at = NOW() \
             WHERE staff_id = $4",
        )
        .bind(&staff.nama)
        .bind(&staff.email)
        .bind(&staff.role)
        .bind(staff.staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_password(
        &self,
        staff_id: Uuid,
        password_hash: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE staffs SET password = $1, updated_at = NOW() WHERE staff_id = $2",
        )
        .bind(password_hash)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, staff_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM staffs WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
