// src/db/job_repo.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::AccessScope,
    models::job::JobRecord,
};

/// Data access shared by all four job kinds. Which table is touched comes
/// from the `JobRecord` type parameter; ownership scoping is appended here so
/// no call site can forget it.
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn base_select<J: JobRecord>() -> String {
        format!(
            "SELECT j.*, c.client_name, c.npwp_client, s.nama AS assigned_pic_staff_sigma_name \
             FROM {} j \
             JOIN clients c ON j.client_id = c.client_id \
             LEFT JOIN staffs s ON j.assigned_pic_staff_sigma_id = s.staff_id",
            J::JOB_TYPE.table()
        )
    }

    // =========================================================================
    //  READS
    // =========================================================================

    pub async fn list<J: JobRecord>(&self, scope: AccessScope) -> Result<Vec<J>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let mut sql = Self::base_select::<J>();
        if !scope.is_admin {
            sql.push_str(" WHERE j.assigned_pic_staff_sigma_id = $1");
        }
        sql.push_str(&format!(" ORDER BY {}", J::JOB_TYPE.list_order()));

        let mut query = sqlx::query_as::<_, J>(&sql);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let mut jobs = query.fetch_all(&mut *conn).await?;

        J::load_children_many(&mut jobs, &mut conn).await?;
        Ok(jobs)
    }

    pub async fn list_for_client<J: JobRecord>(
        &self,
        client_id: Uuid,
        scope: AccessScope,
    ) -> Result<Vec<J>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let mut sql = Self::base_select::<J>();
        sql.push_str(" WHERE j.client_id = $1");
        if !scope.is_admin {
            sql.push_str(" AND j.assigned_pic_staff_sigma_id = $2");
        }
        sql.push_str(&format!(" ORDER BY {}", J::JOB_TYPE.list_order()));

        let mut query = sqlx::query_as::<_, J>(&sql).bind(client_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let mut jobs = query.fetch_all(&mut *conn).await?;

        J::load_children_many(&mut jobs, &mut conn).await?;
        Ok(jobs)
    }

    pub async fn find<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<J>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_on(&mut conn, job_id, scope).await
    }

    /// Scoped single-row fetch usable inside a caller's transaction.
    pub async fn find_on<J: JobRecord>(
        conn: &mut PgConnection,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<J>, AppError> {
        let mut sql = Self::base_select::<J>();
        sql.push_str(" WHERE j.job_id = $1");
        if !scope.is_admin {
            sql.push_str(" AND j.assigned_pic_staff_sigma_id = $2");
        }

        let mut query = sqlx::query_as::<_, J>(&sql).bind(job_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let job = query.fetch_optional(&mut *conn).await?;

        match job {
            Some(mut job) => {
                job.load_children(conn).await?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    //  WRITES
    // =========================================================================

    /// Writes the merged row back, guarded by the `updated_at` the caller read.
    /// A row changed in between matches nothing and surfaces as a conflict.
    pub async fn persist<J: JobRecord>(
        conn: &mut PgConnection,
        job: &J,
        expected_updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), AppError> {
        let result = job.persist_query(expected_updated_at).execute(conn).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "The record was modified by someone else. Reload and retry.".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn delete<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<u64, AppError> {
        let mut sql = format!("DELETE FROM {} WHERE job_id = $1", J::JOB_TYPE.table());
        if !scope.is_admin {
            sql.push_str(" AND assigned_pic_staff_sigma_id = $2");
        }

        let mut query = sqlx::query(&sql).bind(job_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
