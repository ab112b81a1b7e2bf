// src/models/pemeriksaan_job.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::postgres::PgArguments;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::job::{
    JobRecord, JobType, NewJobPayload, STATUS_DIKERJAKAN, parse_form_date, parse_form_uuid,
};

/// Tax audit assistance engagement. The status column kept its historical
/// `job_status` name, so the JSON field differs from the other job kinds;
/// multipart updates still use the shared `overall_status` part.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PemeriksaanJob {
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub assigned_pic_staff_sigma_name: Option<String>,
    pub contract_no: String,
    pub contract_date: Option<NaiveDate>,
    pub sp2_no: String,
    pub sp2_date: Option<NaiveDate>,
    pub skp_no: String,
    pub skp_date: Option<NaiveDate>,
    pub job_status: String,
    pub proof_of_work_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord for PemeriksaanJob {
    const JOB_TYPE: JobType = JobType::Pemeriksaan;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    fn status(&self) -> &str {
        &self.job_status
    }

    fn set_proof_of_work_url(&mut self, url: String) {
        self.proof_of_work_url = Some(url);
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn apply_patch_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "overall_status" => self.job_status = value.to_string(),
            "assigned_pic_staff_sigma_id" => {
                self.assigned_pic_staff_sigma_id = Some(parse_form_uuid(field, value)?);
            }
            "contract_no" => self.contract_no = value.to_string(),
            "sp2_no" => self.sp2_no = value.to_string(),
            "skp_no" => self.skp_no = value.to_string(),
            "contract_date" => self.contract_date = Some(parse_form_date(field, value)?),
            "sp2_date" => self.sp2_date = Some(parse_form_date(field, value)?),
            "skp_date" => self.skp_date = Some(parse_form_date(field, value)?),
            _ => {}
        }
        Ok(())
    }

    fn persist_query(
        &self,
        expected_updated_at: DateTime<Utc>,
    ) -> sqlx::query::Query<'static, sqlx::Postgres, PgArguments> {
        sqlx::query(
            "UPDATE pemeriksaan_jobs SET \
                assigned_pic_staff_sigma_id = $1, contract_no = $2, contract_date = $3, \
                sp2_no = $4, sp2_date = $5, skp_no = $6, skp_date = $7, \
                job_status = $8, proof_of_work_url = $9, updated_at = NOW() \
             WHERE job_id = $10 AND updated_at = $11",
        )
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.contract_no.clone())
        .bind(self.contract_date)
        .bind(self.sp2_no.clone())
        .bind(self.sp2_date)
        .bind(self.skp_no.clone())
        .bind(self.skp_date)
        .bind(self.job_status.clone())
        .bind(self.proof_of_work_url.clone())
        .bind(self.job_id)
        .bind(expected_updated_at)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewPemeriksaanJobPayload {
    pub client_id: Uuid,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    #[serde(default)]
    pub contract_no: String,
    pub contract_date: Option<NaiveDate>,
    #[serde(default)]
    pub sp2_no: String,
    pub sp2_date: Option<NaiveDate>,
    #[serde(default)]
    pub skp_no: String,
    pub skp_date: Option<NaiveDate>,
    pub job_status: Option<String>,
}

impl NewJobPayload for NewPemeriksaanJobPayload {
    type Record = PemeriksaanJob;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    async fn insert(&self, job_id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO pemeriksaan_jobs \
                (job_id, client_id, assigned_pic_staff_sigma_id, contract_no, contract_date, \
                 sp2_no, sp2_date, skp_no, skp_date, job_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(job_id)
        .bind(self.client_id)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(&self.contract_no)
        .bind(self.contract_date)
        .bind(&self.sp2_no)
        .bind(self.sp2_date)
        .bind(&self.skp_no)
        .bind(self.skp_date)
        .bind(self.job_status.as_deref().unwrap_or(STATUS_DIKERJAKAN))
        .execute(conn)
        .await?;
        Ok(())
    }
}
