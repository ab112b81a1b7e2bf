// src/models/sp2dk_job.rs

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

/// SP2DK response engagement: the firm answers a clarification letter from the
/// tax office on the client's behalf.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Sp2dkJob {
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub assigned_pic_staff_sigma_name: Option<String>,
    pub contract_no: String,
    pub contract_date: Option<NaiveDate>,
    pub sp2dk_no: String,
    pub sp2dk_date: Option<NaiveDate>,
    pub bap2dk_no: String,
    pub bap2dk_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub overall_status: String,
    pub proof_of_work_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord for Sp2dkJob {
    const JOB_TYPE: JobType = JobType::Sp2dk;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    fn status(&self) -> &str {
        &self.overall_status
    }

    fn set_proof_of_work_url(&mut self, url: String) {
        self.proof_of_work_url = Some(url);
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn apply_patch_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "overall_status" => self.overall_status = value.to_string(),
            "assigned_pic_staff_sigma_id" => {
                self.assigned_pic_staff_sigma_id = Some(parse_form_uuid(field, value)?);
            }
            "contract_no" => self.contract_no = value.to_string(),
            "sp2dk_no" => self.sp2dk_no = value.to_string(),
            "bap2dk_no" => self.bap2dk_no = value.to_string(),
            "contract_date" => self.contract_date = Some(parse_form_date(field, value)?),
            "sp2dk_date" => self.sp2dk_date = Some(parse_form_date(field, value)?),
            "bap2dk_date" => self.bap2dk_date = Some(parse_form_date(field, value)?),
            "payment_date" => self.payment_date = Some(parse_form_date(field, value)?),
            "report_date" => self.report_date = Some(parse_form_date(field, value)?),
            _ => {}
        }
        Ok(())
    }

    fn persist_query(
        &self,
        expected_updated_at: DateTime<Utc>,
    ) -> sqlx::query::Query<'static, sqlx::Postgres, PgArguments> {
        sqlx::query(
            "UPDATE sp2dk_jobs SET \
                assigned_pic_staff_sigma_id = $1, contract_no = $2, contract_date = $3, \
                sp2dk_no = $4, sp2dk_date = $5, bap2dk_no = $6, bap2dk_date = $7, \
                payment_date = $8, report_date = $9, overall_status = $10, \
                proof_of_work_url = $11, updated_at = NOW() \
             WHERE job_id = $12 AND updated_at = $13",
        )
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.contract_no.clone())
        .bind(self.contract_date)
        .bind(self.sp2dk_no.clone())
        .bind(self.sp2dk_date)
        .bind(self.bap2dk_no.clone())
        .bind(self.bap2dk_date)
        .bind(self.payment_date)
        .bind(self.report_date)
        .bind(self.overall_status.clone())
        .bind(self.proof_of_work_url.clone())
        .bind(self.job_id)
        .bind(expected_updated_at)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewSp2dkJobPayload {
    pub client_id: Uuid,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    #[serde(default)]
    pub contract_no: String,
    pub contract_date: Option<NaiveDate>,
    #[serde(default)]
    pub sp2dk_no: String,
    pub sp2dk_date: Option<NaiveDate>,
    #[serde(default)]
    pub bap2dk_no: String,
    pub bap2dk_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub overall_status: Option<String>,
}

impl NewJobPayload for NewSp2dkJobPayload {
    type Record = Sp2dkJob;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    async fn insert(&self, job_id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO sp2dk_jobs \
                (job_id, client_id, assigned_pic_staff_sigma_id, contract_no, contract_date, \
                 sp2dk_no, sp2dk_date, bap2dk_no, bap2dk_date, payment_date, report_date, overall_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(job_id)
        .bind(self.client_id)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(&self.contract_no)
        .bind(self.contract_date)
        .bind(&self.sp2dk_no)
        .bind(self.sp2dk_date)
        .bind(&self.bap2dk_no)
        .bind(self.bap2dk_date)
        .bind(self.payment_date)
        .bind(self.report_date)
        .bind(self.overall_status.as_deref().unwrap_or(STATUS_DIKERJAKAN))
        .execute(conn)
        .await?;
        Ok(())
    }
}
