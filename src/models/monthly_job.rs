// src/models/monthly_job.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::postgres::PgArguments;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::job::{
    JobRecord, JobType, NewJobPayload, STATUS_DIKERJAKAN, parse_form_int, parse_form_uuid,
};

/// One tax obligation (PPh 21, PPN, ...) tracked under a monthly job.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyTaxReport {
    pub report_id: Uuid,
    pub job_id: Uuid,
    pub tax_type: String,
    pub billing_code: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    pub report_status: String,
    pub report_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recurring monthly engagement. Client and PIC names come from the read-side
/// joins; `tax_reports` is loaded in a second query.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyJob {
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub job_month: i32,
    pub job_year: i32,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub assigned_pic_staff_sigma_name: Option<String>,
    pub overall_status: String,
    pub proof_of_work_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub tax_reports: Vec<MonthlyTaxReport>,
}

impl JobRecord for MonthlyJob {
    const JOB_TYPE: JobType = JobType::Monthly;

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
            "job_month" => self.job_month = parse_form_int(field, value)?,
            "job_year" => self.job_year = parse_form_int(field, value)?,
            _ => {}
        }
        Ok(())
    }

    fn persist_query(
        &self,
        expected_updated_at: DateTime<Utc>,
    ) -> sqlx::query::Query<'static, sqlx::Postgres, PgArguments> {
        sqlx::query(
            "UPDATE monthly_jobs SET \
                job_month = $1, job_year = $2, assigned_pic_staff_sigma_id = $3, \
                overall_status = $4, proof_of_work_url = $5, updated_at = NOW() \
             WHERE job_id = $6 AND updated_at = $7",
        )
        .bind(self.job_month)
        .bind(self.job_year)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.overall_status.clone())
        .bind(self.proof_of_work_url.clone())
        .bind(self.job_id)
        .bind(expected_updated_at)
    }

    async fn load_children(&mut self, conn: &mut PgConnection) -> Result<(), AppError> {
        self.tax_reports = sqlx::query_as::<_, MonthlyTaxReport>(
            "SELECT * FROM monthly_tax_reports WHERE job_id = $1 ORDER BY created_at",
        )
        .bind(self.job_id)
        .fetch_all(conn)
        .await?;
        Ok(())
    }

    async fn load_children_many(
        jobs: &mut [Self],
        conn: &mut PgConnection,
    ) -> Result<(), AppError> {
        if jobs.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = jobs.iter().map(|j| j.job_id).collect();
        let reports = sqlx::query_as::<_, MonthlyTaxReport>(
            "SELECT * FROM monthly_tax_reports WHERE job_id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;

        let mut by_job: HashMap<Uuid, Vec<MonthlyTaxReport>> = HashMap::new();
        for report in reports {
            by_job.entry(report.job_id).or_default().push(report);
        }
        for job in jobs.iter_mut() {
            job.tax_reports = by_job.remove(&job.job_id).unwrap_or_default();
        }
        Ok(())
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewMonthlyJobPayload {
    pub client_id: Uuid,
    #[validate(range(min = 1, max = 12, message = "job_month must be between 1 and 12"))]
    pub job_month: i32,
    pub job_year: i32,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub overall_status: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub tax_reports: Vec<NewMonthlyTaxReportPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewMonthlyTaxReportPayload {
    #[validate(length(min = 1, message = "tax_type is required"))]
    #[schema(example = "PPN")]
    pub tax_type: String,
    #[serde(default)]
    pub billing_code: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub report_status: String,
    pub report_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMonthlyTaxReportPayload {
    pub tax_type: Option<String>,
    pub billing_code: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    pub report_status: Option<String>,
    pub report_date: Option<NaiveDate>,
}

impl NewJobPayload for NewMonthlyJobPayload {
    type Record = MonthlyJob;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    async fn insert(&self, job_id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO monthly_jobs \
                (job_id, client_id, job_month, job_year, assigned_pic_staff_sigma_id, overall_status) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(job_id)
        .bind(self.client_id)
        .bind(self.job_month)
        .bind(self.job_year)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.overall_status.as_deref().unwrap_or(STATUS_DIKERJAKAN))
        .execute(&mut *conn)
        .await?;

        for report in &self.tax_reports {
            sqlx::query(
                "INSERT INTO monthly_tax_reports \
                    (job_id, tax_type, billing_code, payment_date, payment_amount, report_status, report_date) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(job_id)
            .bind(&report.tax_type)
            .bind(&report.billing_code)
            .bind(report.payment_date)
            .bind(report.payment_amount)
            .bind(&report.report_status)
            .bind(report.report_date)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
