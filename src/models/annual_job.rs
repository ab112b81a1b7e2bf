// src/models/annual_job.rs

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

/// SPT Tahunan filing attached to an annual job. At most one per job,
/// enforced by the service layer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AnnualTaxReport {
    pub report_id: Uuid,
    pub job_id: Uuid,
    pub billing_code: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    pub report_date: Option<NaiveDate>,
    pub report_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dividend investment report attached to an annual job. At most one per job.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AnnualDividendReport {
    pub report_id: Uuid,
    pub job_id: Uuid,
    pub is_reported: bool,
    pub report_date: Option<NaiveDate>,
    pub report_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AnnualJob {
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub job_year: i32,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub assigned_pic_staff_sigma_name: Option<String>,
    pub overall_status: String,
    pub proof_of_work_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub tax_reports: Vec<AnnualTaxReport>,
    #[sqlx(skip)]
    pub dividend_reports: Vec<AnnualDividendReport>,
}

impl JobRecord for AnnualJob {
    const JOB_TYPE: JobType = JobType::Annual;

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
            "UPDATE annual_jobs SET \
                job_year = $1, assigned_pic_staff_sigma_id = $2, \
                overall_status = $3, proof_of_work_url = $4, updated_at = NOW() \
             WHERE job_id = $5 AND updated_at = $6",
        )
        .bind(self.job_year)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.overall_status.clone())
        .bind(self.proof_of_work_url.clone())
        .bind(self.job_id)
        .bind(expected_updated_at)
    }

    async fn load_children(&mut self, conn: &mut PgConnection) -> Result<(), AppError> {
        self.tax_reports = sqlx::query_as::<_, AnnualTaxReport>(
            "SELECT * FROM annual_tax_reports WHERE job_id = $1 ORDER BY created_at",
        )
        .bind(self.job_id)
        .fetch_all(&mut *conn)
        .await?;
        self.dividend_reports = sqlx::query_as::<_, AnnualDividendReport>(
            "SELECT * FROM annual_dividend_reports WHERE job_id = $1 ORDER BY created_at",
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

        let tax_reports = sqlx::query_as::<_, AnnualTaxReport>(
            "SELECT * FROM annual_tax_reports WHERE job_id = ANY($1) ORDER BY created_at",
        )
        .bind(ids.clone())
        .fetch_all(&mut *conn)
        .await?;
        let dividend_reports = sqlx::query_as::<_, AnnualDividendReport>(
            "SELECT * FROM annual_dividend_reports WHERE job_id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;

        let mut tax_by_job: HashMap<Uuid, Vec<AnnualTaxReport>> = HashMap::new();
        for report in tax_reports {
            tax_by_job.entry(report.job_id).or_default().push(report);
        }
        let mut div_by_job: HashMap<Uuid, Vec<AnnualDividendReport>> = HashMap::new();
        for report in dividend_reports {
            div_by_job.entry(report.job_id).or_default().push(report);
        }
        for job in jobs.iter_mut() {
            job.tax_reports = tax_by_job.remove(&job.job_id).unwrap_or_default();
            job.dividend_reports = div_by_job.remove(&job.job_id).unwrap_or_default();
        }
        Ok(())
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewAnnualJobPayload {
    pub client_id: Uuid,
    pub job_year: i32,
    pub assigned_pic_staff_sigma_id: Option<Uuid>,
    pub overall_status: Option<String>,
    #[validate(nested)]
    pub tax_report: Option<NewAnnualTaxReportPayload>,
    #[validate(nested)]
    pub dividend_report: Option<NewAnnualDividendReportPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewAnnualTaxReportPayload {
    #[serde(default)]
    pub billing_code: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub report_status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewAnnualDividendReportPayload {
    #[serde(default)]
    pub is_reported: bool,
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub report_status: String,
}

impl NewAnnualDividendReportPayload {
    /// A report flagged as filed must say when.
    pub fn check_report_date(&self) -> Result<(), AppError> {
        if self.is_reported && self.report_date.is_none() {
            return Err(AppError::InvalidInput(
                "ReportDate is required for reported dividend reports".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnualTaxReportPayload {
    pub billing_code: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Option<Decimal>,
    pub report_date: Option<NaiveDate>,
    pub report_status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnualDividendReportPayload {
    pub is_reported: Option<bool>,
    pub report_date: Option<NaiveDate>,
    pub report_status: Option<String>,
}

impl NewJobPayload for NewAnnualJobPayload {
    type Record = AnnualJob;

    fn client_id(&self) -> Uuid {
        self.client_id
    }

    fn assigned_staff_id(&self) -> Option<Uuid> {
        self.assigned_pic_staff_sigma_id
    }

    fn validate_extra(&self) -> Result<(), AppError> {
        if let Some(dividend) = &self.dividend_report {
            dividend.check_report_date()?;
        }
        Ok(())
    }

    async fn insert(&self, job_id: Uuid, conn: &mut PgConnection) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO annual_jobs \
                (job_id, client_id, job_year, assigned_pic_staff_sigma_id, overall_status) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(job_id)
        .bind(self.client_id)
        .bind(self.job_year)
        .bind(self.assigned_pic_staff_sigma_id)
        .bind(self.overall_status.as_deref().unwrap_or(STATUS_DIKERJAKAN))
        .execute(&mut *conn)
        .await?;

        if let Some(report) = &self.tax_report {
            sqlx::query(
                "INSERT INTO annual_tax_reports \
                    (job_id, billing_code, payment_date, payment_amount, report_date, report_status) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(job_id)
            .bind(&report.billing_code)
            .bind(report.payment_date)
            .bind(report.payment_amount)
            .bind(report.report_date)
            .bind(&report.report_status)
            .execute(&mut *conn)
            .await?;
        }

        if let Some(report) = &self.dividend_report {
            sqlx::query(
                "INSERT INTO annual_dividend_reports \
                    (job_id, is_reported, report_date, report_status) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(job_id)
            .bind(report.is_reported)
            .bind(report.report_date)
            .bind(&report.report_status)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_dividend_without_a_date_is_rejected() {
        let payload = NewAnnualDividendReportPayload {
            is_reported: true,
            report_date: None,
            report_status: String::new(),
        };
        assert!(payload.check_report_date().is_err());
    }

    #[test]
    fn unreported_dividend_needs_no_date() {
        let payload = NewAnnualDividendReportPayload {
            is_reported: false,
            report_date: None,
            report_status: String::new(),
        };
        assert!(payload.check_report_date().is_ok());
    }
}
