// src/db/report_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::annual_job::{
        AnnualDividendReport, AnnualTaxReport, NewAnnualDividendReportPayload,
        NewAnnualTaxReportPayload,
    },
    models::monthly_job::{MonthlyTaxReport, NewMonthlyTaxReportPayload},
};

/// Sub-report persistence for monthly and annual jobs. Visibility of the
/// parent job is checked by the service before any of these run.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  MONTHLY TAX REPORTS
    // =========================================================================

    pub async fn create_monthly_tax_report(
        &self,
        job_id: Uuid,
        payload: &NewMonthlyTaxReportPayload,
    ) -> Result<MonthlyTaxReport, AppError> {
        let report = sqlx::query_as::<_, MonthlyTaxReport>(
            "INSERT INTO monthly_tax_reports \
                (job_id, tax_type, billing_code, payment_date, payment_amount, report_status, report_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(job_id)
        .bind(&payload.tax_type)
        .bind(&payload.billing_code)
        .bind(payload.payment_date)
        .bind(payload.payment_amount)
        .bind(&payload.report_status)
        .bind(payload.report_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_monthly_tax_report(
        &self,
        report_id: Uuid,
    ) -> Result<Option<MonthlyTaxReport>, AppError> {
        let report = sqlx::query_as::<_, MonthlyTaxReport>(
            "SELECT * FROM monthly_tax_reports WHERE report_id = $1",
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn update_monthly_tax_report(
        &self,
        report: &MonthlyTaxReport,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE monthly_tax_reports SET \
                tax_type = $1, billing_code = $2, payment_date = $3, payment_amount = $4, \
                report_status = $5, report_date = $6, updated_at = NOW() \
             WHERE report_id = $7",
        )
        .bind(&report.tax_type)
        .bind(&report.billing_code)
        .bind(report.payment_date)
        .bind(report.payment_amount)
        .bind(&report.report_status)
        .bind(report.report_date)
        .bind(report.report_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_monthly_tax_report(&self, report_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM monthly_tax_reports WHERE report_id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  ANNUAL TAX REPORTS (SPT Tahunan)
    // =========================================================================

    pub async fn annual_tax_report_exists(&self, job_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM annual_tax_reports WHERE job_id = $1)",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_annual_tax_report(
        &self,
        job_id: Uuid,
        payload: &NewAnnualTaxReportPayload,
    ) -> Result<AnnualTaxReport, AppError> {
        let report = sqlx::query_as::<_, AnnualTaxReport>(
            "INSERT INTO annual_tax_reports \
                (job_id, billing_code, payment_date, payment_amount, report_date, report_status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(job_id)
        .bind(&payload.billing_code)
        .bind(payload.payment_date)
        .bind(payload.payment_amount)
        .bind(payload.report_date)
        .bind(&payload.report_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_annual_tax_report(
        &self,
        report_id: Uuid,
    ) -> Result<Option<AnnualTaxReport>, AppError> {
        let report = sqlx::query_as::<_, AnnualTaxReport>(
            "SELECT * FROM annual_tax_reports WHERE report_id = $1",
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn update_annual_tax_report(
        &self,
        report: &AnnualTaxReport,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE annual_tax_reports SET \
                billing_code = $1, payment_date = $2, payment_amount = $3, \
                report_date = $4, report_status = $5, updated_at = NOW() \
             WHERE report_id = $6",
        )
        .bind(&report.billing_code)
        .bind(report.payment_date)
        .bind(report.payment_amount)
        .bind(report.report_date)
        .bind(&report.report_status)
        .bind(report.report_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_annual_tax_report(&self, report_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM annual_tax_reports WHERE report_id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  ANNUAL DIVIDEND REPORTS
    // =========================================================================

    pub async fn annual_dividend_report_exists(&self, job_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM annual_dividend_reports WHERE job_id = $1)",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_annual_dividend_report(
        &self,
        job_id: Uuid,
        payload: &NewAnnualDividendReportPayload,
    ) -> Result<AnnualDividendReport, AppError> {
        let report = sqlx::query_as::<_, AnnualDividendReport>(
            "INSERT INTO annual_dividend_reports \
                (job_id, is_reported, report_date, report_status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(job_id)
        .bind(payload.is_reported)
        .bind(payload.report_date)
        .bind(&payload.report_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_annual_dividend_report(
        &self,
        report_id: Uuid,
    ) -> Result<Option<AnnualDividendReport>, AppError> {
        let report = sqlx::query_as::<_, AnnualDividendReport>(
            "SELECT * FROM annual_dividend_reports WHERE report_id = $1",
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn update_annual_dividend_report(
        &self,
        report: &AnnualDividendReport,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE annual_dividend_reports SET \
                is_reported = $1, report_date = $2, report_status = $3, updated_at = NOW() \
             WHERE report_id = $4",
        )
        .bind(report.is_reported)
        .bind(report.report_date)
        .bind(&report.report_status)
        .bind(report.report_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_annual_dividend_report(&self, report_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM annual_dividend_reports WHERE report_id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
