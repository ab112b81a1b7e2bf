// src/services/report_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{JobRepository, ReportRepository},
    models::{
        auth::AccessScope,
        annual_job::{
            AnnualDividendReport, AnnualJob, AnnualTaxReport, NewAnnualDividendReportPayload,
            NewAnnualTaxReportPayload, UpdateAnnualDividendReportPayload,
            UpdateAnnualTaxReportPayload,
        },
        job::JobRecord,
        monthly_job::{MonthlyJob, MonthlyTaxReport, NewMonthlyTaxReportPayload,
            UpdateMonthlyTaxReportPayload},
    },
};

/// Sub-report CRUD. Every operation first resolves the parent job under the
/// caller's scope, so a report under someone else's job is as invisible as
/// the job itself.
#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    job_repo: JobRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository, job_repo: JobRepository) -> Self {
        Self { repo, job_repo }
    }

    async fn check_parent<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        self.job_repo
            .find::<J>(job_id, scope)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound(J::JOB_TYPE.resource_name()))
    }

    // =========================================================================
    //  MONTHLY TAX REPORTS
    // =========================================================================

    pub async fn add_monthly_tax_report(
        &self,
        job_id: Uuid,
        scope: AccessScope,
        payload: NewMonthlyTaxReportPayload,
    ) -> Result<MonthlyTaxReport, AppError> {
        self.check_parent::<MonthlyJob>(job_id, scope).await?;
        self.repo.create_monthly_tax_report(job_id, &payload).await
    }

    pub async fn update_monthly_tax_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
        payload: UpdateMonthlyTaxReportPayload,
    ) -> Result<MonthlyTaxReport, AppError> {
        self.check_parent::<MonthlyJob>(job_id, scope).await?;

        let mut report = self
            .repo
            .find_monthly_tax_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Tax report"))?;

        if let Some(v) = payload.tax_type {
            report.tax_type = v;
        }
        if let Some(v) = payload.billing_code {
            report.billing_code = v;
        }
        if let Some(v) = payload.payment_date {
            report.payment_date = Some(v);
        }
        if let Some(v) = payload.payment_amount {
            report.payment_amount = Some(v);
        }
        if let Some(v) = payload.report_status {
            report.report_status = v;
        }
        if let Some(v) = payload.report_date {
            report.report_date = Some(v);
        }

        let rows = self.repo.update_monthly_tax_report(&report).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Tax report"));
        }

        self.repo
            .find_monthly_tax_report(report_id)
            .await?
            .ok_or(AppError::NotFound("Tax report"))
    }

    pub async fn delete_monthly_tax_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        self.check_parent::<MonthlyJob>(job_id, scope).await?;

        self.repo
            .find_monthly_tax_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Tax report"))?;

        let rows = self.repo.delete_monthly_tax_report(report_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Tax report"));
        }
        Ok(())
    }

    // =========================================================================
    //  ANNUAL TAX REPORTS (SPT Tahunan)
    // =========================================================================

    pub async fn add_annual_tax_report(
        &self,
        job_id: Uuid,
        scope: AccessScope,
        payload: NewAnnualTaxReportPayload,
    ) -> Result<AnnualTaxReport, AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        if self.repo.annual_tax_report_exists(job_id).await? {
            return Err(AppError::Conflict(
                "An annual tax report already exists for this job".to_string(),
            ));
        }

        self.repo.create_annual_tax_report(job_id, &payload).await
    }

    pub async fn update_annual_tax_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
        payload: UpdateAnnualTaxReportPayload,
    ) -> Result<AnnualTaxReport, AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        let mut report = self
            .repo
            .find_annual_tax_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Annual tax report"))?;

        if let Some(v) = payload.billing_code {
            report.billing_code = v;
        }
        if let Some(v) = payload.payment_date {
            report.payment_date = Some(v);
        }
        if let Some(v) = payload.payment_amount {
            report.payment_amount = Some(v);
        }
        if let Some(v) = payload.report_date {
            report.report_date = Some(v);
        }
        if let Some(v) = payload.report_status {
            report.report_status = v;
        }

        let rows = self.repo.update_annual_tax_report(&report).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Annual tax report"));
        }

        self.repo
            .find_annual_tax_report(report_id)
            .await?
            .ok_or(AppError::NotFound("Annual tax report"))
    }

    pub async fn delete_annual_tax_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        self.repo
            .find_annual_tax_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Annual tax report"))?;

        let rows = self.repo.delete_annual_tax_report(report_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Annual tax report"));
        }
        Ok(())
    }

    // =========================================================================
    //  ANNUAL DIVIDEND REPORTS
    // =========================================================================

    pub async fn add_annual_dividend_report(
        &self,
        job_id: Uuid,
        scope: AccessScope,
        payload: NewAnnualDividendReportPayload,
    ) -> Result<AnnualDividendReport, AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        if self.repo.annual_dividend_report_exists(job_id).await? {
            return Err(AppError::Conflict(
                "An annual dividend report already exists for this job".to_string(),
            ));
        }

        payload.check_report_date()?;

        self.repo
            .create_annual_dividend_report(job_id, &payload)
            .await
    }

    pub async fn update_annual_dividend_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
        payload: UpdateAnnualDividendReportPayload,
    ) -> Result<AnnualDividendReport, AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        let mut report = self
            .repo
            .find_annual_dividend_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Dividend report"))?;

        if let Some(v) = payload.is_reported {
            report.is_reported = v;
        }
        if let Some(v) = payload.report_date {
            report.report_date = Some(v);
        }
        if let Some(v) = payload.report_status {
            report.report_status = v;
        }

        // The merged row must still satisfy the filing rule.
        if report.is_reported && report.report_date.is_none() {
            return Err(AppError::InvalidInput(
                "ReportDate is required when setting is_reported to true".to_string(),
            ));
        }

        let rows = self.repo.update_annual_dividend_report(&report).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Dividend report"));
        }

        self.repo
            .find_annual_dividend_report(report_id)
            .await?
            .ok_or(AppError::NotFound("Dividend report"))
    }

    pub async fn delete_annual_dividend_report(
        &self,
        job_id: Uuid,
        report_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        self.check_parent::<AnnualJob>(job_id, scope).await?;

        self.repo
            .find_annual_dividend_report(report_id)
            .await?
            .filter(|r| r.job_id == job_id)
            .ok_or(AppError::NotFound("Dividend report"))?;

        let rows = self.repo.delete_annual_dividend_report(report_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Dividend report"));
        }
        Ok(())
    }
}
