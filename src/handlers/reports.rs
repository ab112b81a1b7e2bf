// src/handlers/reports.rs
//
// Sub-report endpoints hang off their parent job route, so access control is
// exactly the parent job's access control.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        annual_job::{
            AnnualDividendReport, AnnualTaxReport, NewAnnualDividendReportPayload,
            NewAnnualTaxReportPayload, UpdateAnnualDividendReportPayload,
            UpdateAnnualTaxReportPayload,
        },
        auth::AccessScope,
        monthly_job::{MonthlyTaxReport, NewMonthlyTaxReportPayload, UpdateMonthlyTaxReportPayload},
    },
};

// =============================================================================
//  MONTHLY TAX REPORTS
// =============================================================================

// POST /api/v1/monthly-jobs/{id}/tax-reports
#[utoipa::path(
    post,
    path = "/api/v1/monthly-jobs/{id}/tax-reports",
    tag = "Monthly Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = NewMonthlyTaxReportPayload,
    responses(
        (status = 201, description = "Laporan pajak ditambahkan", body = MonthlyTaxReport),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_monthly_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<NewMonthlyTaxReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .add_monthly_tax_report(job_id, scope, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

// PATCH /api/v1/monthly-jobs/{id}/tax-reports/{report_id}
#[utoipa::path(
    patch,
    path = "/api/v1/monthly-jobs/{id}/tax-reports/{report_id}",
    tag = "Monthly Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateMonthlyTaxReportPayload,
    responses(
        (status = 200, description = "Laporan pajak diperbarui", body = MonthlyTaxReport),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_monthly_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMonthlyTaxReportPayload>,
) -> Result<Json<MonthlyTaxReport>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .update_monthly_tax_report(job_id, report_id, scope, payload)
        .await?;

    Ok(Json(report))
}

// DELETE /api/v1/monthly-jobs/{id}/tax-reports/{report_id}
#[utoipa::path(
    delete,
    path = "/api/v1/monthly-jobs/{id}/tax-reports/{report_id}",
    tag = "Monthly Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Laporan pajak dihapus"),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_monthly_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .report_service
        .delete_monthly_tax_report(job_id, report_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ANNUAL SPT REPORTS
// =============================================================================

// POST /api/v1/annual-jobs/{id}/spt-reports
#[utoipa::path(
    post,
    path = "/api/v1/annual-jobs/{id}/spt-reports",
    tag = "Annual Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = NewAnnualTaxReportPayload,
    responses(
        (status = 201, description = "Laporan SPT ditambahkan", body = AnnualTaxReport),
        (status = 409, description = "Pekerjaan ini sudah punya laporan SPT"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_annual_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<NewAnnualTaxReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .add_annual_tax_report(job_id, scope, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

// PATCH /api/v1/annual-jobs/{id}/spt-reports/{report_id}
#[utoipa::path(
    patch,
    path = "/api/v1/annual-jobs/{id}/spt-reports/{report_id}",
    tag = "Annual Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateAnnualTaxReportPayload,
    responses(
        (status = 200, description = "Laporan SPT diperbarui", body = AnnualTaxReport),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_annual_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAnnualTaxReportPayload>,
) -> Result<Json<AnnualTaxReport>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .update_annual_tax_report(job_id, report_id, scope, payload)
        .await?;

    Ok(Json(report))
}

// DELETE /api/v1/annual-jobs/{id}/spt-reports/{report_id}
#[utoipa::path(
    delete,
    path = "/api/v1/annual-jobs/{id}/spt-reports/{report_id}",
    tag = "Annual Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Laporan SPT dihapus"),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_annual_tax_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .report_service
        .delete_annual_tax_report(job_id, report_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ANNUAL DIVIDEND REPORTS
// =============================================================================

// POST /api/v1/annual-jobs/{id}/dividend-reports
#[utoipa::path(
    post,
    path = "/api/v1/annual-jobs/{id}/dividend-reports",
    tag = "Annual Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = NewAnnualDividendReportPayload,
    responses(
        (status = 201, description = "Laporan dividen ditambahkan", body = AnnualDividendReport),
        (status = 409, description = "Pekerjaan ini sudah punya laporan dividen"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_annual_dividend_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<NewAnnualDividendReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .add_annual_dividend_report(job_id, scope, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

// PATCH /api/v1/annual-jobs/{id}/dividend-reports/{report_id}
#[utoipa::path(
    patch,
    path = "/api/v1/annual-jobs/{id}/dividend-reports/{report_id}",
    tag = "Annual Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateAnnualDividendReportPayload,
    responses(
        (status = 200, description = "Laporan dividen diperbarui", body = AnnualDividendReport),
        (status = 400, description = "report_date wajib saat is_reported = true"),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_annual_dividend_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAnnualDividendReportPayload>,
) -> Result<Json<AnnualDividendReport>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state
        .report_service
        .update_annual_dividend_report(job_id, report_id, scope, payload)
        .await?;

    Ok(Json(report))
}

// DELETE /api/v1/annual-jobs/{id}/dividend-reports/{report_id}
#[utoipa::path(
    delete,
    path = "/api/v1/annual-jobs/{id}/dividend-reports/{report_id}",
    tag = "Annual Jobs",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Laporan dividen dihapus"),
        (status = 404, description = "Pekerjaan atau laporan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_annual_dividend_report(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((job_id, report_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .report_service
        .delete_annual_dividend_report(job_id, report_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
