// src/handlers/jobs.rs
//
// One wrapper per route so Swagger gets concrete paths; all of them funnel
// into the generic JobService methods.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        annual_job::{AnnualJob, NewAnnualJobPayload},
        auth::AccessScope,
        job::{JobUpdateForm, PROOF_FILE_FIELD, ProofUpload},
        monthly_job::{MonthlyJob, NewMonthlyJobPayload},
        pemeriksaan_job::{NewPemeriksaanJobPayload, PemeriksaanJob},
        sp2dk_job::{NewSp2dkJobPayload, Sp2dkJob},
    },
};

/// Collects a `multipart/form-data` PATCH body into a [`JobUpdateForm`].
/// Text parts with an empty value are dropped (the frontend sends every
/// field, filled or not), the PDF part is buffered whole.
async fn parse_job_update_form(mut multipart: Multipart) -> Result<JobUpdateForm, AppError> {
    let mut form = JobUpdateForm {
        fields: Vec::new(),
        proof_file: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == PROOF_FILE_FIELD {
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?.to_vec();
            form.proof_file = Some(ProofUpload { content_type, data });
        } else {
            let value = field.text().await?;
            if !value.is_empty() {
                form.fields.push((name, value));
            }
        }
    }

    Ok(form)
}

// =============================================================================
//  MONTHLY JOBS (Pekerjaan Bulanan)
// =============================================================================

// POST /api/v1/monthly-jobs
#[utoipa::path(
    post,
    path = "/api/v1/monthly-jobs",
    tag = "Monthly Jobs",
    request_body = NewMonthlyJobPayload,
    responses(
        (status = 201, description = "Pekerjaan bulanan dibuat", body = MonthlyJob),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_monthly_job(
    State(app_state): State<AppState>,
    Json(payload): Json<NewMonthlyJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let job = app_state.job_service.create_job(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// GET /api/v1/monthly-jobs
#[utoipa::path(
    get,
    path = "/api/v1/monthly-jobs",
    tag = "Monthly Jobs",
    responses(
        (status = 200, description = "Daftar pekerjaan bulanan", body = Vec<MonthlyJob>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_monthly_jobs(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<MonthlyJob>>, AppError> {
    let jobs = app_state.job_service.list_jobs::<MonthlyJob>(scope).await?;
    Ok(Json(jobs))
}

// GET /api/v1/monthly-jobs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/monthly-jobs/{id}",
    tag = "Monthly Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Detail pekerjaan bulanan", body = MonthlyJob),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_monthly_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MonthlyJob>, AppError> {
    let job = app_state
        .job_service
        .get_job::<MonthlyJob>(job_id, scope)
        .await?;
    Ok(Json(job))
}

// PATCH /api/v1/monthly-jobs/{id}  (multipart/form-data)
/// Menerima `multipart/form-data`: field teks per kolom (status selalu di
/// `overall_status`, tanggal `YYYY-MM-DD`, nilai kosong diabaikan) plus file
/// PDF opsional bernama `proof_of_work_pdf`.
#[utoipa::path(
    patch,
    path = "/api/v1/monthly-jobs/{id}",
    tag = "Monthly Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Pekerjaan bulanan diperbarui", body = MonthlyJob),
        (status = 400, description = "Transisi status atau file tidak valid"),
        (status = 409, description = "Record berubah di tengah jalan, ulangi request"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_monthly_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<MonthlyJob>, AppError> {
    let form = parse_job_update_form(multipart).await?;
    let job = app_state
        .job_service
        .update_job::<MonthlyJob>(job_id, scope, form)
        .await?;
    Ok(Json(job))
}

// DELETE /api/v1/monthly-jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/monthly-jobs/{id}",
    tag = "Monthly Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Pekerjaan dihapus"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_monthly_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .job_service
        .delete_job::<MonthlyJob>(job_id, scope)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ANNUAL JOBS (Pekerjaan Tahunan)
// =============================================================================

// POST /api/v1/annual-jobs
#[utoipa::path(
    post,
    path = "/api/v1/annual-jobs",
    tag = "Annual Jobs",
    request_body = NewAnnualJobPayload,
    responses(
        (status = 201, description = "Pekerjaan tahunan dibuat", body = AnnualJob),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_annual_job(
    State(app_state): State<AppState>,
    Json(payload): Json<NewAnnualJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let job = app_state.job_service.create_job(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// GET /api/v1/annual-jobs
#[utoipa::path(
    get,
    path = "/api/v1/annual-jobs",
    tag = "Annual Jobs",
    responses(
        (status = 200, description = "Daftar pekerjaan tahunan", body = Vec<AnnualJob>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_annual_jobs(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<AnnualJob>>, AppError> {
    let jobs = app_state.job_service.list_jobs::<AnnualJob>(scope).await?;
    Ok(Json(jobs))
}

// GET /api/v1/annual-jobs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/annual-jobs/{id}",
    tag = "Annual Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Detail pekerjaan tahunan", body = AnnualJob),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_annual_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<Json<AnnualJob>, AppError> {
    let job = app_state
        .job_service
        .get_job::<AnnualJob>(job_id, scope)
        .await?;
    Ok(Json(job))
}

// PATCH /api/v1/annual-jobs/{id}  (multipart/form-data)
/// Menerima `multipart/form-data`: field teks per kolom (status selalu di
/// `overall_status`, tanggal `YYYY-MM-DD`, nilai kosong diabaikan) plus file
/// PDF opsional bernama `proof_of_work_pdf`.
#[utoipa::path(
    patch,
    path = "/api/v1/annual-jobs/{id}",
    tag = "Annual Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Pekerjaan tahunan diperbarui", body = AnnualJob),
        (status = 400, description = "Transisi status atau file tidak valid"),
        (status = 409, description = "Record berubah di tengah jalan, ulangi request"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_annual_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnnualJob>, AppError> {
    let form = parse_job_update_form(multipart).await?;
    let job = app_state
        .job_service
        .update_job::<AnnualJob>(job_id, scope, form)
        .await?;
    Ok(Json(job))
}

// DELETE /api/v1/annual-jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/annual-jobs/{id}",
    tag = "Annual Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Pekerjaan dihapus"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_annual_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .job_service
        .delete_job::<AnnualJob>(job_id, scope)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  SP2DK JOBS
// =============================================================================

// POST /api/v1/sp2dk-jobs
#[utoipa::path(
    post,
    path = "/api/v1/sp2dk-jobs",
    tag = "SP2DK Jobs",
    request_body = NewSp2dkJobPayload,
    responses(
        (status = 201, description = "Pekerjaan SP2DK dibuat", body = Sp2dkJob),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sp2dk_job(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSp2dkJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let job = app_state.job_service.create_job(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// GET /api/v1/sp2dk-jobs
#[utoipa::path(
    get,
    path = "/api/v1/sp2dk-jobs",
    tag = "SP2DK Jobs",
    responses(
        (status = 200, description = "Daftar pekerjaan SP2DK", body = Vec<Sp2dkJob>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sp2dk_jobs(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<Sp2dkJob>>, AppError> {
    let jobs = app_state.job_service.list_jobs::<Sp2dkJob>(scope).await?;
    Ok(Json(jobs))
}

// GET /api/v1/sp2dk-jobs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/sp2dk-jobs/{id}",
    tag = "SP2DK Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Detail pekerjaan SP2DK", body = Sp2dkJob),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sp2dk_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Sp2dkJob>, AppError> {
    let job = app_state
        .job_service
        .get_job::<Sp2dkJob>(job_id, scope)
        .await?;
    Ok(Json(job))
}

// PATCH /api/v1/sp2dk-jobs/{id}  (multipart/form-data)
/// Menerima `multipart/form-data`: field teks per kolom (status selalu di
/// `overall_status`, tanggal `YYYY-MM-DD`, nilai kosong diabaikan) plus file
/// PDF opsional bernama `proof_of_work_pdf`.
#[utoipa::path(
    patch,
    path = "/api/v1/sp2dk-jobs/{id}",
    tag = "SP2DK Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Pekerjaan SP2DK diperbarui", body = Sp2dkJob),
        (status = 400, description = "Transisi status atau file tidak valid"),
        (status = 409, description = "Record berubah di tengah jalan, ulangi request"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sp2dk_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Sp2dkJob>, AppError> {
    let form = parse_job_update_form(multipart).await?;
    let job = app_state
        .job_service
        .update_job::<Sp2dkJob>(job_id, scope, form)
        .await?;
    Ok(Json(job))
}

// DELETE /api/v1/sp2dk-jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/sp2dk-jobs/{id}",
    tag = "SP2DK Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Pekerjaan dihapus"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sp2dk_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .job_service
        .delete_job::<Sp2dkJob>(job_id, scope)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PEMERIKSAAN JOBS
// =============================================================================

// POST /api/v1/pemeriksaan-jobs
#[utoipa::path(
    post,
    path = "/api/v1/pemeriksaan-jobs",
    tag = "Pemeriksaan Jobs",
    request_body = NewPemeriksaanJobPayload,
    responses(
        (status = 201, description = "Pekerjaan pemeriksaan dibuat", body = PemeriksaanJob),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pemeriksaan_job(
    State(app_state): State<AppState>,
    Json(payload): Json<NewPemeriksaanJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let job = app_state.job_service.create_job(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// GET /api/v1/pemeriksaan-jobs
#[utoipa::path(
    get,
    path = "/api/v1/pemeriksaan-jobs",
    tag = "Pemeriksaan Jobs",
    responses(
        (status = 200, description = "Daftar pekerjaan pemeriksaan", body = Vec<PemeriksaanJob>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_pemeriksaan_jobs(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<PemeriksaanJob>>, AppError> {
    let jobs = app_state
        .job_service
        .list_jobs::<PemeriksaanJob>(scope)
        .await?;
    Ok(Json(jobs))
}

// GET /api/v1/pemeriksaan-jobs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/pemeriksaan-jobs/{id}",
    tag = "Pemeriksaan Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Detail pekerjaan pemeriksaan", body = PemeriksaanJob),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pemeriksaan_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<Json<PemeriksaanJob>, AppError> {
    let job = app_state
        .job_service
        .get_job::<PemeriksaanJob>(job_id, scope)
        .await?;
    Ok(Json(job))
}

// PATCH /api/v1/pemeriksaan-jobs/{id}  (multipart/form-data)
/// Menerima `multipart/form-data`: field teks per kolom (status selalu di
/// `overall_status`, tanggal `YYYY-MM-DD`, nilai kosong diabaikan) plus file
/// PDF opsional bernama `proof_of_work_pdf`.
#[utoipa::path(
    patch,
    path = "/api/v1/pemeriksaan-jobs/{id}",
    tag = "Pemeriksaan Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Pekerjaan pemeriksaan diperbarui", body = PemeriksaanJob),
        (status = 400, description = "Transisi status atau file tidak valid"),
        (status = 409, description = "Record berubah di tengah jalan, ulangi request"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pemeriksaan_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<PemeriksaanJob>, AppError> {
    let form = parse_job_update_form(multipart).await?;
    let job = app_state
        .job_service
        .update_job::<PemeriksaanJob>(job_id, scope, form)
        .await?;
    Ok(Json(job))
}

// DELETE /api/v1/pemeriksaan-jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/pemeriksaan-jobs/{id}",
    tag = "Pemeriksaan Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Pekerjaan dihapus"),
        (status = 404, description = "Pekerjaan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_pemeriksaan_job(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .job_service
        .delete_job::<PemeriksaanJob>(job_id, scope)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
