// src/services/job_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, JobRepository, OutboxRepository, StaffRepository},
    models::{
        auth::AccessScope,
        job::{
            JobRecord, JobUpdateForm, NewJobPayload, is_completion_transition, parse_form_uuid,
            validate_proof_gate,
        },
    },
    services::storage::StorageService,
};

/// One service for all four engagement kinds. The variant-specific SQL and
/// field handling live behind [`JobRecord`]; everything here is the shared
/// lifecycle: referential checks, the proof-of-work gate, the guarded write,
/// and the completion event.
#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
    job_repo: JobRepository,
    client_repo: ClientRepository,
    staff_repo: StaffRepository,
    storage: StorageService,
}

impl JobService {
    pub fn new(
        pool: PgPool,
        job_repo: JobRepository,
        client_repo: ClientRepository,
        staff_repo: StaffRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            pool,
            job_repo,
            client_repo,
            staff_repo,
            storage,
        }
    }

    async fn check_client(&self, client_id: Uuid) -> Result<(), AppError> {
        if self
            .client_repo
            .find_by_id(client_id, AccessScope::admin())
            .await?
            .is_none()
        {
            return Err(AppError::InvalidInput("Client ID not found".to_string()));
        }
        Ok(())
    }

    async fn check_assigned_staff(&self, staff_id: Uuid) -> Result<(), AppError> {
        if self.staff_repo.find_by_id(staff_id).await?.is_none() {
            return Err(AppError::InvalidInput(
                "Assigned PIC Staff ID not found".to_string(),
            ));
        }
        Ok(())
    }

    /// Any authenticated staff may create a job and assign any PIC; ownership
    /// only restricts what they can see afterwards.
    pub async fn create_job<P: NewJobPayload>(&self, payload: P) -> Result<P::Record, AppError> {
        payload.validate_extra()?;
        self.check_client(payload.client_id()).await?;
        if let Some(staff_id) = payload.assigned_staff_id() {
            self.check_assigned_staff(staff_id).await?;
        }

        let job_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;
        payload.insert(job_id, &mut *tx).await?;
        tx.commit().await?;

        // Re-read through the display joins. The creator may have assigned
        // someone else, so this read is deliberately unscoped.
        self.job_repo
            .find::<P::Record>(job_id, AccessScope::admin())
            .await?
            .ok_or(AppError::NotFound(P::Record::JOB_TYPE.resource_name()))
    }

    pub async fn get_job<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<J, AppError> {
        self.job_repo
            .find::<J>(job_id, scope)
            .await?
            .ok_or(AppError::NotFound(J::JOB_TYPE.resource_name()))
    }

    pub async fn list_jobs<J: JobRecord>(&self, scope: AccessScope) -> Result<Vec<J>, AppError> {
        self.job_repo.list::<J>(scope).await
    }

    /// Applies a multipart PATCH. Everything between the scoped read and the
    /// guarded write happens in one transaction, and the completion event is
    /// queued in that same transaction, so "job finished" and "invoice
    /// pending" can never disagree.
    pub async fn update_job<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
        form: JobUpdateForm,
    ) -> Result<J, AppError> {
        if let Some(value) = form.field("assigned_pic_staff_sigma_id") {
            let staff_id = parse_form_uuid("assigned_pic_staff_sigma_id", value)?;
            self.check_assigned_staff(staff_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        let mut job: J = JobRepository::find_on(&mut *tx, job_id, scope)
            .await?
            .ok_or(AppError::NotFound(J::JOB_TYPE.resource_name()))?;

        let old_status = job.status().to_string();
        let expected_updated_at = job.updated_at();

        validate_proof_gate(&old_status, form.status(), form.proof_file.is_some())?;

        for (field, value) in &form.fields {
            job.apply_patch_field(field, value)?;
        }

        if let Some(upload) = &form.proof_file {
            let url = self.storage.save_proof_pdf(job_id, upload).await?;
            job.set_proof_of_work_url(url);
        }

        JobRepository::persist(&mut *tx, &job, expected_updated_at).await?;

        if is_completion_transition(&old_status, job.status()) {
            OutboxRepository::enqueue(
                &mut *tx,
                job_id,
                J::JOB_TYPE,
                job.client_id(),
                job.assigned_staff_id(),
            )
            .await?;
            tracing::info!(
                "📄 {} {job_id} selesai, invoice event queued",
                J::JOB_TYPE.label()
            );
        }

        tx.commit().await?;

        // The caller may have just reassigned the job away from themselves;
        // they still get the record they updated back.
        self.job_repo
            .find::<J>(job_id, AccessScope::admin())
            .await?
            .ok_or(AppError::NotFound(J::JOB_TYPE.resource_name()))
    }

    pub async fn delete_job<J: JobRecord>(
        &self,
        job_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        let rows = self.job_repo.delete::<J>(job_id, scope).await?;
        if rows == 0 {
            return Err(AppError::NotFound(J::JOB_TYPE.resource_name()));
        }
        Ok(())
    }
}
