// src/models/job.rs
//
// The shared job abstraction. The four engagement kinds (bulanan, tahunan,
// SP2DK, pemeriksaan) differ only in their columns; everything behavioral
// (ownership scoping, the "Selesai" gate, invoicing) runs through `JobType`
// and the `JobRecord` trait so it is written exactly once.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgConnection;
use sqlx::postgres::{PgArguments, PgRow};
use uuid::Uuid;

use crate::common::error::AppError;

/// Terminal job status. Compared by equality; everything else is free-form.
pub const STATUS_SELESAI: &str = "Selesai";

/// Initial status for freshly created jobs when the payload leaves it out.
pub const STATUS_DIKERJAKAN: &str = "Dikerjakan";

/// The multipart part carrying the proof-of-work document.
pub const PROOF_FILE_FIELD: &str = "proof_of_work_pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobType {
    Monthly,
    Annual,
    Sp2dk,
    Pemeriksaan,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::Monthly,
        JobType::Annual,
        JobType::Sp2dk,
        JobType::Pemeriksaan,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            JobType::Monthly => "monthly_jobs",
            JobType::Annual => "annual_jobs",
            JobType::Sp2dk => "sp2dk_jobs",
            JobType::Pemeriksaan => "pemeriksaan_jobs",
        }
    }

    /// Label stored on invoice line items (`related_job_type`).
    pub fn label(&self) -> &'static str {
        match self {
            JobType::Monthly => "Pekerjaan Bulanan",
            JobType::Annual => "Pekerjaan Tahunan",
            JobType::Sp2dk => "SP2DK",
            JobType::Pemeriksaan => "Pemeriksaan",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Fixed service fee billed when a job of this type completes, in IDR.
    pub fn service_fee(&self) -> Decimal {
        match self {
            JobType::Monthly => Decimal::from(1_500_000),
            JobType::Annual => Decimal::from(5_000_000),
            JobType::Sp2dk => Decimal::from(2_500_000),
            JobType::Pemeriksaan => Decimal::from(10_000_000),
        }
    }

    pub fn invoice_description(&self, job_id: Uuid) -> String {
        let jasa = match self {
            JobType::Monthly => "Jasa Akuntansi dan Pajak Bulanan",
            JobType::Annual => "Jasa Laporan Pajak Tahunan",
            JobType::Sp2dk => "Jasa Respon SP2DK",
            JobType::Pemeriksaan => "Jasa Pendampingan Pemeriksaan Pajak",
        };
        format!("{jasa} (Job ID: {job_id})")
    }

    /// Resource label used in 404 bodies.
    pub fn resource_name(&self) -> &'static str {
        match self {
            JobType::Monthly => "Monthly job",
            JobType::Annual => "Annual job",
            JobType::Sp2dk => "SP2DK job",
            JobType::Pemeriksaan => "Pemeriksaan job",
        }
    }

    /// ORDER BY clause for list endpoints; `j` aliases the job table.
    pub fn list_order(&self) -> &'static str {
        match self {
            JobType::Monthly => "j.job_year DESC, j.job_month DESC, j.created_at DESC",
            JobType::Annual => "j.job_year DESC, j.created_at DESC",
            JobType::Sp2dk | JobType::Pemeriksaan => "j.created_at DESC",
        }
    }
}

/// `true` exactly when an update moves a job into "Selesai" from some other
/// value. Re-saving an already finished job must not count.
pub fn is_completion_transition(old_status: &str, new_status: &str) -> bool {
    new_status == STATUS_SELESAI && old_status != STATUS_SELESAI
}

/// The proof-of-work rules for a PATCH request, checked before anything is
/// written: a request that sets "Selesai" must carry a PDF, and a PDF may only
/// ride along when the resulting status is "Selesai".
pub fn validate_proof_gate(
    current_status: &str,
    form_status: Option<&str>,
    has_file: bool,
) -> Result<(), AppError> {
    if let Some(status) = form_status {
        if status == STATUS_SELESAI && !has_file {
            return Err(AppError::InvalidInput(
                "Proof of work PDF is required when setting status to 'Selesai'".to_string(),
            ));
        }
    }
    let effective_status = form_status.unwrap_or(current_status);
    if has_file && effective_status != STATUS_SELESAI {
        return Err(AppError::InvalidInput(
            "Proof of work PDF can only be uploaded when status is 'Selesai'".to_string(),
        ));
    }
    Ok(())
}

/// A multipart PATCH body after parsing: the text fields that arrived
/// non-empty, in order, plus the proof-of-work file when one was attached.
#[derive(Debug, Default)]
pub struct JobUpdateForm {
    pub fields: Vec<(String, String)>,
    pub proof_file: Option<ProofUpload>,
}

#[derive(Debug)]
pub struct ProofUpload {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl JobUpdateForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name_, _)| name_ == name)
            .map(|(_, value)| value.as_str())
    }

    /// The requested status, when the form carries one.
    pub fn status(&self) -> Option<&str> {
        self.field("overall_status")
    }
}

/// One job variant: a row type plus the SQL and patch plumbing the generic
/// repository and service need. Each implementation owns its column list; the
/// shared code only ever touches the accessors below.
#[allow(async_fn_in_trait)]
pub trait JobRecord:
    for<'r> sqlx::FromRow<'r, PgRow> + Serialize + Unpin + Send + Sync + 'static
{
    const JOB_TYPE: JobType;

    fn client_id(&self) -> Uuid;
    fn assigned_staff_id(&self) -> Option<Uuid>;
    fn status(&self) -> &str;
    fn set_proof_of_work_url(&mut self, url: String);
    fn updated_at(&self) -> DateTime<Utc>;

    /// Merge one non-empty multipart text field into the fetched row.
    /// Fields not known to the variant are ignored, like the original API.
    fn apply_patch_field(&mut self, field: &str, value: &str) -> Result<(), AppError>;

    /// Full-row UPDATE with an `updated_at` check-and-set; the repository
    /// turns zero affected rows into a conflict.
    fn persist_query(
        &self,
        expected_updated_at: DateTime<Utc>,
    ) -> sqlx::query::Query<'static, sqlx::Postgres, PgArguments>;

    /// Load child reports, when the variant has any.
    async fn load_children(&mut self, _conn: &mut PgConnection) -> Result<(), AppError> {
        Ok(())
    }

    /// Batch variant used by list endpoints.
    async fn load_children_many(
        _jobs: &mut [Self],
        _conn: &mut PgConnection,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Payload that knows how to insert its job row (and initial sub-reports)
/// inside the creation transaction.
#[allow(async_fn_in_trait)]
pub trait NewJobPayload: Send + Sync {
    type Record: JobRecord;

    fn client_id(&self) -> Uuid;
    fn assigned_staff_id(&self) -> Option<Uuid>;

    /// Variant rules the derive-level validators cannot express.
    fn validate_extra(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(&self, job_id: Uuid, conn: &mut PgConnection) -> Result<(), AppError>;
}

// ---- form field parsing ---------------------------------------------------
// Shared by every `apply_patch_field` impl. Values arrive as text parts.

pub(crate) fn parse_form_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("Invalid {field} format, expected YYYY-MM-DD")))
}

pub(crate) fn parse_form_int(field: &str, value: &str) -> Result<i32, AppError> {
    value
        .parse::<i32>()
        .map_err(|_| AppError::InvalidInput(format!("Invalid {field} format")))
}

pub(crate) fn parse_form_uuid(field: &str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::InvalidInput(format!("Invalid {field} format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_fires_only_when_entering_selesai() {
        assert!(is_completion_transition("Dikerjakan", "Selesai"));
        assert!(is_completion_transition("", "Selesai"));
        assert!(!is_completion_transition("Selesai", "Selesai"));
        assert!(!is_completion_transition("Selesai", "Dikerjakan"));
        assert!(!is_completion_transition("Dikerjakan", "Dibatalkan"));
    }

    #[test]
    fn entering_selesai_without_pdf_is_rejected() {
        let err = validate_proof_gate("Dikerjakan", Some("Selesai"), false).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn entering_selesai_with_pdf_passes() {
        assert!(validate_proof_gate("Dikerjakan", Some("Selesai"), true).is_ok());
    }

    #[test]
    fn pdf_alongside_non_final_status_is_rejected() {
        assert!(validate_proof_gate("Dikerjakan", Some("Dibatalkan"), true).is_err());
        // Leaving "Selesai" with a fresh document makes no sense either.
        assert!(validate_proof_gate("Selesai", Some("Dikerjakan"), true).is_err());
        // No status field: the job stays non-final, so the file is rejected.
        assert!(validate_proof_gate("Dikerjakan", None, true).is_err());
    }

    #[test]
    fn replacing_the_document_on_a_finished_job_is_allowed() {
        assert!(validate_proof_gate("Selesai", Some("Selesai"), true).is_ok());
        assert!(validate_proof_gate("Selesai", None, true).is_ok());
    }

    #[test]
    fn plain_field_updates_need_no_file() {
        assert!(validate_proof_gate("Dikerjakan", Some("Dibatalkan"), false).is_ok());
        assert!(validate_proof_gate("Dikerjakan", None, false).is_ok());
        assert!(validate_proof_gate("Selesai", Some("Dikerjakan"), false).is_ok());
    }

    #[test]
    fn fee_table_matches_the_contract_price_list() {
        assert_eq!(JobType::Monthly.service_fee(), Decimal::from(1_500_000));
        assert_eq!(JobType::Annual.service_fee(), Decimal::from(5_000_000));
        assert_eq!(JobType::Sp2dk.service_fee(), Decimal::from(2_500_000));
        assert_eq!(JobType::Pemeriksaan.service_fee(), Decimal::from(10_000_000));
    }

    #[test]
    fn labels_round_trip() {
        for t in JobType::ALL {
            assert_eq!(JobType::from_label(t.label()), Some(t));
        }
        assert_eq!(JobType::from_label("Lainnya"), None);
    }

    #[test]
    fn invoice_description_carries_the_job_id() {
        let id = Uuid::new_v4();
        let desc = JobType::Sp2dk.invoice_description(id);
        assert_eq!(desc, format!("Jasa Respon SP2DK (Job ID: {id})"));
    }
}
