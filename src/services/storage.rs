// src/services/storage.rs

use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::{common::error::AppError, models::job::ProofUpload};

/// Local-disk store for proof-of-work files. Files are keyed by job id, so a
/// replacement upload lands on top of the old one and never leaks a copy.
#[derive(Clone)]
pub struct StorageService {
    upload_dir: PathBuf,
}

impl StorageService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Writes the PDF and returns the URL path it will be served under.
    pub async fn save_proof_pdf(
        &self,
        job_id: Uuid,
        upload: &ProofUpload,
    ) -> Result<String, AppError> {
        if upload.content_type.as_deref() != Some("application/pdf") {
            return Err(AppError::InvalidInput(
                "Uploaded file must be a PDF".to_string(),
            ));
        }

        fs::create_dir_all(&self.upload_dir).await?;

        let filename = format!("{job_id}.pdf");
        fs::write(self.upload_dir.join(&filename), &upload.data).await?;

        Ok(format!("/uploads/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_upload() -> ProofUpload {
        ProofUpload {
            content_type: Some("application/pdf".to_string()),
            data: b"%PDF-1.4 test".to_vec(),
        }
    }

    #[tokio::test]
    async fn saves_under_job_id_and_returns_url_path() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        let service = StorageService::new(&dir);
        let job_id = Uuid::new_v4();

        let url = service.save_proof_pdf(job_id, &pdf_upload()).await.unwrap();
        assert_eq!(url, format!("/uploads/{job_id}.pdf"));

        let on_disk = tokio::fs::read(dir.join(format!("{job_id}.pdf"))).await.unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 test");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_non_pdf_content_types() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        let service = StorageService::new(&dir);

        let upload = ProofUpload {
            content_type: Some("image/png".to_string()),
            data: vec![1, 2, 3],
        };
        let err = service.save_proof_pdf(Uuid::new_v4(), &upload).await;
        assert!(matches!(err, Err(AppError::InvalidInput(_))));

        let missing = ProofUpload {
            content_type: None,
            data: vec![1, 2, 3],
        };
        let err = service.save_proof_pdf(Uuid::new_v4(), &missing).await;
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
    }
}
