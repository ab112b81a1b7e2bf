// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        ClientRepository, InvoiceRepository, JobRepository, OutboxRepository, ReportRepository,
        StaffRepository,
    },
    services::{
        auth::AuthService, client_service::ClientService, invoice_service::InvoiceService,
        job_service::JobService, pdf_service::PdfService, report_service::ReportService,
        staff_service::StaffService, storage::StorageService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_port: u16,
    pub upload_dir: String,
    pub outbox_poll_interval: Duration,

    pub auth_service: AuthService,
    pub staff_service: StaffService,
    pub client_service: ClientService,
    pub job_service: JobService,
    pub report_service: ReportService,
    pub invoice_service: InvoiceService,
    pub pdf_service: PdfService,
    pub outbox_repo: OutboxRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;
        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("SERVER_PORT must be a port number")?,
            Err(_) => 8080,
        };
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let outbox_poll_ms = match env::var("OUTBOX_POLL_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("OUTBOX_POLL_MS must be a duration in milliseconds")?,
            Err(_) => 5000,
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Database connection established");

        // --- Dependency graph ---
        let staff_repo = StaffRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let job_repo = JobRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let outbox_repo = OutboxRepository::new(db_pool.clone());

        let storage = StorageService::new(upload_dir.clone());
        let auth_service = AuthService::new(staff_repo.clone(), jwt_secret);
        let staff_service = StaffService::new(staff_repo.clone());
        let client_service = ClientService::new(
            client_repo.clone(),
            staff_repo.clone(),
            job_repo.clone(),
        );
        let job_service = JobService::new(
            db_pool.clone(),
            job_repo.clone(),
            client_repo.clone(),
            staff_repo.clone(),
            storage,
        );
        let report_service = ReportService::new(report_repo, job_repo);
        let invoice_service = InvoiceService::new(
            db_pool.clone(),
            invoice_repo,
            client_repo,
            staff_repo,
        );
        let pdf_service = PdfService::new();

        Ok(Self {
            db_pool,
            server_port,
            upload_dir,
            outbox_poll_interval: Duration::from_millis(outbox_poll_ms),
            auth_service,
            staff_service,
            client_service,
            job_service,
            report_service,
            invoice_service,
            pdf_service,
            outbox_repo,
        })
    }
}
