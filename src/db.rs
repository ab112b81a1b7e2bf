pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod job_repo;
pub use job_repo::JobRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod outbox_repo;
pub use outbox_repo::OutboxRepository;
