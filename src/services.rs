// src/services.rs

pub mod auth;
pub mod client_service;
pub mod invoice_service;
pub mod job_service;
pub mod outbox_worker;
pub mod pdf_service;
pub mod report_service;
pub mod staff_service;
pub mod storage;
