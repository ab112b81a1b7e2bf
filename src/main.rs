//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_middleware;
use crate::services::outbox_worker::start_worker;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Without config or a database there is nothing to start.
    let app_state = AppState::new()
        .await
        .expect("Failed to initialize application state.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Failed to run database migrations.");

    tracing::info!("✅ Database migrations applied");

    // The invoice worker lives for the whole process; it drains completion
    // events the request path left behind.
    start_worker(
        app_state.outbox_repo.clone(),
        app_state.invoice_service.clone(),
        app_state.outbox_poll_interval,
    );

    // Public routes
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Everything below requires a valid JWT.
    let staff_routes = Router::new()
        .route(
            "/",
            post(handlers::staffs::create_staff).get(handlers::staffs::list_staffs),
        )
        .route(
            "/{id}",
            get(handlers::staffs::get_staff)
                .patch(handlers::staffs::update_staff)
                .delete(handlers::staffs::delete_staff),
        )
        .route("/{id}/password", patch(handlers::staffs::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .patch(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route("/{id}/all-jobs", get(handlers::clients::get_client_all_jobs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let monthly_job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create_monthly_job).get(handlers::jobs::list_monthly_jobs),
        )
        .route(
            "/{id}",
            get(handlers::jobs::get_monthly_job)
                .patch(handlers::jobs::update_monthly_job)
                .delete(handlers::jobs::delete_monthly_job),
        )
        .route(
            "/{id}/tax-reports",
            post(handlers::reports::add_monthly_tax_report),
        )
        .route(
            "/{id}/tax-reports/{report_id}",
            patch(handlers::reports::update_monthly_tax_report)
                .delete(handlers::reports::delete_monthly_tax_report),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let annual_job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create_annual_job).get(handlers::jobs::list_annual_jobs),
        )
        .route(
            "/{id}",
            get(handlers::jobs::get_annual_job)
                .patch(handlers::jobs::update_annual_job)
                .delete(handlers::jobs::delete_annual_job),
        )
        .route(
            "/{id}/spt-reports",
            post(handlers::reports::add_annual_tax_report),
        )
        .route(
            "/{id}/spt-reports/{report_id}",
            patch(handlers::reports::update_annual_tax_report)
                .delete(handlers::reports::delete_annual_tax_report),
        )
        .route(
            "/{id}/dividend-reports",
            post(handlers::reports::add_annual_dividend_report),
        )
        .route(
            "/{id}/dividend-reports/{report_id}",
            patch(handlers::reports::update_annual_dividend_report)
                .delete(handlers::reports::delete_annual_dividend_report),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let sp2dk_job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create_sp2dk_job).get(handlers::jobs::list_sp2dk_jobs),
        )
        .route(
            "/{id}",
            get(handlers::jobs::get_sp2dk_job)
                .patch(handlers::jobs::update_sp2dk_job)
                .delete(handlers::jobs::delete_sp2dk_job),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let pemeriksaan_job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create_pemeriksaan_job).get(handlers::jobs::list_pemeriksaan_jobs),
        )
        .route(
            "/{id}",
            get(handlers::jobs::get_pemeriksaan_job)
                .patch(handlers::jobs::update_pemeriksaan_job)
                .delete(handlers::jobs::delete_pemeriksaan_job),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let invoice_routes = Router::new()
        .route(
            "/",
            post(handlers::invoices::create_invoice).get(handlers::invoices::list_invoices),
        )
        .route(
            "/{id}",
            get(handlers::invoices::get_invoice)
                .patch(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route("/{id}/pdf", get(handlers::invoices::get_invoice_pdf))
        .route("/{id}/line-items", post(handlers::invoices::add_line_item))
        .route(
            "/{id}/line-items/{item_id}",
            patch(handlers::invoices::update_line_item)
                .delete(handlers::invoices::delete_line_item),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/staffs", staff_routes)
        .nest("/api/v1/clients", client_routes)
        .nest("/api/v1/monthly-jobs", monthly_job_routes)
        .nest("/api/v1/annual-jobs", annual_job_routes)
        .nest("/api/v1/sp2dk-jobs", sp2dk_job_routes)
        .nest("/api/v1/pemeriksaan-jobs", pemeriksaan_job_routes)
        .nest("/api/v1/invoices", invoice_routes)
        .nest_service("/uploads", ServeDir::new(&app_state.upload_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    let addr = format!("0.0.0.0:{}", app_state.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");
    tracing::info!("🚀 Server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Axum server error");
}
