pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::service::LedgerService;

pub use handlers::*;

/// 构建路由
pub fn router(service: Arc<LedgerService>, max_upload_bytes: usize) -> Router {
    let record_routes = Router::new()
        .route(
            "/api/records",
            get(handlers::list_records)
                .post(handlers::add_record)
                .put(handlers::save_records)
                .delete(handlers::reset_records),
        )
        .route("/api/records/:index", delete(handlers::delete_record));

    let transfer_routes = Router::new()
        .route(
            "/api/import",
            post(handlers::import_workbook).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/export", get(handlers::export_xlsx))
        .route("/api/export.csv", get(handlers::export_csv));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(record_routes)
        .merge(transfer_routes)
        .with_state(service)
}
