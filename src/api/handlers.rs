use crate::error::LedgerError;
use crate::models::{DatasetSnapshot, ImportSummary, MergeMode, RecordDraft};
use crate::service::{LedgerService, ViewFilter};
use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLSX_FILE_NAME: &str = "nfs_a_pagar_atualizado.xlsx";
const CSV_FILE_NAME: &str = "nfs_a_pagar_atualizado.csv";

/// 导入参数
#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: MergeMode,
}

/// 失败响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// 导入响应体（含统计信息）
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub summary: ImportSummary,
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LedgerError::MissingSupplier { .. } | LedgerError::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            LedgerError::IndexOutOfRange(_) => StatusCode::NOT_FOUND,
            LedgerError::Workbook(_) | LedgerError::NoWorksheet => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::Xlsx(_) | LedgerError::Csv(_) | LedgerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            success: false,
            message: format!("Error: {}", self),
        };
        (status, Json(body)).into_response()
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 当前数据集（可带筛选条件）
pub async fn list_records(
    State(service): State<Arc<LedgerService>>,
    Query(filter): Query<ViewFilter>,
) -> Json<DatasetSnapshot> {
    Json(service.snapshot(&filter).await)
}

/// 手工新增一行
pub async fn add_record(
    State(service): State<Arc<LedgerService>>,
    Json(draft): Json<RecordDraft>,
) -> Result<(StatusCode, Json<DatasetSnapshot>), LedgerError> {
    let snapshot = service.add(&draft).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// 保存编辑后的整张表
pub async fn save_records(
    State(service): State<Arc<LedgerService>>,
    Json(drafts): Json<Vec<RecordDraft>>,
) -> Result<Json<DatasetSnapshot>, LedgerError> {
    Ok(Json(service.save(&drafts).await?))
}

/// 删除一行（行号为路径中的原始文本）
pub async fn delete_record(
    State(service): State<Arc<LedgerService>>,
    Path(index): Path<String>,
) -> Result<Json<DatasetSnapshot>, LedgerError> {
    Ok(Json(service.delete(&index).await?))
}

/// 清空数据集
pub async fn reset_records(State(service): State<Arc<LedgerService>>) -> Json<DatasetSnapshot> {
    Json(service.reset().await)
}

/// 上传工作簿导入
pub async fn import_workbook(
    State(service): State<Arc<LedgerService>>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<ImportResponse>, LedgerError> {
    let summary = service.import(&body, query.mode).await?;
    Ok(Json(ImportResponse {
        success: true,
        message: format!(
            "Imported {} rows: {} added, {} duplicates skipped",
            summary.imported, summary.added, summary.skipped
        ),
        summary,
    }))
}

/// 下载 xlsx
pub async fn export_xlsx(State(service): State<Arc<LedgerService>>) -> Result<Response, LedgerError> {
    let bytes = service.export_xlsx().await?;
    Ok(attachment(XLSX_CONTENT_TYPE, XLSX_FILE_NAME, bytes))
}

/// 下载 csv
pub async fn export_csv(State(service): State<Arc<LedgerService>>) -> Result<Response, LedgerError> {
    let bytes = service.export_csv().await?;
    Ok(attachment("text/csv; charset=utf-8", CSV_FILE_NAME, bytes))
}

fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
