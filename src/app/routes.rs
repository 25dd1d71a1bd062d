// ==========================================
// 用量计费系统 - HTTP 路由
// ==========================================
// 职责: multipart 上传 / 报表查询 / xlsx 导出 / 健康检查
// 约定: 文件解析放到阻塞线程池执行，不占用异步工作线程
// ==========================================

use crate::api::{
    ApiError, ApiResult, MappingUploadResponse, UploadResponse, XLSX_CONTENT_TYPE,
};
use crate::app::state::AppState;
use crate::domain::report::LineItem;
use crate::domain::usage::UsageSource;
use crate::importer::UploadedFile;
use crate::repository::StoreStatus;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // 健康检查与状态
        .route("/health", get(health))
        .route("/api/status", get(status))
        // 上传
        .route("/api/upload/hyperv", post(upload_hyperv))
        .route("/api/upload/exchange", post(upload_exchange))
        .route("/api/upload/s3", post(upload_s3))
        .route("/api/upload/bin-mapping", post(upload_bin_mapping))
        // 报表
        .route("/api/reports/:kind", get(get_report))
        .route("/api/export/:report_type", get(export_report))
        // 中间件
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ==========================================
// multipart 读取
// ==========================================

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::InvalidInput(err.to_string())
}

fn join_error(err: tokio::task::JoinError) -> ApiError {
    ApiError::InternalError(err.to_string())
}

/// 读取所有文件字段（带文件名或字段名为 file/files 的部分）
async fn read_files(mut multipart: Multipart, limit: Option<usize>) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let is_file = field.file_name().is_some()
            || matches!(field.name(), Some("file") | Some("files"));
        if !is_file {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });

        if limit.is_some_and(|max| files.len() >= max) {
            break;
        }
    }
    Ok(files)
}

// ==========================================
// 处理函数
// ==========================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": crate::VERSION }))
}

async fn status(State(state): State<AppState>) -> ApiResult<Json<StoreStatus>> {
    Ok(Json(state.report_api.status()?))
}

async fn upload_usage(
    state: AppState,
    source: UsageSource,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let file = read_files(multipart, Some(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::InvalidInput("файл не передан".to_string()))?;

    let api = Arc::clone(&state.upload_api);
    let response = tokio::task::spawn_blocking(move || {
        api.upload_usage(source, &file.bytes, Some(file.file_name.as_str()))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

async fn upload_hyperv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    upload_usage(state, UsageSource::HyperV, multipart).await
}

async fn upload_exchange(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    upload_usage(state, UsageSource::Exchange, multipart).await
}

async fn upload_s3(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    upload_usage(state, UsageSource::S3, multipart).await
}

async fn upload_bin_mapping(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<MappingUploadResponse>> {
    let files = read_files(multipart, None).await?;

    let api = Arc::clone(&state.upload_api);
    let response = tokio::task::spawn_blocking(move || api.upload_mappings(files))
        .await
        .map_err(join_error)??;

    Ok(Json(response))
}

async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<LineItem>>> {
    let report = state.report_api.get_report_by_name(&kind)?;
    Ok(Json(report.as_slice().to_vec()))
}

async fn export_report(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> ApiResult<Response> {
    let api = Arc::clone(&state.report_api);
    let file = tokio::task::spawn_blocking(move || api.export_report(&report_type))
        .await
        .map_err(join_error)??;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
