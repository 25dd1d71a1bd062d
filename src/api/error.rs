// ==========================================
// 用量计费系统 - API层错误类型
// ==========================================
// 职责: 汇总导入/仓储/导出错误，映射为 HTTP 状态码
// 约定: 响应体统一为 {"detail": "<原因>"}
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误（400）
    // ==========================================
    #[error("Некорректный запрос: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Неизвестный тип отчета: {0}")]
    UnknownReportType(String),

    // ==========================================
    // 服务端错误（500）
    // ==========================================
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Ошибка формирования файла: {0}")]
    ExportError(String),

    #[error("Внутренняя ошибка: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::UnknownReportType(_) | ApiError::Import(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Repository(_)
            | ApiError::ExportError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ApiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "请求处理失败");
        } else {
            tracing::warn!(error = %self, "请求被拒绝");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_errors_are_client_errors() {
        let err: ApiError = ImportError::SchemaError {
            source_name: "Exchange".to_string(),
            column: "CustomerName".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("CustomerName"));

        let err: ApiError = ImportError::FormatError("zip".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors() {
        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::ExportError("disk full".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_report_type_message() {
        let err = ApiError::UnknownReportType("invoices".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("invoices"));
    }
}
