// ==========================================
// 用量计费系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 HTTP 路由调用
// ==========================================

pub mod error;
pub mod export;
pub mod report_api;
pub mod upload_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::{ExportFile, SHEET_NAME, XLSX_CONTENT_TYPE};
pub use report_api::ReportApi;
pub use upload_api::{MappingUploadResponse, UploadApi, UploadResponse};
