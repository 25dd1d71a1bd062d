// ==========================================
// 用量计费系统 - 核心库
// ==========================================
// 技术栈: axum + calamine + rust_xlsxwriter
// 系统定位: 汇总 Hyper-V / Exchange / S3 用量，生成计费行
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 状态仓储层 - 进程内状态与报表缓存
pub mod repository;

// 引擎层 - 服务名称与聚合
pub mod engine;

// 导入层 - 上传文件解析
pub mod importer;

// 配置层 - 运行参数与计费规则
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ReportApi, UploadApi};
pub use app::{build_router, AppState};
pub use config::{BillingRules, ServerConfig};
pub use domain::{LineItem, ReportKind, UsageSource};
pub use repository::BillingStore;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "usage-billing";
