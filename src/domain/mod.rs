// ==========================================
// 用量计费系统 - 领域模型层
// ==========================================
// 职责: 表格单元、用量记录、身份映射、计费行
// 红线: 不含文件解析逻辑，不含状态管理
// ==========================================

pub mod identity;
pub mod report;
pub mod table;
pub mod usage;

// 重导出核心类型
pub use identity::{IdentityEntry, IdentityMapping, MappingUpload};
pub use report::{LineItem, REPORT_COLUMNS};
pub use table::{Cell, HeaderMode, Table};
pub use usage::{ExchangeUsage, HypervUsage, ReportKind, S3Usage, UsageSource};
