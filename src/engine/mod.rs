// ==========================================
// 用量计费系统 - 引擎层
// ==========================================
// 职责: 服务名称判定与报表聚合
// 红线: 纯计算，不持有状态
// ==========================================

pub mod report_builder;
pub mod service_naming;

pub use report_builder::ReportBuilder;
pub use service_naming::{exchange_service_name, hyperv_service_name, s3_service_name};
