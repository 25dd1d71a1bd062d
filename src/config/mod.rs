// ==========================================
// 用量计费系统 - 配置层
// ==========================================
// 职责: 服务运行参数（环境变量）与内置计费规则
// ==========================================

pub mod billing_rules;
pub mod error;
pub mod server_config;

pub use billing_rules::BillingRules;
pub use error::ConfigError;
pub use server_config::{config_keys, LogFormat, ServerConfig};
