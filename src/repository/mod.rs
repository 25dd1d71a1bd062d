// ==========================================
// 用量计费系统 - 状态仓储层
// ==========================================
// 红线: Repository 不做文件解析，只保存已标准化的数据
// 职责: 进程内状态与报表缓存，屏蔽加锁细节
// ==========================================

pub mod billing_store;
pub mod error;

pub use billing_store::{BillingStore, SharedReport, SourceStatus, StoreStatus, UploadMeta};
pub use error::{RepositoryError, RepositoryResult};
