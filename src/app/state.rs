// ==========================================
// 用量计费系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约定: 每个进程一个 BillingStore，通过 Arc 注入，不使用全局单例
// ==========================================

use crate::api::{ReportApi, UploadApi};
use crate::config::{BillingRules, ConfigError, ServerConfig};
use crate::repository::BillingStore;
use std::sync::Arc;

/// 应用状态
///
/// 作为 axum 路由的共享状态，克隆开销只有若干 Arc 计数
#[derive(Clone)]
pub struct AppState {
    /// 运行参数
    pub config: Arc<ServerConfig>,

    /// 计费状态
    pub store: Arc<BillingStore>,

    /// 上传API
    pub upload_api: Arc<UploadApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 编译内置计费规则
    /// 2. 创建空的状态仓储
    /// 3. 创建所有API实例
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let rules = Arc::new(BillingRules::standard()?);
        Ok(Self::with_parts(config, Arc::new(BillingStore::new()), rules))
    }

    /// 使用外部提供的仓储与规则创建（测试注入用）
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<BillingStore>,
        rules: Arc<BillingRules>,
    ) -> Self {
        tracing::info!(
            max_upload_bytes = config.max_upload_bytes,
            "初始化AppState"
        );

        let upload_api = Arc::new(UploadApi::new(Arc::clone(&store), rules));
        let report_api = Arc::new(ReportApi::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            store,
            upload_api,
            report_api,
        }
    }
}
