// ==========================================
// 用量计费系统 - 报表API
// ==========================================
// 职责: 报表查询（JSON）与导出（xlsx）、状态快照
// 约定: 未知报表类型返回 UnknownReportType，不触碰仓储
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::export::{write_report_xlsx, ExportFile};
use crate::domain::usage::ReportKind;
use crate::repository::{BillingStore, SharedReport, StoreStatus};
use std::sync::Arc;
use tracing::{debug, info};

/// 报表API
pub struct ReportApi {
    store: Arc<BillingStore>,
}

impl ReportApi {
    pub fn new(store: Arc<BillingStore>) -> Self {
        Self { store }
    }

    /// 解析报表类型（大小写不敏感）
    pub fn parse_kind(report_type: &str) -> ApiResult<ReportKind> {
        report_type
            .parse::<ReportKind>()
            .map_err(ApiError::UnknownReportType)
    }

    /// 获取报表
    pub fn get_report(&self, kind: ReportKind) -> ApiResult<SharedReport> {
        let report = self.store.report(kind)?;
        debug!(report = %kind, items = report.len(), "报表已返回");
        Ok(report)
    }

    /// 按名称获取报表
    pub fn get_report_by_name(&self, report_type: &str) -> ApiResult<SharedReport> {
        let kind = Self::parse_kind(report_type)?;
        self.get_report(kind)
    }

    /// 导出报表为 xlsx
    ///
    /// # 返回
    /// - Ok(ExportFile): 文件名为 report_<type>.xlsx
    /// - Err(UnknownReportType): 类型无法识别
    /// - Err(ExportError): 生成工作簿失败
    pub fn export_report(&self, report_type: &str) -> ApiResult<ExportFile> {
        let kind = Self::parse_kind(report_type)?;
        let report = self.get_report(kind)?;
        let bytes = write_report_xlsx(&report)?;

        info!(report = %kind, items = report.len(), size = bytes.len(), "报表已导出");
        Ok(ExportFile {
            file_name: kind.export_file_name(),
            bytes,
        })
    }

    /// 仓储状态快照
    pub fn status(&self) -> ApiResult<StoreStatus> {
        Ok(self.store.status()?)
    }
}
