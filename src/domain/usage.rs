// ==========================================
// 用量计费系统 - 用量领域模型
// ==========================================
// 职责: 三类数据源的标准化用量记录
// 用途: 导入层写入，报表引擎只读
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// UsageSource - 数据源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageSource {
    /// 虚拟化主机清单
    HyperV,
    /// 邮件托管
    Exchange,
    /// 对象存储
    S3,
}

impl UsageSource {
    pub const ALL: [UsageSource; 3] = [UsageSource::HyperV, UsageSource::Exchange, UsageSource::S3];

    /// 路由参数 / 报表文件名中的标识
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageSource::HyperV => "hyperv",
            UsageSource::Exchange => "exchange",
            UsageSource::S3 => "s3",
        }
    }

    /// 面向用户的数据源名称（用于错误信息）
    pub fn display_name(&self) -> &'static str {
        match self {
            UsageSource::HyperV => "Hyper-V",
            UsageSource::Exchange => "Exchange",
            UsageSource::S3 => "S3",
        }
    }

    /// 按映射文件名判断归属数据源
    ///
    /// 规则（按顺序）: 含 "hyper" → HyperV；含 "exchange"/"mail" → Exchange；含 "s3" → S3
    pub fn from_mapping_filename(file_name: &str) -> Option<UsageSource> {
        let low = file_name.to_lowercase();
        if low.contains("hyper") {
            Some(UsageSource::HyperV)
        } else if low.contains("exchange") || low.contains("mail") {
            Some(UsageSource::Exchange)
        } else if low.contains("s3") {
            Some(UsageSource::S3)
        } else {
            None
        }
    }
}

impl fmt::Display for UsageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// ReportKind - 报表类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Source(UsageSource),
    Summary,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Source(source) => source.as_str(),
            ReportKind::Summary => "summary",
        }
    }

    /// 导出文件名
    pub fn export_file_name(&self) -> String {
        format!("report_{}.xlsx", self.as_str())
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 大小写不敏感解析（hyperv / exchange / s3 / summary）
impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hyperv" => Ok(ReportKind::Source(UsageSource::HyperV)),
            "exchange" => Ok(ReportKind::Source(UsageSource::Exchange)),
            "s3" => Ok(ReportKind::Source(UsageSource::S3)),
            "summary" => Ok(ReportKind::Summary),
            _ => Err(s.to_string()),
        }
    }
}

// ==========================================
// 标准化用量记录
// ==========================================

/// Hyper-V 虚拟机用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypervUsage {
    pub account_owner: String, // VMOwner（已去空白）
    pub cpu_count: u64,        // CPUCount
    pub memory_gb: f64,        // MemoryGB（非负）
    pub iops: u64,             // IOPS
    pub capacity_gb: u64,      // CapacityGB（向上取整）
}

/// Exchange 邮箱用量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeUsage {
    pub customer_name: String,      // CustomerName
    pub tariff_description: String, // LineDescription
    pub period_quantity: u64,       // CurrentPeriod
}

/// S3 存储用量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Usage {
    pub owner: String,  // B 列
    pub volume_gb: u64, // E 列（向上取整）
}
