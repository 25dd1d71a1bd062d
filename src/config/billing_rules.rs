// ==========================================
// 用量计费系统 - 计费规则（静态配置）
// ==========================================
// 职责: 排除名单、Exchange 资费分组
// 说明: 模式中的 "." 已转义，按字面量匹配
// ==========================================

use crate::config::error::ConfigError;
use crate::importer::exclusion_filter::{ExactSetFilter, PatternFilter};

// ===== 排除名单 =====

/// Hyper-V: VMOwner 命中任一模式则排除（大小写不敏感）
pub const EXCLUDE_VM_OWNERS: &[&str] = &[r"id\.kz", r"cloud24\.kz", r"test", r"demo"];

/// Exchange: CustomerName 精确等于以下名称则排除
pub const EXCLUDE_CUSTOMERS: &[&str] = &[
    "Service Provider",
    "test customer",
    "Belltower Group",
    "Demo Company 1",
    "FTP TEST",
];

/// S3: 所有者（B 列）命中任一模式则排除（大小写不敏感）
pub const EXCLUDE_S3_OWNERS: &[&str] = &[
    r"admin@demo1\.kz",
    r"admin@demo2\.kz",
    r"dbaioralov@id\.kz",
    r"nextcloud-prod",
    r"nextcloud\.demo1",
    r"nextcloud\.demo2",
    r"nextcloud\.test1",
    r"nextcloud\.testnew",
    r"s-veeam@id\.kz",
    r"test",
];

// ===== Exchange 资费分组 =====

pub const STANDARD_TARIFFS: &[&str] = &[
    "Exchange 2016, Standard-100GB",
    "Exchange 2016, Standard-50GB",
    "Exchange 2016, Maximum",
    "Exchange 2016, Express",
];

pub const BASIC_TARIFFS: &[&str] = &["Exchange 2016, Startup", "Exchange 2016, Basic-2GB"];

// ==========================================
// BillingRules - 编译后的规则集
// ==========================================
#[derive(Debug, Clone)]
pub struct BillingRules {
    pub vm_owner_filter: PatternFilter,
    pub customer_filter: ExactSetFilter,
    pub s3_owner_filter: PatternFilter,
}

impl BillingRules {
    /// 使用内置名单构建规则集（正则只编译一次）
    pub fn standard() -> Result<Self, ConfigError> {
        Ok(Self {
            vm_owner_filter: PatternFilter::new(EXCLUDE_VM_OWNERS)
                .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?,
            customer_filter: ExactSetFilter::new(EXCLUDE_CUSTOMERS),
            s3_owner_filter: PatternFilter::new(EXCLUDE_S3_OWNERS)
                .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_compile() {
        let rules = BillingRules::standard().unwrap();
        assert!(rules.vm_owner_filter.is_excluded(Some("vm01@cloud24.kz")));
        assert!(rules.vm_owner_filter.is_excluded(Some("DEMO-stand")));
        assert!(rules.customer_filter.is_excluded("Belltower Group"));
        assert!(rules.s3_owner_filter.is_excluded(Some("nextcloud-prod-bucket")));
        assert!(!rules.s3_owner_filter.is_excluded(Some("nextcloud.client")));
    }

    #[test]
    fn test_tariff_sets_are_disjoint() {
        for tariff in STANDARD_TARIFFS {
            assert!(!BASIC_TARIFFS.contains(tariff));
        }
    }
}
