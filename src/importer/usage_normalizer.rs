// ==========================================
// 用量计费系统 - 数据源标准化器
// ==========================================
// 阶段 1-4: 结构校验 → 标识清洗 → 排除过滤 → 数值转换
// 数据源: Hyper-V（按表头） / Exchange（按表头） / S3（按列位置，无表头）
// ==========================================

use crate::config::billing_rules::BillingRules;
use crate::domain::table::{HeaderMode, Table};
use crate::domain::usage::{ExchangeUsage, HypervUsage, S3Usage, UsageSource};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::UsageNormalizer;

// ===== Hyper-V 列名 =====
pub const COL_VM_OWNER: &str = "VMOwner";
pub const COL_CPU_COUNT: &str = "CPUCount";
pub const COL_MEMORY_GB: &str = "MemoryGB";
pub const COL_IOPS: &str = "IOPS";
pub const COL_CAPACITY_GB: &str = "CapacityGB";

// ===== Exchange 列名 =====
pub const COL_CUSTOMER_NAME: &str = "CustomerName";
pub const COL_LINE_DESCRIPTION: &str = "LineDescription";
pub const COL_CURRENT_PERIOD: &str = "CurrentPeriod";

// ===== S3 列位置（A = 0）=====
pub const S3_OWNER_COL: usize = 1; // B
pub const S3_CATEGORY_COL: usize = 2; // C
pub const S3_VOLUME_COL: usize = 4; // E
pub const S3_MIN_COLUMNS: usize = 5;

/// S3 只保留类别列包含该标记的行（大小写不敏感）
const S3_TENANT_MARKER: &str = "tenants";

/// 空标识视为缺失值（排除过滤对缺失值放行）
fn present(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// 按列名定位必需列，缺失时返回 SchemaError
fn require_columns<const N: usize>(
    table: &Table,
    source: UsageSource,
    columns: [&str; N],
) -> ImportResult<[usize; N]> {
    let mut indexes = [0usize; N];
    for (slot, column) in indexes.iter_mut().zip(columns) {
        *slot = table
            .column_index(column)
            .ok_or_else(|| ImportError::SchemaError {
                source_name: source.display_name().to_string(),
                column: column.to_string(),
            })?;
    }
    Ok(indexes)
}

// ==========================================
// HypervNormalizer
// ==========================================
pub struct HypervNormalizer<'a> {
    rules: &'a BillingRules,
    cleaner: DataCleaner,
}

impl<'a> HypervNormalizer<'a> {
    pub fn new(rules: &'a BillingRules) -> Self {
        Self {
            rules,
            cleaner: DataCleaner,
        }
    }
}

impl UsageNormalizer for HypervNormalizer<'_> {
    type Record = HypervUsage;

    fn header_mode(&self) -> HeaderMode {
        HeaderMode::FirstRow
    }

    fn normalize(&self, table: &Table) -> ImportResult<Vec<HypervUsage>> {
        let [owner_col, cpu_col, memory_col, iops_col, capacity_col] = require_columns(
            table,
            UsageSource::HyperV,
            [COL_VM_OWNER, COL_CPU_COUNT, COL_MEMORY_GB, COL_IOPS, COL_CAPACITY_GB],
        )?;

        let records = table
            .rows
            .iter()
            .filter_map(|row| {
                let account_owner = self.cleaner.normalize_text(table.cell(row, owner_col));
                if self.rules.vm_owner_filter.is_excluded(present(&account_owner)) {
                    return None;
                }
                Some(HypervUsage {
                    account_owner,
                    cpu_count: self.cleaner.coerce_whole(table.cell(row, cpu_col)),
                    memory_gb: self.cleaner.coerce_non_negative(table.cell(row, memory_col)),
                    iops: self.cleaner.coerce_whole(table.cell(row, iops_col)),
                    capacity_gb: self.cleaner.coerce_ceil(table.cell(row, capacity_col)),
                })
            })
            .collect();

        Ok(records)
    }
}

// ==========================================
// ExchangeNormalizer
// ==========================================
pub struct ExchangeNormalizer<'a> {
    rules: &'a BillingRules,
    cleaner: DataCleaner,
}

impl<'a> ExchangeNormalizer<'a> {
    pub fn new(rules: &'a BillingRules) -> Self {
        Self {
            rules,
            cleaner: DataCleaner,
        }
    }
}

impl UsageNormalizer for ExchangeNormalizer<'_> {
    type Record = ExchangeUsage;

    fn header_mode(&self) -> HeaderMode {
        HeaderMode::FirstRow
    }

    fn normalize(&self, table: &Table) -> ImportResult<Vec<ExchangeUsage>> {
        let [customer_col, description_col, period_col] = require_columns(
            table,
            UsageSource::Exchange,
            [COL_CUSTOMER_NAME, COL_LINE_DESCRIPTION, COL_CURRENT_PERIOD],
        )?;

        let records = table
            .rows
            .iter()
            .filter_map(|row| {
                let customer_name = self.cleaner.normalize_text(table.cell(row, customer_col));
                if self.rules.customer_filter.is_excluded(&customer_name) {
                    return None;
                }
                Some(ExchangeUsage {
                    customer_name,
                    tariff_description: self
                        .cleaner
                        .normalize_text(table.cell(row, description_col)),
                    period_quantity: self.cleaner.coerce_whole(table.cell(row, period_col)),
                })
            })
            .collect();

        Ok(records)
    }
}

// ==========================================
// S3Normalizer
// ==========================================
pub struct S3Normalizer<'a> {
    rules: &'a BillingRules,
    cleaner: DataCleaner,
}

impl<'a> S3Normalizer<'a> {
    pub fn new(rules: &'a BillingRules) -> Self {
        Self {
            rules,
            cleaner: DataCleaner,
        }
    }
}

impl UsageNormalizer for S3Normalizer<'_> {
    type Record = S3Usage;

    fn header_mode(&self) -> HeaderMode {
        HeaderMode::None
    }

    fn normalize(&self, table: &Table) -> ImportResult<Vec<S3Usage>> {
        if table.width < S3_MIN_COLUMNS {
            return Err(ImportError::ShapeError {
                source_name: UsageSource::S3.display_name().to_string(),
                expected: S3_MIN_COLUMNS,
                actual: table.width,
            });
        }

        let records = table
            .rows
            .iter()
            // 类别列预过滤：空单元格视为不含标记
            .filter(|row| {
                let category = table.cell(row, S3_CATEGORY_COL);
                !category.is_blank()
                    && category
                        .to_string()
                        .to_lowercase()
                        .contains(S3_TENANT_MARKER)
            })
            .filter_map(|row| {
                let owner = self.cleaner.normalize_text(table.cell(row, S3_OWNER_COL));
                if self.rules.s3_owner_filter.is_excluded(present(&owner)) {
                    return None;
                }
                Some(S3Usage {
                    owner,
                    volume_gb: self.cleaner.coerce_ceil(table.cell(row, S3_VOLUME_COL)),
                })
            })
            .collect();

        Ok(records)
    }
}
