// ==========================================
// 用量计费系统 - 报表生成引擎
// ==========================================
// 职责: 标准化用量 → 按（账号, 次级键）聚合 → 计费行
// 排序: (公司名称, 服务名称) 升序，稳定排序
// 红线: 纯计算，不读写状态（缓存由 BillingStore 负责）
// ==========================================

use crate::domain::identity::IdentityMapping;
use crate::domain::report::LineItem;
use crate::domain::table::Cell;
use crate::domain::usage::{ExchangeUsage, HypervUsage, S3Usage};
use crate::engine::service_naming::{exchange_service_name, hyperv_service_name, s3_service_name};
use std::collections::BTreeMap;

pub struct ReportBuilder;

/// Hyper-V 分组累计值
#[derive(Debug, Default)]
struct HypervTotals {
    cpu_count: u64,
    memory_gb: f64,
    capacity_gb: u64,
}

impl ReportBuilder {
    /// Hyper-V 报表
    ///
    /// 按 (VMOwner, IOPS) 分组，每组最多产出 disk / cpu / memory 三行，数量为 0 的不产出
    /// 累加一律饱和（超大数值封顶于 u64::MAX）
    pub fn build_hyperv(records: &[HypervUsage], mapping: &IdentityMapping) -> Vec<LineItem> {
        let mut groups: BTreeMap<(&str, u64), HypervTotals> = BTreeMap::new();
        for record in records {
            let totals = groups
                .entry((record.account_owner.as_str(), record.iops))
                .or_default();
            totals.cpu_count = totals.cpu_count.saturating_add(record.cpu_count);
            totals.memory_gb += record.memory_gb;
            totals.capacity_gb = totals.capacity_gb.saturating_add(record.capacity_gb);
        }

        let mut items = Vec::new();
        for ((owner, iops), totals) in groups {
            let iops_cell = Cell::Int(iops as i64);
            let services = [
                ("disk", totals.capacity_gb > 0, totals.capacity_gb),
                ("cpu", totals.cpu_count > 0, totals.cpu_count),
                ("memory", totals.memory_gb > 0.0, totals.memory_gb.trunc() as u64),
            ];
            for (metric, billable, quantity) in services {
                if billable {
                    items.push(Self::line_item(
                        mapping,
                        owner,
                        hyperv_service_name(metric, &iops_cell),
                        quantity,
                    ));
                }
            }
        }

        Self::sort(&mut items);
        items
    }

    /// Exchange 报表：按 (CustomerName, 服务名称) 分组汇总数量
    pub fn build_exchange(records: &[ExchangeUsage], mapping: &IdentityMapping) -> Vec<LineItem> {
        let mut groups: BTreeMap<(&str, &'static str), u64> = BTreeMap::new();
        for record in records {
            let service = exchange_service_name(&record.tariff_description);
            let total = groups
                .entry((record.customer_name.as_str(), service))
                .or_default();
            *total = total.saturating_add(record.period_quantity);
        }

        let mut items: Vec<LineItem> = groups
            .into_iter()
            .map(|((customer, service), quantity)| {
                Self::line_item(mapping, customer, service.to_string(), quantity)
            })
            .collect();

        Self::sort(&mut items);
        items
    }

    /// S3 报表：按 (所有者, 服务名称) 分组汇总存储量
    pub fn build_s3(records: &[S3Usage], mapping: &IdentityMapping) -> Vec<LineItem> {
        let mut groups: BTreeMap<(&str, &'static str), u64> = BTreeMap::new();
        for record in records {
            let service = s3_service_name(&record.owner);
            let total = groups.entry((record.owner.as_str(), service)).or_default();
            *total = total.saturating_add(record.volume_gb);
        }

        let mut items: Vec<LineItem> = groups
            .into_iter()
            .map(|((owner, service), quantity)| {
                Self::line_item(mapping, owner, service.to_string(), quantity)
            })
            .collect();

        Self::sort(&mut items);
        items
    }

    /// 汇总报表：各数据源报表依次拼接后重新排序
    pub fn build_summary(parts: &[&[LineItem]]) -> Vec<LineItem> {
        let mut items: Vec<LineItem> = parts.iter().flat_map(|p| p.iter().cloned()).collect();
        Self::sort(&mut items);
        items
    }

    fn line_item(
        mapping: &IdentityMapping,
        key: &str,
        service_name: String,
        quantity: u64,
    ) -> LineItem {
        let (company_name, bin) = mapping.resolve(key);
        LineItem {
            company_name,
            bin,
            service_name,
            quantity,
        }
    }

    fn sort(items: &mut [LineItem]) {
        items.sort_by(|a, b| {
            a.company_name
                .cmp(&b.company_name)
                .then_with(|| a.service_name.cmp(&b.service_name))
        });
    }
}
