// ==========================================
// 用量计费系统 - 进程内状态仓储
// ==========================================
// 职责: 保存各数据源最新用量与映射，缓存报表
// 并发: 单把 std::sync::Mutex，写入/失效/报表计算均在锁内完成
// 失效: 任一用量或映射上传清空全部四份报表缓存
// ==========================================

use crate::domain::identity::{IdentityMapping, MappingUpload};
use crate::domain::report::LineItem;
use crate::domain::usage::{ExchangeUsage, HypervUsage, ReportKind, S3Usage, UsageSource};
use crate::engine::report_builder::ReportBuilder;
use crate::repository::error::RepositoryResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 共享报表（缓存命中时返回同一个 Arc）
pub type SharedReport = Arc<Vec<LineItem>>;

/// 最近一次上传的元数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMeta {
    pub batch_id: String,
    pub rows: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// 单个数据源的状态快照
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source: UsageSource,
    pub rows: usize,
    pub mapping_entries: usize,
    pub last_upload: Option<UploadMeta>,
}

/// 仓储状态快照（/api/status）
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub sources: Vec<SourceStatus>,
    pub cached_reports: Vec<String>,
    pub last_mapping_upload: Option<DateTime<Utc>>,
}

// ==========================================
// ReportCache - 报表缓存
// ==========================================
#[derive(Debug, Default)]
struct ReportCache {
    hyperv: Option<SharedReport>,
    exchange: Option<SharedReport>,
    s3: Option<SharedReport>,
    summary: Option<SharedReport>,
}

impl ReportCache {
    fn slot(&mut self, kind: ReportKind) -> &mut Option<SharedReport> {
        match kind {
            ReportKind::Source(UsageSource::HyperV) => &mut self.hyperv,
            ReportKind::Source(UsageSource::Exchange) => &mut self.exchange,
            ReportKind::Source(UsageSource::S3) => &mut self.s3,
            ReportKind::Summary => &mut self.summary,
        }
    }

    fn clear(&mut self) {
        *self = ReportCache::default();
    }

    fn cached_kinds(&self) -> Vec<String> {
        [
            (ReportKind::Source(UsageSource::HyperV), &self.hyperv),
            (ReportKind::Source(UsageSource::Exchange), &self.exchange),
            (ReportKind::Source(UsageSource::S3), &self.s3),
            (ReportKind::Summary, &self.summary),
        ]
        .into_iter()
        .filter(|(_, slot)| slot.is_some())
        .map(|(kind, _)| kind.as_str().to_string())
        .collect()
    }
}

// ==========================================
// BillingData - 锁内数据
// ==========================================
#[derive(Debug, Default)]
struct BillingData {
    hyperv: Vec<HypervUsage>,
    exchange: Vec<ExchangeUsage>,
    s3: Vec<S3Usage>,
    mappings: MappingUpload,
    uploads: [Option<UploadMeta>; 3],
    last_mapping_upload: Option<DateTime<Utc>>,
    reports: ReportCache,
}

impl BillingData {
    fn rows(&self, source: UsageSource) -> usize {
        match source {
            UsageSource::HyperV => self.hyperv.len(),
            UsageSource::Exchange => self.exchange.len(),
            UsageSource::S3 => self.s3.len(),
        }
    }

    fn record_upload(&mut self, source: UsageSource, batch_id: &str) {
        let meta = UploadMeta {
            batch_id: batch_id.to_string(),
            rows: self.rows(source),
            uploaded_at: Utc::now(),
        };
        self.uploads[source_index(source)] = Some(meta);
        self.reports.clear();
    }

    /// 取缓存或重新计算（调用方已持锁）
    fn report(&mut self, kind: ReportKind) -> SharedReport {
        if let Some(cached) = self.reports.slot(kind) {
            debug!(report = %kind, "报表缓存命中");
            return Arc::clone(cached);
        }

        let items = match kind {
            ReportKind::Source(UsageSource::HyperV) => {
                ReportBuilder::build_hyperv(&self.hyperv, &self.mappings.hyperv)
            }
            ReportKind::Source(UsageSource::Exchange) => {
                ReportBuilder::build_exchange(&self.exchange, &self.mappings.exchange)
            }
            ReportKind::Source(UsageSource::S3) => {
                ReportBuilder::build_s3(&self.s3, &self.mappings.s3)
            }
            ReportKind::Summary => {
                let hyperv = self.report(ReportKind::Source(UsageSource::HyperV));
                let exchange = self.report(ReportKind::Source(UsageSource::Exchange));
                let s3 = self.report(ReportKind::Source(UsageSource::S3));
                ReportBuilder::build_summary(&[
                    hyperv.as_slice(),
                    exchange.as_slice(),
                    s3.as_slice(),
                ])
            }
        };

        debug!(report = %kind, items = items.len(), "报表已重新计算");
        let report = Arc::new(items);
        *self.reports.slot(kind) = Some(Arc::clone(&report));
        report
    }
}

fn source_index(source: UsageSource) -> usize {
    match source {
        UsageSource::HyperV => 0,
        UsageSource::Exchange => 1,
        UsageSource::S3 => 2,
    }
}

// ==========================================
// BillingStore - 状态仓储
// ==========================================

/// 进程内计费状态
///
/// 每个进程一个实例，通过 `Arc<BillingStore>` 注入
#[derive(Debug, Default)]
pub struct BillingStore {
    inner: Mutex<BillingData>,
}

impl BillingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, BillingData>> {
        Ok(self.inner.lock()?)
    }

    /// 整体替换 Hyper-V 用量
    pub fn replace_hyperv(&self, records: Vec<HypervUsage>, batch_id: &str) -> RepositoryResult<()> {
        let mut data = self.lock()?;
        data.hyperv = records;
        data.record_upload(UsageSource::HyperV, batch_id);
        Ok(())
    }

    /// 整体替换 Exchange 用量
    pub fn replace_exchange(
        &self,
        records: Vec<ExchangeUsage>,
        batch_id: &str,
    ) -> RepositoryResult<()> {
        let mut data = self.lock()?;
        data.exchange = records;
        data.record_upload(UsageSource::Exchange, batch_id);
        Ok(())
    }

    /// 整体替换 S3 用量
    pub fn replace_s3(&self, records: Vec<S3Usage>, batch_id: &str) -> RepositoryResult<()> {
        let mut data = self.lock()?;
        data.s3 = records;
        data.record_upload(UsageSource::S3, batch_id);
        Ok(())
    }

    /// 应用一次映射上传
    ///
    /// 仅替换本次有条目的数据源；无论是否替换都清空报表缓存
    ///
    /// # 返回
    /// - 被替换映射的数据源
    pub fn apply_mappings(&self, upload: MappingUpload) -> RepositoryResult<Vec<UsageSource>> {
        let updated = upload.sources();
        let MappingUpload { hyperv, exchange, s3 } = upload;

        let mut guard = self.lock()?;
        let data = &mut *guard;
        for (target, mapping) in [
            (&mut data.mappings.hyperv, hyperv),
            (&mut data.mappings.exchange, exchange),
            (&mut data.mappings.s3, s3),
        ] {
            if !mapping.is_empty() {
                *target = mapping;
            }
        }
        data.last_mapping_upload = Some(Utc::now());
        data.reports.clear();
        Ok(updated)
    }

    /// 获取报表（惰性计算并缓存）
    pub fn report(&self, kind: ReportKind) -> RepositoryResult<SharedReport> {
        let mut data = self.lock()?;
        Ok(data.report(kind))
    }

    /// 当前某数据源的映射副本
    pub fn mapping(&self, source: UsageSource) -> RepositoryResult<IdentityMapping> {
        let data = self.lock()?;
        Ok(data.mappings.for_source(source).clone())
    }

    /// 状态快照
    pub fn status(&self) -> RepositoryResult<StoreStatus> {
        let data = self.lock()?;
        let sources = UsageSource::ALL
            .into_iter()
            .map(|source| SourceStatus {
                source,
                rows: data.rows(source),
                mapping_entries: data.mappings.for_source(source).len(),
                last_upload: data.uploads[source_index(source)].clone(),
            })
            .collect();

        Ok(StoreStatus {
            sources,
            cached_reports: data.reports.cached_kinds(),
            last_mapping_upload: data.last_mapping_upload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::IdentityEntry;
    use crate::repository::error::RepositoryError;

    fn s3(owner: &str, volume_gb: u64) -> S3Usage {
        S3Usage {
            owner: owner.to_string(),
            volume_gb,
        }
    }

    fn mapping(key: &str, name: &str, bin: &str) -> IdentityMapping {
        let mut mapping = IdentityMapping::new();
        mapping.insert(
            key,
            IdentityEntry {
                company_name: name.to_string(),
                bin: bin.to_string(),
            },
        );
        mapping
    }

    #[test]
    fn test_empty_store_reports_are_empty() {
        let store = BillingStore::new();
        for kind in [
            ReportKind::Source(UsageSource::HyperV),
            ReportKind::Source(UsageSource::Exchange),
            ReportKind::Source(UsageSource::S3),
            ReportKind::Summary,
        ] {
            assert!(store.report(kind).unwrap().is_empty());
        }
    }

    #[test]
    fn test_cache_hit_returns_same_arc() {
        let store = BillingStore::new();
        store.replace_s3(vec![s3("owner", 1)], "batch-1").unwrap();

        let first = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        let second = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // 空报表同样被缓存
        let empty_a = store.report(ReportKind::Source(UsageSource::HyperV)).unwrap();
        let empty_b = store.report(ReportKind::Source(UsageSource::HyperV)).unwrap();
        assert!(Arc::ptr_eq(&empty_a, &empty_b));
    }

    #[test]
    fn test_upload_invalidates_all_reports() {
        let store = BillingStore::new();
        store.replace_s3(vec![s3("owner", 1)], "batch-1").unwrap();
        let summary_before = store.report(ReportKind::Summary).unwrap();
        let hyperv_before = store.report(ReportKind::Source(UsageSource::HyperV)).unwrap();

        store.replace_exchange(vec![], "batch-2").unwrap();

        let summary_after = store.report(ReportKind::Summary).unwrap();
        let hyperv_after = store.report(ReportKind::Source(UsageSource::HyperV)).unwrap();
        assert!(!Arc::ptr_eq(&summary_before, &summary_after));
        assert!(!Arc::ptr_eq(&hyperv_before, &hyperv_after));
        assert_eq!(*summary_before, *summary_after);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = BillingStore::new();
        store
            .replace_s3(vec![s3("a", 1), s3("b", 2)], "batch-1")
            .unwrap();
        store.replace_s3(vec![s3("c", 3)], "batch-2").unwrap();

        let report = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].company_name, "c");
    }

    #[test]
    fn test_mapping_only_overwrites_non_empty_sources() {
        let store = BillingStore::new();
        store
            .apply_mappings(MappingUpload {
                s3: mapping("owner", "ТОО Owner", "111"),
                ..Default::default()
            })
            .unwrap();
        store
            .apply_mappings(MappingUpload {
                hyperv: mapping("vm", "ТОО VM", "222"),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.mapping(UsageSource::S3).unwrap().len(), 1);
        assert_eq!(store.mapping(UsageSource::HyperV).unwrap().len(), 1);

        // 新映射整体替换，不与旧映射合并
        store
            .apply_mappings(MappingUpload {
                s3: mapping("other", "ТОО Other", "333"),
                ..Default::default()
            })
            .unwrap();
        let s3_mapping = store.mapping(UsageSource::S3).unwrap();
        assert!(s3_mapping.get("owner").is_none());
        assert!(s3_mapping.get("other").is_some());
    }

    #[test]
    fn test_mapping_upload_invalidates_cache() {
        let store = BillingStore::new();
        store.replace_s3(vec![s3("owner", 5)], "batch-1").unwrap();
        let before = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        assert_eq!(before[0].company_name, "owner");

        let updated = store
            .apply_mappings(MappingUpload {
                s3: mapping("owner", "ТОО Owner", "111"),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated, vec![UsageSource::S3]);

        let after = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        assert_eq!(after[0].company_name, "ТОО Owner");
        assert_eq!(after[0].bin, "111");

        // 空映射上传也会清空缓存
        store.apply_mappings(MappingUpload::default()).unwrap();
        let again = store.report(ReportKind::Source(UsageSource::S3)).unwrap();
        assert!(!Arc::ptr_eq(&after, &again));
        assert_eq!(again[0].company_name, "ТОО Owner");
    }

    #[test]
    fn test_status_snapshot() {
        let store = BillingStore::new();
        store
            .replace_s3(vec![s3("a", 1), s3("b", 2)], "batch-s3")
            .unwrap();
        store.report(ReportKind::Summary).unwrap();

        let status = store.status().unwrap();
        let s3_status = status
            .sources
            .iter()
            .find(|s| s.source == UsageSource::S3)
            .unwrap();
        assert_eq!(s3_status.rows, 2);
        let meta = s3_status.last_upload.as_ref().unwrap();
        assert_eq!(meta.batch_id, "batch-s3");
        assert_eq!(meta.rows, 2);
        assert_eq!(status.cached_reports, vec!["hyperv", "exchange", "s3", "summary"]);
        assert!(status.last_mapping_upload.is_none());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = Arc::new(BillingStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert!(matches!(
            store.report(ReportKind::Summary),
            Err(RepositoryError::LockError(_))
        ));
    }
}
