// ==========================================
// 用量计费系统 - 上传API
// ==========================================
// 职责: 文件 → 解析 → 标准化 → 写入仓储
// 约定: 解析在持锁之前完成，失败时仓储不发生任何变化
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::billing_rules::BillingRules;
use crate::domain::usage::UsageSource;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::UsageNormalizer;
use crate::importer::mapping_importer::{parse_mapping_files, UploadedFile};
use crate::importer::usage_normalizer::{ExchangeNormalizer, HypervNormalizer, S3Normalizer};
use crate::importer::ImportResult;
use crate::repository::BillingStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, Span};
use uuid::Uuid;

/// 用量上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub batch_id: String,
    /// 过滤后保留的记录数
    pub rows: usize,
}

/// 映射上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingUploadResponse {
    pub status: String,
    pub batch_id: String,
    /// 本次上传的文件名（按上传顺序）
    pub files: Vec<String>,
    /// 映射被替换的数据源
    pub updated_sources: Vec<UsageSource>,
}

/// 用解析器 + 标准化器处理一份上传
fn normalize_upload<N: UsageNormalizer>(
    normalizer: &N,
    bytes: &[u8],
    file_name: Option<&str>,
) -> ImportResult<Vec<N::Record>> {
    let table = UniversalFileParser.parse(bytes, file_name, normalizer.header_mode())?;
    normalizer.normalize(&table)
}

fn new_batch_id() -> String {
    let batch_id = Uuid::new_v4().to_string();
    Span::current().record("batch_id", batch_id.as_str());
    batch_id
}

/// 上传API
pub struct UploadApi {
    store: Arc<BillingStore>,
    rules: Arc<BillingRules>,
}

impl UploadApi {
    pub fn new(store: Arc<BillingStore>, rules: Arc<BillingRules>) -> Self {
        Self { store, rules }
    }

    /// 上传 Hyper-V 清单（整体替换）
    ///
    /// # 返回
    /// - Ok(UploadResponse)
    /// - Err(ApiError::Import): 文件无法解析或缺少必需列
    #[instrument(skip(self, bytes), fields(size = bytes.len(), batch_id = tracing::field::Empty))]
    pub fn upload_hyperv(&self, bytes: &[u8], file_name: Option<&str>) -> ApiResult<UploadResponse> {
        let batch_id = new_batch_id();
        let records = normalize_upload(&HypervNormalizer::new(&self.rules), bytes, file_name)?;
        let rows = records.len();

        self.store.replace_hyperv(records, &batch_id)?;
        info!(rows, "Hyper-V 用量已更新");
        Ok(UploadResponse::ok(batch_id, rows))
    }

    /// 上传 Exchange 用量（整体替换）
    #[instrument(skip(self, bytes), fields(size = bytes.len(), batch_id = tracing::field::Empty))]
    pub fn upload_exchange(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> ApiResult<UploadResponse> {
        let batch_id = new_batch_id();
        let records = normalize_upload(&ExchangeNormalizer::new(&self.rules), bytes, file_name)?;
        let rows = records.len();

        self.store.replace_exchange(records, &batch_id)?;
        info!(rows, "Exchange 用量已更新");
        Ok(UploadResponse::ok(batch_id, rows))
    }

    /// 上传 S3 存储报表（无表头，按列位置读取）
    #[instrument(skip(self, bytes), fields(size = bytes.len(), batch_id = tracing::field::Empty))]
    pub fn upload_s3(&self, bytes: &[u8], file_name: Option<&str>) -> ApiResult<UploadResponse> {
        let batch_id = new_batch_id();
        let records = normalize_upload(&S3Normalizer::new(&self.rules), bytes, file_name)?;
        let rows = records.len();

        self.store.replace_s3(records, &batch_id)?;
        info!(rows, "S3 用量已更新");
        Ok(UploadResponse::ok(batch_id, rows))
    }

    /// 按数据源分派上传
    pub fn upload_usage(
        &self,
        source: UsageSource,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> ApiResult<UploadResponse> {
        match source {
            UsageSource::HyperV => self.upload_hyperv(bytes, file_name),
            UsageSource::Exchange => self.upload_exchange(bytes, file_name),
            UsageSource::S3 => self.upload_s3(bytes, file_name),
        }
    }

    /// 上传 БИН 映射文件（可多个）
    ///
    /// 任一文件解析失败则整体失败；只替换本次有条目的数据源
    #[instrument(skip(self, files), fields(files = files.len(), batch_id = tracing::field::Empty))]
    pub fn upload_mappings(&self, files: Vec<UploadedFile>) -> ApiResult<MappingUploadResponse> {
        if files.is_empty() {
            return Err(ApiError::InvalidInput("не передано ни одного файла".to_string()));
        }

        let batch_id = new_batch_id();
        let upload = parse_mapping_files(&files)?;
        let updated_sources = self.store.apply_mappings(upload)?;
        info!(?updated_sources, "БИН 映射已更新");

        Ok(MappingUploadResponse {
            status: "ok".to_string(),
            batch_id,
            files: files.into_iter().map(|f| f.file_name).collect(),
            updated_sources,
        })
    }
}

impl UploadResponse {
    fn ok(batch_id: String, rows: usize) -> Self {
        Self {
            status: "ok".to_string(),
            batch_id,
            rows,
        }
    }
}
