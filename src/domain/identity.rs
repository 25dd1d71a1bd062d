// ==========================================
// 用量计费系统 - 客户身份映射
// ==========================================
// 职责: 原始账号标识 → {公司名称, БИН}
// 回退: 无映射时公司名称 = 原始标识, БИН = ""
// ==========================================

use crate::domain::usage::UsageSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 单条映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    pub company_name: String,
    pub bin: String,
}

/// 单个数据源的映射字典
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMapping {
    entries: HashMap<String, IdentityEntry>,
}

impl IdentityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: IdentityEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// 合并另一份映射，键冲突时以 other 为准
    pub fn merge(&mut self, other: IdentityMapping) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&IdentityEntry> {
        self.entries.get(key)
    }

    /// 解析公司名称与 БИН（带回退）
    pub fn resolve(&self, key: &str) -> (String, String) {
        match self.entries.get(key) {
            Some(entry) => (entry.company_name.clone(), entry.bin.clone()),
            None => (key.to_string(), String::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 一次映射上传的结果（按数据源分组）
///
/// 某数据源为空表示本次上传不涉及该数据源
#[derive(Debug, Clone, Default)]
pub struct MappingUpload {
    pub hyperv: IdentityMapping,
    pub exchange: IdentityMapping,
    pub s3: IdentityMapping,
}

impl MappingUpload {
    pub fn for_source(&self, source: UsageSource) -> &IdentityMapping {
        match source {
            UsageSource::HyperV => &self.hyperv,
            UsageSource::Exchange => &self.exchange,
            UsageSource::S3 => &self.s3,
        }
    }

    pub fn for_source_mut(&mut self, source: UsageSource) -> &mut IdentityMapping {
        match source {
            UsageSource::HyperV => &mut self.hyperv,
            UsageSource::Exchange => &mut self.exchange,
            UsageSource::S3 => &mut self.s3,
        }
    }

    /// 本次上传包含映射条目的数据源
    pub fn sources(&self) -> Vec<UsageSource> {
        UsageSource::ALL
            .into_iter()
            .filter(|source| !self.for_source(*source).is_empty())
            .collect()
    }
}
