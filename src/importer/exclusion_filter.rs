// ==========================================
// 用量计费系统 - 账号排除过滤器
// ==========================================
// 职责: 判定内部 / 测试账号是否排除在计费之外
// 模式: 正则模式（Hyper-V、S3 所有者） / 精确集合（Exchange 客户）
// ==========================================

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

// ==========================================
// PatternFilter - 正则模式过滤（大小写不敏感）
// ==========================================
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// 编译模式列表
    pub fn new(patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// 任一模式在值中任意位置命中即排除；缺失值不排除
    pub fn is_excluded(&self, value: Option<&str>) -> bool {
        match value {
            Some(v) => self.patterns.iter().any(|p| p.is_match(v)),
            None => false,
        }
    }
}

// ==========================================
// ExactSetFilter - 精确集合过滤（大小写敏感）
// ==========================================
#[derive(Debug, Clone)]
pub struct ExactSetFilter {
    names: HashSet<String>,
}

impl ExactSetFilter {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn is_excluded(&self, value: &str) -> bool {
        self.names.contains(value)
    }
}
