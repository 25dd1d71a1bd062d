// ==========================================
// 用量计费系统 - 导入 Trait
// ==========================================
// 职责: 定义导入管道接口（不包含实现）
// 管道: 文件解析 → 标准化（校验/清洗/过滤/转换）
// ==========================================

use crate::domain::table::{HeaderMode, Table};
use crate::importer::error::ImportResult;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 将上传文件内容解析为表格
    ///
    /// # 参数
    /// - bytes: 文件原始字节
    /// - header: 表头模式
    ///
    /// # 返回
    /// - Ok(Table): 解析后的表格（已跳过全空行）
    /// - Err(ImportError::FormatError): 无法识别的文件格式
    fn parse_bytes(&self, bytes: &[u8], header: HeaderMode) -> ImportResult<Table>;
}

// ==========================================
// UsageNormalizer Trait
// ==========================================
// 用途: 单个数据源的标准化接口（阶段 1-4）
// 实现者: HypervNormalizer, ExchangeNormalizer, S3Normalizer
pub trait UsageNormalizer: Send + Sync {
    /// 标准化后的记录类型
    type Record;

    /// 该数据源要求的表头模式
    fn header_mode(&self) -> HeaderMode;

    /// 将表格转换为标准化记录
    ///
    /// # 流程
    /// 1. 结构校验（必需列 / 最少列数）
    /// 2. 标识字段清洗（TRIM / NULL → ""）
    /// 3. 排除内部与测试账号
    /// 4. 数值转换（无法解析 → 0），容量向上取整
    ///
    /// # 返回
    /// - Ok(Vec<Record>): 标准化记录
    /// - Err: SchemaError / ShapeError
    fn normalize(&self, table: &Table) -> ImportResult<Vec<Self::Record>>;
}
