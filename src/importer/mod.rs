// ==========================================
// 用量计费系统 - 导入层
// ==========================================
// 职责: 上传文件 → 表格 → 标准化用量记录 / 身份映射
// 支持: Excel (xlsx/xlsm/xlsb/xls/ods), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod exclusion_filter;
pub mod file_parser;
pub mod importer_trait;
pub mod mapping_importer;
pub mod usage_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use exclusion_filter::{ExactSetFilter, PatternFilter};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use mapping_importer::{parse_mapping_files, read_mapping, UploadedFile};
pub use usage_normalizer::{ExchangeNormalizer, HypervNormalizer, S3Normalizer};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, UsageNormalizer};
