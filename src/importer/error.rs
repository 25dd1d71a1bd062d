// ==========================================
// 用量计费系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 数值转换失败不报错（按 0 处理），不在此定义
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 错误信息直接返回给上传方（HTTP 400），使用俄语描述。
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    /// 无法识别的表格容器（非 xlsx/xls/ods/csv 或文件损坏）
    #[error("Не удалось прочитать файл: {0}")]
    FormatError(String),

    // ===== 结构校验错误 =====
    /// 缺少必需列
    #[error("{source_name}: отсутствует столбец '{column}'")]
    SchemaError { source_name: String, column: String },

    /// 列数不足（按位置读取的数据源）
    #[error("{source_name}: слишком мало столбцов, ожидается минимум {expected}, получено {actual}")]
    ShapeError {
        source_name: String,
        expected: usize,
        actual: usize,
    },
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::FormatError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::FormatError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
