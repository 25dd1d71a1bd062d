// ==========================================
// 用量计费系统 - 表格数据模型
// ==========================================
// 职责: 上传文件解析后的中间结构（单元格 + 行）
// 生命周期: 仅存在于标准化过程中，不入库
// ==========================================

use std::fmt;

/// 单元格类型
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// 空单元格（含 NaN 与纯空白文本）
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(v) => v.is_nan(),
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Int(_) | Cell::Bool(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// 表头模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// 第一行为表头
    FirstRow,
    /// 无表头，全部为数据行（按列位置访问）
    None,
}

/// 解析后的表格
///
/// - headers: 表头（HeaderMode::None 时为空）
/// - rows: 数据行（已跳过全空行）
/// - width: 列数（表头与所有行中的最大列数）
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub width: usize,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        Self {
            headers,
            rows,
            width,
        }
    }

    /// 按表头名查找列位置（首个匹配）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 取单元格，越界视为空
    pub fn cell<'a>(&self, row: &'a [Cell], col: usize) -> &'a Cell {
        row.get(col).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
