// ==========================================
// 用量计费系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值转换
// 零值策略: 缺失、无法解析、非有限值 → 0；负数 → 0
// ==========================================

use crate::domain::table::Cell;

pub struct DataCleaner;

impl DataCleaner {
    /// 标识字段标准化（TRIM，空 / NaN → ""）
    pub fn normalize_text(&self, cell: &Cell) -> String {
        if cell.is_blank() {
            return String::new();
        }
        cell.to_string().trim().to_string()
    }

    /// 数值转换（不会失败）
    ///
    /// - Int / Float: 原值（NaN、inf → 0）
    /// - Text: 去空白后按浮点数解析，失败 → 0
    /// - Bool: true → 1, false → 0
    /// - Empty: 0
    pub fn coerce_number(&self, cell: &Cell) -> f64 {
        let value = match cell {
            Cell::Empty => 0.0,
            Cell::Int(v) => *v as f64,
            Cell::Float(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// 非负数值（负数截为 0）
    pub fn coerce_non_negative(&self, cell: &Cell) -> f64 {
        self.coerce_number(cell).max(0.0)
    }

    /// 非负整数（向零截断）
    ///
    /// 超出 u64 范围的值封顶于 u64::MAX（`as` 转换饱和）
    pub fn coerce_whole(&self, cell: &Cell) -> u64 {
        self.coerce_non_negative(cell).trunc() as u64
    }

    /// 非负整数（向上取整，用于容量 / 存储量）
    pub fn coerce_ceil(&self, cell: &Cell) -> u64 {
        self.coerce_non_negative(cell).ceil() as u64
    }
}
