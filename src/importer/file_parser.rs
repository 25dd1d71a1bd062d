// ==========================================
// 用量计费系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV (.csv)
// ==========================================

use crate::domain::table::{Cell, HeaderMode, Table};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8], header: HeaderMode) -> ImportResult<Table> {
        let delimiter = sniff_delimiter(bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut records = reader.records();

        // 读取表头
        let headers: Vec<String> = match header {
            HeaderMode::FirstRow => match records.next() {
                Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
                None => Vec::new(),
            },
            HeaderMode::None => Vec::new(),
        };

        // 读取所有行
        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            let row: Vec<Cell> = record.iter().map(infer_cell).collect();

            // 跳过完全空白的行
            if row.iter().all(Cell::is_blank) {
                continue;
            }
            rows.push(row);
        }

        Ok(Table::new(headers, rows))
    }
}

/// 分隔符探测：首行中分号多于逗号时按分号处理
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// CSV 文本 → 单元格类型推断
///
/// 以 0 开头的多位数字串保留为文本（БИН 等编码不能丢失前导零）
fn infer_cell(raw: &str) -> Cell {
    let value = raw.trim();
    if value.is_empty() {
        return Cell::Empty;
    }
    let leading_zero_code =
        value.len() > 1 && value.starts_with('0') && value.chars().all(|c| c.is_ascii_digit());
    if leading_zero_code {
        return Cell::Text(value.to_string());
    }
    if let Ok(v) = value.parse::<i64>() {
        return Cell::Int(v);
    }
    if let Ok(v) = value.parse::<f64>() {
        return Cell::Float(v);
    }
    Cell::Text(value.to_string())
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8], header: HeaderMode) -> ImportResult<Table> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::FormatError("файл не содержит листов".to_string()))??;

        // calamine 的 range 从第一个非空单元格开始；补齐左侧空列，保证 A 列 = 位置 0
        let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let mut sheet_rows = range.rows().map(|data_row| {
            let mut row = vec![Cell::Empty; col_offset];
            row.extend(data_row.iter().map(to_cell));
            row
        });

        // 提取表头（第一行）
        let headers: Vec<String> = match header {
            HeaderMode::FirstRow => sheet_rows
                .next()
                .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
                .unwrap_or_default(),
            HeaderMode::None => Vec::new(),
        };

        // 读取数据行，跳过完全空白的行
        let rows: Vec<Vec<Cell>> = sheet_rows
            .filter(|row| !row.iter().all(Cell::is_blank))
            .collect();

        Ok(Table::new(headers, rows))
    }
}

/// calamine 单元格 → Cell（日期、错误值按显示文本保留）
fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

// ==========================================
// 通用文件解析器（根据文件名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解析上传文件
    ///
    /// 文件名以 .csv 结尾时按 CSV 解析，其余一律交给 calamine 自动识别容器格式
    pub fn parse(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
        header: HeaderMode,
    ) -> ImportResult<Table> {
        let is_csv = file_name
            .map(|name| name.trim().to_lowercase().ends_with(".csv"))
            .unwrap_or(false);

        if is_csv {
            CsvParser.parse_bytes(bytes, header)
        } else {
            ExcelParser.parse_bytes(bytes, header)
        }
    }
}
