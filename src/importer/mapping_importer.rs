// ==========================================
// 用量计费系统 - БИН 映射导入
// ==========================================
// 职责: 解析映射文件 → IdentityMapping，并按文件名分派到数据源
// 列识别: 表头关键字规则（按列顺序扫描，后出现的匹配列覆盖先前的）
// 回退: 未识别到名称或 БИН 列时，使用第 1、2 列；未识别到键列时使用第 1 列
// ==========================================

use crate::domain::identity::{IdentityEntry, IdentityMapping, MappingUpload};
use crate::domain::table::{Cell, HeaderMode, Table};
use crate::domain::usage::UsageSource;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use tracing::{debug, info};

/// 映射字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingField {
    CompanyName,
    Bin,
    Key,
}

/// 表头关键字规则（小写子串匹配）
pub const MAPPING_COLUMN_RULES: &[(MappingField, &[&str])] = &[
    (MappingField::CompanyName, &["наименование", "company", "организац"]),
    (MappingField::Bin, &["бин", "bin"]),
    (MappingField::Key, &["ключ", "key"]),
];

/// 识别出的列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingColumns {
    pub key: usize,
    pub company_name: usize,
    pub bin: usize,
}

/// 按表头识别映射列
///
/// # 返回
/// - Ok(MappingColumns)
/// - Err(ShapeError): 文件没有任何列
pub fn detect_mapping_columns(headers: &[String], width: usize) -> ImportResult<MappingColumns> {
    if width == 0 {
        return Err(ImportError::ShapeError {
            source_name: "БИН".to_string(),
            expected: 1,
            actual: 0,
        });
    }

    let mut company_name = None;
    let mut bin = None;
    let mut key = None;

    for (idx, header) in headers.iter().enumerate() {
        let lower = header.to_lowercase();
        for (field, synonyms) in MAPPING_COLUMN_RULES {
            if synonyms.iter().any(|s| lower.contains(s)) {
                match field {
                    MappingField::CompanyName => company_name = Some(idx),
                    MappingField::Bin => bin = Some(idx),
                    MappingField::Key => key = Some(idx),
                }
            }
        }
    }

    let (company_name, bin) = match (company_name, bin) {
        (Some(name), Some(bin)) => (name, bin),
        _ => (0, if width > 1 { 1 } else { 0 }),
    };

    Ok(MappingColumns {
        key: key.unwrap_or(0),
        company_name,
        bin,
    })
}

/// 映射值文本化：整数值的浮点单元格不带小数部分（БИН 常被 Excel 存为数字）
fn mapping_text(cell: &Cell) -> String {
    match cell {
        Cell::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
            format!("{}", *v as i64)
        }
        other => DataCleaner.normalize_text(other),
    }
}

/// 表格 → 映射字典（键为空的行跳过；名称为空时使用键）
pub fn read_mapping(table: &Table) -> ImportResult<IdentityMapping> {
    let columns = detect_mapping_columns(&table.headers, table.width)?;
    debug!(?columns, "映射列识别完成");

    let mut mapping = IdentityMapping::new();
    for row in &table.rows {
        let key = mapping_text(table.cell(row, columns.key));
        if key.is_empty() {
            continue;
        }
        let company_name = mapping_text(table.cell(row, columns.company_name));
        let bin = mapping_text(table.cell(row, columns.bin));

        let company_name = if company_name.is_empty() {
            key.clone()
        } else {
            company_name
        };
        mapping.insert(key, IdentityEntry { company_name, bin });
    }
    Ok(mapping)
}

/// 上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 解析一批映射文件
///
/// - 每个文件都必须能解析，任一失败则整体失败
/// - 同一数据源的多个文件按上传顺序合并，后者覆盖前者
/// - 文件名无法归属的文件被忽略
pub fn parse_mapping_files(files: &[UploadedFile]) -> ImportResult<MappingUpload> {
    let parser = UniversalFileParser;
    let mut upload = MappingUpload::default();

    for file in files {
        let table = parser.parse(&file.bytes, Some(&file.file_name), HeaderMode::FirstRow)?;
        let mapping = read_mapping(&table)?;

        match UsageSource::from_mapping_filename(&file.file_name) {
            Some(source) => {
                info!(
                    file_name = %file.file_name,
                    source = %source,
                    entries = mapping.len(),
                    "映射文件解析完成"
                );
                upload.for_source_mut(source).merge(mapping);
            }
            None => {
                info!(file_name = %file.file_name, "映射文件名无法归属数据源，已忽略");
            }
        }
    }

    Ok(upload)
}
