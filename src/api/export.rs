// ==========================================
// 用量计费系统 - 报表导出（xlsx）
// ==========================================
// 工具: rust_xlsxwriter（内存中生成，不落盘）
// 格式: 单工作表 "Отчет"，首行为四个列标题
// ==========================================

use crate::domain::report::{LineItem, REPORT_COLUMNS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// 导出工作表名称
pub const SHEET_NAME: &str = "Отчет";

/// xlsx 的 MIME 类型
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 列宽（与 REPORT_COLUMNS 顺序一致）
const COLUMN_WIDTHS: [f64; 4] = [40.0, 16.0, 60.0, 12.0];

/// 导出文件
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 计费行 → xlsx 字节流
pub fn write_report_xlsx(items: &[LineItem]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in REPORT_COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (idx, item) in items.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, item.company_name.as_str())?;
        worksheet.write_string(row, 1, item.bin.as_str())?;
        worksheet.write_string(row, 2, item.service_name.as_str())?;
        worksheet.write_number(row, 3, item.quantity as f64)?;
    }

    workbook.save_to_buffer()
}
