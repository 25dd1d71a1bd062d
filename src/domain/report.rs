// ==========================================
// 用量计费系统 - 报表行
// ==========================================
// 用途: 报表引擎产出，JSON 与 Excel 导出共用
// 字段名: 与前端约定的俄文列名
// ==========================================

use serde::{Deserialize, Serialize};

/// 报表列名（JSON 键 / Excel 表头）
pub const COLUMN_COMPANY: &str = "Наименование компании";
pub const COLUMN_BIN: &str = "БИН";
pub const COLUMN_SERVICE: &str = "Наименование услуги";
pub const COLUMN_QUANTITY: &str = "Количество";

pub const REPORT_COLUMNS: [&str; 4] = [COLUMN_COMPANY, COLUMN_BIN, COLUMN_SERVICE, COLUMN_QUANTITY];

/// 计费行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "Наименование компании")]
    pub company_name: String,
    #[serde(rename = "БИН")]
    pub bin: String,
    #[serde(rename = "Наименование услуги")]
    pub service_name: String,
    #[serde(rename = "Количество")]
    pub quantity: u64,
}
