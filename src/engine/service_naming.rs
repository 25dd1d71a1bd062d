// ==========================================
// 用量计费系统 - 服务名称判定
// ==========================================
// 职责: 原始计量类型 / 资费描述 → 计费服务名称
// 红线: 纯函数，无 I/O
// ==========================================

use crate::config::billing_rules::{BASIC_TARIFFS, STANDARD_TARIFFS};
use crate::domain::table::Cell;
use crate::importer::data_cleaner::DataCleaner;

// ===== Hyper-V =====
pub const SERVICE_DISK_SSD: &str = "Аренда Дискового пространства SSD, 1Гб (5000 IOPS)";
pub const SERVICE_DISK_SAS: &str = "Аренда Дискового пространства SAS, 1Гб (500 IOPS)";
pub const SERVICE_CPU: &str = "Аренда виртуального CPU";
pub const SERVICE_MEMORY: &str = "Аренда Оперативной памяти, 1Гб";

// ===== Exchange =====
pub const SERVICE_EXCHANGE_STANDARD: &str = "Аренда Microsoft Exchange Standard (50ГБ почтовый ящик)";
pub const SERVICE_EXCHANGE_BASIC: &str = "Аренда Microsoft Exchange Basic (2ГБ почтовый ящик)";

// ===== S3 =====
pub const SERVICE_NEXTCLOUD: &str = "Облачное хранилище Nextcloud, 1 Гб";
pub const SERVICE_S3: &str = "Объектное хранилище S3";

/// SSD 档位对应的 IOPS
const SSD_IOPS: i64 = 5000;

/// Hyper-V 资源服务名称
///
/// # 参数
/// - metric: 计量类型（disk / cpu / memory，大小写不敏感）
/// - iops: IOPS 原始值（仅 disk 使用）
///
/// # 规则
/// - disk: IOPS 按浮点解析并向零截断后恰为 5000 → SSD，其余（含缺失/非法）→ SAS
/// - cpu / memory: 固定名称
/// - 其他类型: 原样返回
pub fn hyperv_service_name(metric: &str, iops: &Cell) -> String {
    match metric.to_lowercase().as_str() {
        "disk" => {
            // 无法解析按 0 处理，落入 SAS
            let iops_value = DataCleaner.coerce_number(iops).trunc() as i64;
            if iops_value == SSD_IOPS {
                SERVICE_DISK_SSD.to_string()
            } else {
                SERVICE_DISK_SAS.to_string()
            }
        }
        "cpu" => SERVICE_CPU.to_string(),
        "memory" => SERVICE_MEMORY.to_string(),
        _ => metric.to_string(),
    }
}

/// Exchange 资费服务名称
///
/// 先查固定资费分组，未命中时按关键字判断（standard / maximum / express → Standard）
pub fn exchange_service_name(line_description: &str) -> &'static str {
    if STANDARD_TARIFFS.contains(&line_description) {
        return SERVICE_EXCHANGE_STANDARD;
    }
    if BASIC_TARIFFS.contains(&line_description) {
        return SERVICE_EXCHANGE_BASIC;
    }

    let description = line_description.to_lowercase();
    if ["standard", "maximum", "express"]
        .iter()
        .any(|kw| description.contains(kw))
    {
        SERVICE_EXCHANGE_STANDARD
    } else {
        SERVICE_EXCHANGE_BASIC
    }
}

/// S3 存储服务名称
pub fn s3_service_name(owner: &str) -> &'static str {
    if owner.to_lowercase().contains("nextcloud") {
        SERVICE_NEXTCLOUD
    } else {
        SERVICE_S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_disk_invalid_iops_defaults_to_sas() {
        assert_eq!(hyperv_service_name("disk", &Cell::Empty), SERVICE_DISK_SAS);
        assert_eq!(hyperv_service_name("disk", &text("unknown")), SERVICE_DISK_SAS);
        assert_eq!(hyperv_service_name("disk", &Cell::Int(500)), SERVICE_DISK_SAS);
        assert_eq!(hyperv_service_name("disk", &Cell::Int(-5000)), SERVICE_DISK_SAS);
        assert_eq!(hyperv_service_name("disk", &Cell::Float(4999.9)), SERVICE_DISK_SAS);
        assert_eq!(hyperv_service_name("disk", &Cell::Int(50000)), SERVICE_DISK_SAS);
    }

    #[test]
    fn test_disk_5000_is_ssd() {
        assert_eq!(hyperv_service_name("disk", &Cell::Int(5000)), SERVICE_DISK_SSD);
        assert_eq!(hyperv_service_name("disk", &Cell::Float(5000.0)), SERVICE_DISK_SSD);
        assert_eq!(hyperv_service_name("disk", &text(" 5000 ")), SERVICE_DISK_SSD);
        assert_eq!(hyperv_service_name("DISK", &text("5000.0")), SERVICE_DISK_SSD);
    }

    #[test]
    fn test_cpu_memory_and_passthrough() {
        assert_eq!(hyperv_service_name("cpu", &Cell::Int(5000)), SERVICE_CPU);
        assert_eq!(hyperv_service_name("Memory", &Cell::Empty), SERVICE_MEMORY);
        assert_eq!(hyperv_service_name("gpu", &Cell::Empty), "gpu");
    }

    #[test]
    fn test_exchange_fixed_sets() {
        for tariff in STANDARD_TARIFFS {
            assert_eq!(exchange_service_name(tariff), SERVICE_EXCHANGE_STANDARD);
        }
        for tariff in BASIC_TARIFFS {
            assert_eq!(exchange_service_name(tariff), SERVICE_EXCHANGE_BASIC);
        }
    }

    #[test]
    fn test_exchange_keyword_fallback() {
        assert_eq!(
            exchange_service_name("Exchange 2019, MAXIMUM plus"),
            SERVICE_EXCHANGE_STANDARD
        );
        assert_eq!(exchange_service_name("express mailbox"), SERVICE_EXCHANGE_STANDARD);
        assert_eq!(exchange_service_name("Exchange 2019, Lite"), SERVICE_EXCHANGE_BASIC);
        assert_eq!(exchange_service_name(""), SERVICE_EXCHANGE_BASIC);
    }

    #[test]
    fn test_exchange_naming_is_stable_on_reclassification() {
        // 服务名称本身再次判定，结果不变
        assert_eq!(
            exchange_service_name(exchange_service_name("Exchange 2016, Maximum")),
            SERVICE_EXCHANGE_STANDARD
        );
    }

    #[test]
    fn test_s3_service_name() {
        assert_eq!(s3_service_name("NextCloud.client01"), SERVICE_NEXTCLOUD);
        assert_eq!(s3_service_name("bucket-owner@corp.kz"), SERVICE_S3);
        assert_eq!(s3_service_name(""), SERVICE_S3);
    }
}
