// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成手工联调用的上传样例文件
// 输出: tests/fixtures/datasets/*.xlsx / *.csv
// ==========================================

use chrono::Local;
use csv::Writer;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 样例客户（含应被排除的测试账号）
const VM_OWNERS: &[&str] = &[
    "buh@alma-trade.kz",
    "it@steppe-logistic.kz",
    "admin@qazaq-soft.kz",
    "ops@id.kz",
    "test-stand@corp.kz",
];

const MAIL_CUSTOMERS: &[&str] = &[
    "Alma Trade",
    "Steppe Logistic",
    "Qazaq Soft",
    "FTP TEST",
];

const TARIFFS: &[&str] = &[
    "Exchange 2016, Standard-50GB",
    "Exchange 2016, Standard-100GB",
    "Exchange 2016, Maximum",
    "Exchange 2016, Express",
    "Exchange 2016, Startup",
    "Exchange 2016, Basic-2GB",
];

const S3_OWNERS: &[&str] = &[
    "alma-backup",
    "nextcloud.steppe",
    "qazaq-media",
    "s-veeam@id.kz",
];

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. Hyper-V 清单 (xlsx + csv)
    generate_hyperv()?;

    // 2. Exchange 用量
    generate_exchange()?;

    // 3. S3 报表（无表头）
    generate_s3()?;

    // 4. БИН 映射
    generate_mappings()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_hyperv() -> Result<(), Box<dyn Error>> {
    let header = ["VMName", "VMOwner", "CPUCount", "MemoryGB", "IOPS", "CapacityGB"];

    let mut rows = Vec::new();
    for i in 0..60 {
        let owner = VM_OWNERS[i % VM_OWNERS.len()];
        let iops = if i % 3 == 0 { 5000.0 } else { 500.0 };
        rows.push((
            format!("vm-{:03}", i),
            owner,
            (1 + i % 8) as f64,
            2.0 * (1 + i % 4) as f64 + 0.5 * (i % 2) as f64,
            iops,
            40.0 + (i * 7 % 100) as f64 + 0.25,
        ));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (idx, (name, owner, cpu, memory, iops, capacity)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, name.as_str())?;
        sheet.write_string(row, 1, *owner)?;
        sheet.write_number(row, 2, *cpu)?;
        sheet.write_number(row, 3, *memory)?;
        sheet.write_number(row, 4, *iops)?;
        sheet.write_number(row, 5, *capacity)?;
    }
    workbook.save(format!("{}/hyperv.xlsx", OUTPUT_DIR))?;

    let mut wtr = Writer::from_writer(File::create(format!("{}/hyperv.csv", OUTPUT_DIR))?);
    wtr.write_record(header)?;
    for (name, owner, cpu, memory, iops, capacity) in &rows {
        wtr.write_record([
            name.clone(),
            owner.to_string(),
            cpu.to_string(),
            memory.to_string(),
            iops.to_string(),
            capacity.to_string(),
        ])?;
    }
    wtr.flush()?;

    println!("✓ 生成 hyperv.xlsx / hyperv.csv ({}条)", rows.len());
    Ok(())
}

fn generate_exchange() -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in ["CustomerName", "LineDescription", "CurrentPeriod", "PreviousPeriod"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *title)?;
    }

    let mut row = 1u32;
    for (c, customer) in MAIL_CUSTOMERS.iter().enumerate() {
        for (t, tariff) in TARIFFS.iter().enumerate() {
            if (c + t) % 2 == 1 {
                continue;
            }
            sheet.write_string(row, 0, *customer)?;
            sheet.write_string(row, 1, *tariff)?;
            sheet.write_number(row, 2, (5 + c * 3 + t) as f64)?;
            sheet.write_number(row, 3, (4 + c * 3 + t) as f64)?;
            row += 1;
        }
    }
    workbook.save(format!("{}/exchange.xlsx", OUTPUT_DIR))?;

    println!("✓ 生成 exchange.xlsx ({}条)", row - 1);
    Ok(())
}

fn generate_s3() -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // 标题行（S3 报表无表头，第一行只有标题）
    let title = format!("Отчет по объектному хранилищу на {}", Local::now().format("%d.%m.%Y"));
    sheet.write_string(0, 1, title)?;

    let mut row = 1u32;
    for (i, owner) in S3_OWNERS.iter().enumerate() {
        for (j, category) in ["/Root/Tenants/prod", "/Root/System", "tenants"].iter().enumerate() {
            sheet.write_string(row, 1, *owner)?;
            sheet.write_string(row, 2, *category)?;
            sheet.write_string(row, 3, format!("bucket-{}-{}", i, j))?;
            sheet.write_number(row, 4, 10.0 * (i + 1) as f64 + 0.01 * (j + 1) as f64)?;
            row += 1;
        }
    }
    workbook.save(format!("{}/s3.xlsx", OUTPUT_DIR))?;

    println!("✓ 生成 s3.xlsx ({}条)", row - 1);
    Ok(())
}

fn generate_mappings() -> Result<(), Box<dyn Error>> {
    let files: [(&str, &[&str]); 3] = [
        ("bin_hyperv.xlsx", VM_OWNERS),
        ("bin_exchange.xlsx", MAIL_CUSTOMERS),
        ("bin_s3.xlsx", S3_OWNERS),
    ];

    for (file_name, keys) in files {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Ключ")?;
        sheet.write_string(0, 1, "Наименование компании")?;
        sheet.write_string(0, 2, "БИН")?;

        for (idx, key) in keys.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, *key)?;
            sheet.write_string(row, 1, format!("ТОО «{}»", key))?;
            // БИН 以数字写入，与 Excel 手工录入一致
            sheet.write_number(row, 2, 990_140_000_000.0 + idx as f64)?;
        }
        workbook.save(format!("{}/{}", OUTPUT_DIR, file_name))?;
        println!("✓ 生成 {} ({}条)", file_name, keys.len());
    }

    // CSV 版映射（分号分隔）
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(File::create(format!("{}/bin_mail.csv", OUTPUT_DIR))?);
    wtr.write_record(["Ключ", "Наименование", "БИН"])?;
    for (idx, key) in MAIL_CUSTOMERS.iter().enumerate() {
        wtr.write_record([key.to_string(), format!("АО «{}»", key), format!("0901400000{:02}", idx)])?;
    }
    wtr.flush()?;
    println!("✓ 生成 bin_mail.csv ({}条)", MAIL_CUSTOMERS.len());

    Ok(())
}
