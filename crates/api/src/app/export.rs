//! Spreadsheet rendering of the inventory report.
//!
//! Layout: title band (rows 1-3), KPIs (rows 5-6), product table from row 9,
//! grand total two rows below the last product.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Formula, Workbook, XlsxError};

use nexus_products::InventoryReport;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const INVENTORY_FILENAME: &str = "relatorio_estoque.xlsx";

const SHEET_NAME: &str = "Relatório Executivo";
const HEADERS: [&str; 6] = ["SKU", "Produto", "Categoria", "Preço Unitário", "Estoque", "Total"];
const COLUMN_WIDTHS: [f64; 6] = [18.0, 40.0, 20.0, 18.0, 12.0, 18.0];
const MONEY: &str = "R$ #,##0.00";

/// Zero-based row of the table header.
const TABLE_HEADER_ROW: u32 = 8;
const TOTAL_COL: u16 = 5;

struct Formats {
    title: Format,
    subtitle: Format,
    header: Format,
    money: Format,
    centered: Format,
    text: Format,
    kpi_label: Format,
    kpi_value: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(22)
                .set_font_name("Segoe UI")
                .set_font_color("#FFFFFF")
                .set_background_color("#0B1F3A")
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
            subtitle: Format::new()
                .set_font_size(10)
                .set_font_color("#CBD5E1")
                .set_background_color("#0B1F3A"),
            header: Format::new()
                .set_bold()
                .set_font_color("#FFFFFF")
                .set_background_color("#1F4E79")
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            money: Format::new()
                .set_num_format(MONEY)
                .set_align(FormatAlign::Right)
                .set_border(FormatBorder::Thin),
            centered: Format::new()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            text: Format::new()
                .set_align(FormatAlign::Left)
                .set_border(FormatBorder::Thin),
            kpi_label: Format::new().set_font_size(9).set_font_color("#64748B"),
            kpi_value: Format::new().set_bold().set_font_size(14),
        }
    }
}

/// Render `report` as an `.xlsx` workbook.
pub fn inventory_workbook(
    report: &InventoryReport,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, XlsxError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.set_screen_gridlines(false);

    sheet.merge_range(0, 0, 1, TOTAL_COL, "RELATÓRIO EXECUTIVO DE INVENTÁRIO", &formats.title)?;
    sheet.merge_range(
        2,
        0,
        2,
        TOTAL_COL,
        &format!("Gerado em {}", generated_at.format("%d/%m/%Y às %H:%M")),
        &formats.subtitle,
    )?;
    sheet.set_row_height(0, 35)?;
    sheet.set_row_height(1, 10)?;
    sheet.set_row_height(2, 18)?;

    sheet.write_string_with_format(4, 2, "TOTAL DE ITENS", &formats.kpi_label)?;
    sheet.write_number_with_format(5, 2, report.total_units as f64, &formats.kpi_value)?;
    sheet.write_string_with_format(4, 4, "SKUs ATIVOS", &formats.kpi_label)?;
    sheet.write_number_with_format(5, 4, report.sku_count as f64, &formats.kpi_value)?;

    for (col, header) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(TABLE_HEADER_ROW, col, header, &formats.header)?;
    }

    let mut row = TABLE_HEADER_ROW;
    for line in &report.rows {
        row += 1;
        sheet.write_string_with_format(row, 0, line.sku.as_str(), &formats.text)?;
        sheet.write_string_with_format(row, 1, line.name.as_str(), &formats.text)?;
        sheet.write_string_with_format(row, 2, line.category.as_str(), &formats.text)?;
        sheet.write_number_with_format(row, 3, line.unit_price, &formats.money)?;
        sheet.write_number_with_format(row, 4, line.stock, &formats.centered)?;
        sheet.write_number_with_format(row, TOTAL_COL, line.total, &formats.money)?;
    }

    let total_row = row + 2;
    sheet.write_string_with_format(total_row, 4, "TOTAL GERAL:", &formats.header)?;
    if report.is_empty() {
        sheet.write_number_with_format(total_row, TOTAL_COL, 0.0, &formats.money)?;
    } else {
        // Spreadsheet rows are 1-based.
        let first = TABLE_HEADER_ROW + 2;
        let last = row + 1;
        let formula = Formula::new(format!("=SUM(F{first}:F{last})"))
            .set_result(report.grand_total.to_string());
        sheet.write_formula_with_format(total_row, TOTAL_COL, formula, &formats.money)?;
    }

    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nexus_products::InventoryReportRow;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn renders_zip_container() {
        let report = InventoryReport {
            rows: vec![InventoryReportRow {
                sku: "NB-DELL-G15".to_string(),
                name: "Notebook Dell G15".to_string(),
                category: "Eletrônicos".to_string(),
                unit_price: 5200.0,
                stock: 3,
                total: 15600.0,
            }],
            total_units: 3,
            sku_count: 1,
            grand_total: 15600.0,
        };

        let bytes = inventory_workbook(&report, generated_at()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn renders_empty_catalog() {
        let bytes = inventory_workbook(&InventoryReport::default(), generated_at()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
