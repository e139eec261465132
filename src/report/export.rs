//! Writes a [BudgetReport] out as CSV or as an Excel workbook.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{Error, report::BudgetReport};

/// The name of the only worksheet in the Excel export.
pub const WORKSHEET_NAME: &str = "Budget Report";

/// Write `report` as CSV with a header row of the column names.
///
/// # Errors
/// Returns [Error::ExportError] if a record could not be written.
pub fn report_to_csv(report: &BudgetReport) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(BudgetReport::COLUMNS).map_err(csv_error)?;

    for row in &report.rows {
        writer.serialize(row).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::ExportError(error.to_string()))
}

fn csv_error(error: csv::Error) -> Error {
    Error::ExportError(error.to_string())
}

/// Write `report` as an Excel workbook with a single "Budget Report" sheet.
///
/// # Errors
/// Returns [Error::ExportError] if the workbook could not be built.
pub fn report_to_xlsx(report: &BudgetReport) -> Result<Vec<u8>, Error> {
    build_workbook(report).map_err(|error| Error::ExportError(error.to_string()))
}

fn build_workbook(report: &BudgetReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let currency_format = Format::new().set_num_format("$#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, heading) in (0u16..).zip(BudgetReport::COLUMNS) {
        worksheet.write_string_with_format(0, col, heading, &header_format)?;
        worksheet.set_column_width(col, 18)?;
    }

    for (row_index, row) in (1u32..).zip(&report.rows) {
        worksheet.write_string(row_index, 0, &row.category)?;
        worksheet.write_number_with_format(row_index, 1, row.budgeted_amount, &currency_format)?;
        worksheet.write_number_with_format(row_index, 2, row.total_expenses, &currency_format)?;
        worksheet.write_number_with_format(
            row_index,
            3,
            row.remaining_budget,
            &currency_format,
        )?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod export_tests {
    use crate::report::{BudgetReport, ReportRow};

    use super::{report_to_csv, report_to_xlsx};

    fn report() -> BudgetReport {
        BudgetReport {
            rows: vec![
                ReportRow {
                    category: "Dining Out".to_owned(),
                    budgeted_amount: 50.0,
                    total_expenses: 80.0,
                    remaining_budget: -30.0,
                },
                ReportRow {
                    category: "Rent".to_owned(),
                    budgeted_amount: 1000.0,
                    total_expenses: 0.0,
                    remaining_budget: 1000.0,
                },
            ],
        }
    }

    #[test]
    fn csv_starts_with_column_names() {
        let csv = report_to_csv(&BudgetReport::default()).unwrap();

        assert_eq!(
            csv,
            "Category,Budgeted Amount,Total Expenses,Remaining Budget\n"
        );
    }

    #[test]
    fn csv_has_one_record_per_row() {
        let csv = report_to_csv(&report()).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records = reader
            .records()
            .map(|record| record.unwrap())
            .collect::<Vec<_>>();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "Dining Out");
        assert_eq!(records[0][3].parse::<f64>().unwrap(), -30.0);
        assert_eq!(&records[1][0], "Rent");
        assert_eq!(records[1][1].parse::<f64>().unwrap(), 1000.0);
    }

    #[test]
    fn xlsx_is_a_zip_archive() {
        let bytes = report_to_xlsx(&report()).unwrap();

        assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
    }

    #[test]
    fn empty_report_still_exports_to_xlsx() {
        assert!(report_to_xlsx(&BudgetReport::default()).is_ok());
    }
}
