//! The budget report: budgets reconciled against spending, as a table and as downloads.

mod core;
mod download_endpoint;
mod export;
mod view;

pub use core::{BudgetReport, ReportRow, build_budget_report};
pub use download_endpoint::{get_report_csv, get_report_xlsx};
pub use export::{report_to_csv, report_to_xlsx};
pub use view::report_table;
