//! The budget report table shown on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    report::BudgetReport,
};

const AMOUNT_CELL_STYLE: &str = "text-right whitespace-nowrap";
const OVER_BUDGET_STYLE: &str = "text-red-600 dark:text-red-400";
const UNDER_BUDGET_STYLE: &str = "text-green-600 dark:text-green-400";

fn remaining_style(remaining_budget: f64) -> &'static str {
    if remaining_budget < 0.0 {
        OVER_BUDGET_STYLE
    } else {
        UNDER_BUDGET_STYLE
    }
}

/// The report as a table, with links to download it.
pub fn report_table(report: &BudgetReport) -> Markup {
    html! {
        section id="budget-report" class="w-full space-y-4"
        {
            div class="flex items-center justify-between"
            {
                h2 class="text-xl font-semibold" { "Budget Report" }

                div class="flex gap-4 text-sm"
                {
                    a href=(endpoints::REPORT_CSV) download class=(LINK_STYLE) { "Download CSV" }
                    a href=(endpoints::REPORT_XLSX) download class=(LINK_STYLE) { "Download Excel" }
                }
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for column in BudgetReport::COLUMNS {
                                th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in &report.rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (row.category)
                                }
                                td class={(TABLE_CELL_STYLE) " " (AMOUNT_CELL_STYLE)}
                                {
                                    (format_currency(row.budgeted_amount))
                                }
                                td class={(TABLE_CELL_STYLE) " " (AMOUNT_CELL_STYLE)}
                                {
                                    (format_currency(row.total_expenses))
                                }
                                td class={(TABLE_CELL_STYLE) " " (AMOUNT_CELL_STYLE) " " (remaining_style(row.remaining_budget))}
                                {
                                    (format_currency(row.remaining_budget))
                                }
                            }
                        }

                        @if report.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="4" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No budgets yet. Set a budget for a category to see it here."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
