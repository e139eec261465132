//! Reconciles each budget against what was actually spent in its category.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, auth::Session, budget::get_budgets};

/// One budgeted category in a [BudgetReport].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// The budgeted category.
    pub category: String,
    /// The amount set with [set_budget](crate::set_budget).
    pub budgeted_amount: f64,
    /// The sum of the category's expenses, zero if there are none.
    pub total_expenses: f64,
    /// `budgeted_amount - total_expenses`, negative when over budget.
    pub remaining_budget: f64,
}

/// Budgets side by side with spending, one row per budgeted category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetReport {
    /// One row per budget, sorted by category.
    pub rows: Vec<ReportRow>,
}

impl BudgetReport {
    /// The column headings, in the order the row fields are written out.
    pub const COLUMNS: [&'static str; 4] = [
        "Category",
        "Budgeted Amount",
        "Total Expenses",
        "Remaining Budget",
    ];

    /// Whether the user has not set any budgets.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the budget report for the session's user.
///
/// Every budget appears exactly once, in category order. Expenses in
/// categories without a budget are left out.
///
/// # Errors
/// This function will return a [Error::SqlError] if either query failed.
pub fn build_budget_report(
    session: &Session,
    connection: &Connection,
) -> Result<BudgetReport, Error> {
    let budgets = get_budgets(session, connection)?;
    let totals = get_expense_totals_by_category(session, connection)?;

    let rows = budgets
        .into_iter()
        .map(|budget| {
            let total_expenses = totals.get(&budget.category).copied().unwrap_or(0.0);

            ReportRow {
                remaining_budget: budget.amount - total_expenses,
                budgeted_amount: budget.amount,
                total_expenses,
                category: budget.category,
            }
        })
        .collect();

    Ok(BudgetReport { rows })
}

fn get_expense_totals_by_category(
    session: &Session,
    connection: &Connection,
) -> Result<HashMap<String, f64>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount)
             FROM expenses
             WHERE user_id = ?1
             GROUP BY category",
        )?
        .query_map([session.user_id().as_i64()], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}
