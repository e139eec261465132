//! Expenses: the model, its queries and the endpoint for logging one.

mod core;
mod create_endpoint;

pub use core::{Expense, NewExpense, create_expense_table, get_expenses, log_expense};
pub use create_endpoint::create_expense_endpoint;
