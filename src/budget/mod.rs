//! Per-category budgets: the model, its queries and the endpoint for setting one.

mod core;
mod set_endpoint;

pub use core::{Budget, create_budget_table, get_budgets, set_budget};
pub use set_endpoint::set_budget_endpoint;
