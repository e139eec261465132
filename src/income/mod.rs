//! Income: the model, its queries and the endpoint for logging it.

mod core;
mod create_endpoint;

pub use core::{Income, NewIncome, create_income_table, get_income, log_income};
pub use create_endpoint::create_income_endpoint;
