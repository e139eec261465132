//! The dashboard: data entry forms, the budget report and the expenses chart on one page.

mod forms;
mod page;
mod view;

pub use page::get_dashboard_page;
pub use view::DashboardView;
