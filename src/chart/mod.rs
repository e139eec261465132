//! The expenses chart on the dashboard, drawn with ECharts.

mod aggregation;
mod kind;
mod render;

pub use kind::ChartKind;
pub use render::{DashboardChart, chart_script, chart_view};
