//! Which expense type and chart the dashboard is showing.

use serde::Deserialize;

use crate::{category::ExpenseType, chart::ChartKind, endpoints};

/// The query string of the dashboard page.
///
/// Both fields are kept as raw strings so that unknown values fall back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub expense_type: Option<String>,
    pub chart: Option<String>,
}

/// The selections that shape the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardView {
    /// Limits the categories offered by the expense and budget forms.
    pub expense_type: ExpenseType,
    pub chart: ChartKind,
}

impl DashboardView {
    /// Parse the selections, falling back to the default for missing or unknown values.
    pub fn from_slugs(expense_type: Option<&str>, chart: Option<&str>) -> Self {
        Self {
            expense_type: expense_type
                .and_then(ExpenseType::from_slug)
                .unwrap_or_default(),
            chart: chart.and_then(ChartKind::from_slug).unwrap_or_default(),
        }
    }

    pub fn from_query(query: &DashboardQuery) -> Self {
        Self::from_slugs(query.expense_type.as_deref(), query.chart.as_deref())
    }

    /// The dashboard URL that shows these selections.
    pub fn url(&self) -> String {
        format!(
            "{}?expense_type={}&chart={}",
            endpoints::DASHBOARD_VIEW,
            self.expense_type.slug(),
            self.chart.slug()
        )
    }
}
