//! The dashboard route handler and page layout.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::Session,
    chart::{DashboardChart, chart_script, chart_view},
    dashboard::{
        forms::{budget_form, chart_picker, expense_form, expense_type_picker, income_form},
        view::{DashboardQuery, DashboardView},
    },
    db::with_connection,
    endpoints,
    expense::{Expense, get_expenses},
    html::{
        CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, dollar_input_styles,
        format_currency,
    },
    income::{Income, get_income},
    navigation::NavBar,
    report::{BudgetReport, build_budget_report, report_table},
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything the dashboard shows for one user.
struct DashboardData {
    expenses: Vec<Expense>,
    income: Vec<Income>,
    report: BudgetReport,
}

/// Display the user's forms, budget report and expenses chart.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let view = DashboardView::from_query(&query);

    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let data = with_connection(&state.db_connection, |connection| {
        Ok(DashboardData {
            expenses: get_expenses(&session, connection)?,
            income: get_income(&session, connection)?,
            report: build_budget_report(&session, connection)?,
        })
    })
    .inspect_err(|error| tracing::error!("could not load the dashboard: {error}"))?;

    Ok(dashboard_view(view, today, &data).into_response())
}

fn summary_view(expenses: &[Expense], income: &[Income]) -> Markup {
    let total_income: f64 = income.iter().map(|income| income.amount).sum();
    let total_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let net = total_income - total_expenses;
    let net_style = if net < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        section id="summary" class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full"
        {
            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Total Income" }
                p class="text-2xl font-semibold" { (format_currency(total_income)) }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Total Expenses" }
                p class="text-2xl font-semibold" { (format_currency(total_expenses)) }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Net" }
                p class={"text-2xl font-semibold " (net_style)} { (format_currency(net)) }
            }
        }
    }
}

fn dashboard_view(view: DashboardView, today: Date, data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = DashboardChart::expenses(view.chart, &data.expenses);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-6"
            {
                (summary_view(&data.expenses, &data.income))

                div class="grid grid-cols-1 lg:grid-cols-3 gap-4"
                {
                    div class=(CARD_STYLE)
                    {
                        (expense_type_picker(view))
                        (expense_form(view, today))
                    }

                    div class=(CARD_STYLE) { (income_form(view, today)) }

                    div class=(CARD_STYLE) { (budget_form(view)) }
                }

                div class=(CARD_STYLE) { (report_table(&data.report)) }

                section id="charts" class=(CARD_STYLE)
                {
                    (chart_picker(view))

                    @if data.expenses.is_empty() {
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "The chart will show up here once you add some expenses."
                        }
                    } @else {
                        (chart_view(&chart))
                    }
                }
            }
        }
    );

    let mut head_elements = vec![dollar_input_styles()];

    if !data.expenses.is_empty() {
        head_elements.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        head_elements.push(chart_script(&chart));
    }

    base("Dashboard", &head_elements, &content)
}
