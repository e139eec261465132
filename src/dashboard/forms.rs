//! The pickers and data entry forms on the dashboard.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::{ExpenseType, categories_for},
    chart::ChartKind,
    dashboard::view::DashboardView,
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, submit_button},
};

const FORM_STYLE: &str = "w-full space-y-4";
const FORM_HEADING_STYLE: &str = "text-lg font-semibold";

/// Hidden fields that carry the dashboard selections through a form post.
fn selection_inputs(view: DashboardView) -> Markup {
    html! {
        input type="hidden" name="expense_type" value=(view.expense_type.slug());
        input type="hidden" name="chart" value=(view.chart.slug());
    }
}

/// A dollar amount input. `id` must be unique on the page.
fn amount_input(id: &str) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id=(id)
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn date_input(id: &str, today: Date) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id=(id)
                type="date"
                required
                value=(today)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn category_select(id: &str, expense_type: ExpenseType) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id=(id) required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in categories_for(expense_type) {
                    option value=(category) { (category) }
                }
            }
        }
    }
}

/// Reloads the dashboard with the chosen expense type.
pub(super) fn expense_type_picker(view: DashboardView) -> Markup {
    html! {
        form method="get" action=(endpoints::DASHBOARD_VIEW) class=(FORM_STYLE)
        {
            label for="expense_type" class=(FORM_LABEL_STYLE) { "Expense Type" }

            select
                name="expense_type"
                id="expense_type"
                onchange="this.form.submit()"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for expense_type in ExpenseType::ALL {
                    option
                        value=(expense_type.slug())
                        selected[expense_type == view.expense_type]
                    {
                        (expense_type.name())
                    }
                }
            }

            input type="hidden" name="chart" value=(view.chart.slug());

            noscript
            {
                button type="submit" class="underline" { "Show categories" }
            }
        }
    }
}

/// Reloads the dashboard with the chosen chart.
pub(super) fn chart_picker(view: DashboardView) -> Markup {
    html! {
        form method="get" action=(endpoints::DASHBOARD_VIEW) class="flex items-center gap-4"
        {
            label for="chart" class="text-sm font-medium whitespace-nowrap" { "Choose Chart Type" }

            select
                name="chart"
                id="chart"
                onchange="this.form.submit()"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for kind in ChartKind::ALL {
                    option value=(kind.slug()) selected[kind == view.chart] { (kind.name()) }
                }
            }

            input type="hidden" name="expense_type" value=(view.expense_type.slug());

            noscript
            {
                button type="submit" class="underline" { "Show chart" }
            }
        }
    }
}

pub(super) fn expense_form(view: DashboardView, today: Date) -> Markup {
    html! {
        form
            id="expense-form"
            hx-post=(endpoints::EXPENSES_API)
            hx-target-error="#alert-container"
            class=(FORM_STYLE)
        {
            h3 class=(FORM_HEADING_STYLE) { "Add Expense" }

            (category_select("expense-category", view.expense_type))

            div
            {
                label for="expense-description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="expense-description"
                    type="text"
                    placeholder="Description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (amount_input("expense-amount"))
            (date_input("expense-date", today))
            (selection_inputs(view))
            (submit_button("Add Expense"))
        }
    }
}

pub(super) fn income_form(view: DashboardView, today: Date) -> Markup {
    html! {
        form
            id="income-form"
            hx-post=(endpoints::INCOME_API)
            hx-target-error="#alert-container"
            class=(FORM_STYLE)
        {
            h3 class=(FORM_HEADING_STYLE) { "Add Income" }

            div
            {
                label for="income-source" class=(FORM_LABEL_STYLE) { "Source" }

                input
                    name="source"
                    id="income-source"
                    type="text"
                    placeholder="Salary"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (amount_input("income-amount"))
            (date_input("income-date", today))
            (selection_inputs(view))
            (submit_button("Add Income"))
        }
    }
}

pub(super) fn budget_form(view: DashboardView) -> Markup {
    html! {
        form
            id="budget-form"
            hx-post=(endpoints::BUDGETS_API)
            hx-target-error="#alert-container"
            class=(FORM_STYLE)
        {
            h3 class=(FORM_HEADING_STYLE) { "Set Budget" }

            (category_select("budget-category", view.expense_type))
            (amount_input("budget-amount"))
            (selection_inputs(view))
            (submit_button("Set Budget"))
        }
    }
}

#[cfg(test)]
mod form_tests {
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        category::ExpenseType,
        chart::ChartKind,
        dashboard::view::DashboardView,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint,
        },
    };

    use super::{budget_form, chart_picker, expense_form, expense_type_picker, income_form};

    fn variable_bar() -> DashboardView {
        DashboardView {
            expense_type: ExpenseType::Variable,
            chart: ChartKind::Bar,
        }
    }

    fn options(form: &ElementRef<'_>, select_name: &str) -> Vec<String> {
        let selector = Selector::parse(&format!("select[name={select_name}] option")).unwrap();

        form.select(&selector)
            .map(|option| option.value().attr("value").unwrap().to_owned())
            .collect()
    }

    fn selected(form: &ElementRef<'_>, select_name: &str) -> String {
        let selector =
            Selector::parse(&format!("select[name={select_name}] option[selected]")).unwrap();

        form.select(&selector)
            .next()
            .expect("no option selected")
            .value()
            .attr("value")
            .unwrap()
            .to_owned()
    }

    fn hidden_value(form: &ElementRef<'_>, name: &str) -> String {
        let selector = Selector::parse(&format!("input[type=hidden][name={name}]")).unwrap();

        form.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no hidden input named {name}"))
            .value()
            .attr("value")
            .unwrap()
            .to_owned()
    }

    fn with_form(markup: maud::Markup, test: impl FnOnce(ElementRef<'_>)) {
        let html = Html::parse_fragment(&markup.into_string());
        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");

        test(form);
    }

    #[test]
    fn expense_form_offers_only_categories_of_selected_type() {
        with_form(expense_form(variable_bar(), date!(2025 - 06 - 15)), |form| {
            assert_hx_endpoint(&form, endpoints::EXPENSES_API, "hx-post");
            assert_eq!(
                options(&form, "category"),
                vec!["Groceries", "Transportation", "Entertainment"]
            );
            assert_form_input(&form, "amount", "number");
            assert_form_input_with_value(&form, "date", "date", "2025-06-15");
            assert_eq!(hidden_value(&form, "expense_type"), "variable");
            assert_eq!(hidden_value(&form, "chart"), "bar");
        });
    }

    #[test]
    fn amount_inputs_allow_cents_but_not_negatives() {
        with_form(budget_form(variable_bar()), |form| {
            let amount = form
                .select(&Selector::parse("input[name=amount]").unwrap())
                .next()
                .unwrap();

            assert_eq!(amount.value().attr("min"), Some("0"));
            assert_eq!(amount.value().attr("step"), Some("0.01"));
        });
    }

    #[test]
    fn income_form_posts_source_amount_and_date() {
        with_form(income_form(variable_bar(), date!(2025 - 06 - 15)), |form| {
            assert_hx_endpoint(&form, endpoints::INCOME_API, "hx-post");
            assert_form_input(&form, "source", "text");
            assert_form_input(&form, "amount", "number");
            assert_form_input(&form, "date", "date");
        });
    }

    #[test]
    fn budget_form_posts_to_budgets() {
        with_form(budget_form(variable_bar()), |form| {
            assert_hx_endpoint(&form, endpoints::BUDGETS_API, "hx-post");
            assert_eq!(options(&form, "category").len(), 3);
            assert_form_submit_button_with_text(&form, "Set Budget");
        });
    }

    #[test]
    fn pickers_select_current_view() {
        with_form(expense_type_picker(variable_bar()), |form| {
            assert_eq!(options(&form, "expense_type").len(), ExpenseType::ALL.len());
            assert_eq!(selected(&form, "expense_type"), "variable");
            assert_eq!(hidden_value(&form, "chart"), "bar");
        });

        with_form(chart_picker(variable_bar()), |form| {
            assert_eq!(options(&form, "chart").len(), ChartKind::ALL.len());
            assert_eq!(selected(&form, "chart"), "bar");
            assert_eq!(hidden_value(&form, "expense_type"), "variable");
        });
    }
}
