//! Builds the ECharts options for each [ChartKind] and the markup that shows them.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus,
        ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, Scatter, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    chart::{
        ChartKind,
        aggregation::{
            HISTOGRAM_BUCKETS, Histogram, categories, daily_amounts_by_category,
            format_date_labels, histogram, sorted_dates, total_by_category,
        },
    },
    expense::Expense,
    html::HeadElement,
};

/// Colours for the bubble chart, one per category in turn.
const PALETTE: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

const MIN_BUBBLE_SIZE: f64 = 8.0;
const MAX_BUBBLE_SIZE: f64 = 60.0;

/// A chart with its HTML container ID and ECharts configuration.
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    /// The expenses chart drawn as `kind`.
    pub fn expenses(kind: ChartKind, expenses: &[Expense]) -> Self {
        Self {
            id: "expenses-chart",
            options: expenses_chart(kind, expenses).to_string(),
        }
    }
}

/// The container the chart is drawn into.
pub fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="w-full min-h-[380px] rounded dark:bg-gray-100"
        {}
    )
}

/// Generates the JavaScript that initializes the chart once the page has loaded.
///
/// The chart follows the browser's dark mode setting and resizes with the window.
pub fn chart_script(chart: &DashboardChart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

/// Plot `expenses` as `kind`.
pub fn expenses_chart(kind: ChartKind, expenses: &[Expense]) -> Chart {
    match kind {
        ChartKind::Pie => pie_chart(expenses, false),
        ChartKind::Donut => pie_chart(expenses, true),
        ChartKind::Bar => bar_chart(expenses, false),
        ChartKind::StackedBar => bar_chart(expenses, true),
        ChartKind::Line => line_chart(expenses, false),
        ChartKind::Area => line_chart(expenses, true),
        ChartKind::Histogram => histogram_chart(expenses),
        ChartKind::Bubble => bubble_chart(expenses),
    }
}

fn pie_chart(expenses: &[Expense], is_donut: bool) -> Chart {
    let data = total_by_category(expenses)
        .into_iter()
        .map(|(category, total)| (total, category))
        .collect::<Vec<_>>();

    let radius = if is_donut {
        vec!["30%", "70%"]
    } else {
        vec!["0%", "70%"]
    };

    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("right").top("1%"))
        .series(Pie::new().name("Spending").radius(radius).data(data))
}

fn bar_chart(expenses: &[Expense], is_stacked: bool) -> Chart {
    let dates = sorted_dates(expenses);
    let labels = format_date_labels(&dates);

    let mut chart = axis_chart("Spending Over Time", labels);

    for (category, amounts) in daily_amounts_by_category(expenses, &dates) {
        let mut series = bar::Bar::new()
            .name(category)
            .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
            .data(amounts);

        if is_stacked {
            series = series.stack("Expenses");
        }

        chart = chart.series(series);
    }

    chart
}

fn line_chart(expenses: &[Expense], is_area: bool) -> Chart {
    let dates = sorted_dates(expenses);
    let labels = format_date_labels(&dates);
    let title = if is_area {
        "Spending Area Chart"
    } else {
        "Spending Trends"
    };

    let mut chart = axis_chart(title, labels);

    for (category, amounts) in daily_amounts_by_category(expenses, &dates) {
        let series = Line::new()
            .name(category)
            .emphasis(Emphasis::new().focus(EmphasisFocus::Series));

        chart = chart.series(if is_area {
            // Stacked areas need a value for every date.
            let amounts = amounts
                .into_iter()
                .map(|amount| amount.unwrap_or(0.0))
                .collect::<Vec<_>>();

            series
                .stack("Expenses")
                .area_style(AreaStyle::new())
                .data(amounts)
        } else {
            series.data(amounts)
        });
    }

    chart
}

fn histogram_chart(expenses: &[Expense]) -> Chart {
    let Histogram { labels, counts } = histogram(expenses, HISTOGRAM_BUCKETS);

    let mut chart = Chart::new()
        .title(Title::new().text("Expense Distribution").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().left(250).top("1%"))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value).name("Count"));

    for (category, counts) in counts {
        chart = chart.series(
            bar::Bar::new()
                .name(category)
                .stack("Count")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(counts),
        );
    }

    chart
}

fn bubble_chart(expenses: &[Expense]) -> Chart {
    let dates = sorted_dates(expenses);
    let labels = format_date_labels(&dates);
    let categories = categories(expenses);
    let largest = expenses
        .iter()
        .map(|expense| expense.amount.abs())
        .fold(0.0, f64::max);

    let mut chart = Chart::new()
        .title(Title::new().text("Spending Bubble Chart").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left(250).top("1%"))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    // A scatter series has one symbol size, so each expense gets its own series.
    // Series that share a category name share a colour and a legend entry.
    for expense in expenses {
        let Some(x) = dates.iter().position(|date| *date == expense.date) else {
            continue;
        };
        let colour_index = categories
            .iter()
            .position(|category| *category == expense.category)
            .unwrap_or_default();

        chart = chart.series(
            Scatter::new()
                .name(expense.category.as_str())
                .symbol_size(bubble_size(expense.amount, largest))
                .item_style(ItemStyle::new().color(PALETTE[colour_index % PALETTE.len()]))
                .data(vec![vec![x as f64, expense.amount]]),
        );
    }

    chart
}

/// The symbol size for `amount` relative to the `largest` amount on the chart.
fn bubble_size(amount: f64, largest: f64) -> f64 {
    if largest <= 0.0 {
        return MIN_BUBBLE_SIZE;
    }

    MIN_BUBBLE_SIZE + (MAX_BUBBLE_SIZE - MIN_BUBBLE_SIZE) * (amount.abs() / largest)
}

/// A chart with dates along the x-axis and dollars up the y-axis.
fn axis_chart(title: &str, labels: Vec<String>) -> Chart {
    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
}

fn chart_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(90)
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
