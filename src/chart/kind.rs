use std::fmt::Display;

/// The ways the expenses chart on the dashboard can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    /// Total spending per category as slices of a pie.
    #[default]
    Pie,
    /// Spending per day, one bar per category.
    Bar,
    /// Spending per day, one line per category.
    Line,
    /// Spending per day with the categories stacked into one bar.
    StackedBar,
    /// Spending per day as stacked, filled lines.
    Area,
    /// How many expenses fall into each amount range.
    Histogram,
    /// A pie with a hole in the middle.
    Donut,
    /// Each expense as a circle sized by its amount.
    Bubble,
}

impl ChartKind {
    /// Every chart kind, in the order they are offered.
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Pie,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::StackedBar,
        ChartKind::Area,
        ChartKind::Histogram,
        ChartKind::Donut,
        ChartKind::Bubble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Pie => "Pie Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::StackedBar => "Stacked Bar Chart",
            ChartKind::Area => "Area Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Donut => "Donut Chart",
            ChartKind::Bubble => "Bubble Chart",
        }
    }

    /// The value used for this kind in URL query strings, e.g. "stacked_bar".
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::Area => "area",
            ChartKind::Histogram => "histogram",
            ChartKind::Donut => "donut",
            ChartKind::Bubble => "bubble",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
