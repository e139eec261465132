//! Reshapes expense rows into the series the charts plot.

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use crate::{expense::Expense, html::format_currency};

/// The number of amount ranges in the histogram.
pub(super) const HISTOGRAM_BUCKETS: usize = 10;

/// The total spent in each category, ordered by category.
pub(super) fn total_by_category(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_default() += expense.amount;
    }

    totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect()
}

/// The distinct categories in `expenses`, in alphabetical order.
pub(super) fn categories(expenses: &[Expense]) -> Vec<&str> {
    expenses
        .iter()
        .map(|expense| expense.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The distinct dates in `expenses`, earliest first.
pub(super) fn sorted_dates(expenses: &[Expense]) -> Vec<Date> {
    expenses
        .iter()
        .map(|expense| expense.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub(super) fn format_date_labels(dates: &[Date]) -> Vec<String> {
    dates.iter().map(Date::to_string).collect()
}

/// For each category, the amount spent on each of `dates`.
///
/// Dates with nothing spent in a category are `None`.
pub(super) fn daily_amounts_by_category(
    expenses: &[Expense],
    dates: &[Date],
) -> Vec<(String, Vec<Option<f64>>)> {
    categories(expenses)
        .into_iter()
        .map(|category| {
            let amounts = dates
                .iter()
                .map(|date| {
                    expenses
                        .iter()
                        .filter(|expense| expense.category == category && expense.date == *date)
                        .map(|expense| expense.amount)
                        .reduce(|total, amount| total + amount)
                })
                .collect();

            (category.to_owned(), amounts)
        })
        .collect()
}

/// Expense counts per amount range, split by category.
#[derive(Debug, PartialEq)]
pub(super) struct Histogram {
    /// One label per range, e.g. "$0.00 - $50.00".
    pub labels: Vec<String>,
    /// For each category, how many of its expenses fall into each range.
    pub counts: Vec<(String, Vec<i64>)>,
}

/// Split the range of expense amounts into equal-width buckets and count the
/// expenses in each.
///
/// When every expense has the same amount there is a single bucket.
pub(super) fn histogram(expenses: &[Expense], bucket_count: usize) -> Histogram {
    let amounts = expenses.iter().map(|expense| expense.amount);
    let (Some(min), Some(max)) = (
        amounts.clone().reduce(f64::min),
        amounts.reduce(f64::max),
    ) else {
        return Histogram {
            labels: Vec::new(),
            counts: Vec::new(),
        };
    };

    let bucket_count = if max > min { bucket_count.max(1) } else { 1 };
    let width = if max > min {
        (max - min) / bucket_count as f64
    } else {
        1.0
    };

    let bucket_of = |amount: f64| {
        let index = ((amount - min) / width).floor() as usize;
        index.min(bucket_count - 1)
    };

    let labels = (0..bucket_count)
        .map(|bucket| {
            let lower = min + width * bucket as f64;
            let upper = if bucket + 1 == bucket_count {
                max
            } else {
                lower + width
            };

            format!("{} - {}", format_currency(lower), format_currency(upper))
        })
        .collect();

    let counts = categories(expenses)
        .into_iter()
        .map(|category| {
            let mut counts = vec![0; bucket_count];

            for expense in expenses.iter().filter(|expense| expense.category == category) {
                counts[bucket_of(expense.amount)] += 1;
            }

            (category.to_owned(), counts)
        })
        .collect();

    Histogram { labels, counts }
}
