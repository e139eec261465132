//! The fixed menu of expense types and the categories offered for each.
//!
//! The menu only shapes the choices in the expense and budget forms. Ledger
//! functions accept any category name.

use std::fmt::Display;

/// A group of related expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpenseType {
    /// Rent, utilities and insurance.
    #[default]
    Fixed,
    /// Groceries, transportation and entertainment.
    Variable,
    /// Dining out and subscriptions.
    Discretionary,
    /// Healthcare and education.
    Essential,
    /// Luxury items.
    NonEssential,
    /// Vacations and annual memberships.
    Periodic,
    /// Large purchases such as a car or a home renovation.
    OneTime,
    /// Salaries and supplies.
    Operating,
    /// Equipment and property.
    Capital,
}

impl ExpenseType {
    /// Every expense type, in menu order.
    pub const ALL: [ExpenseType; 9] = [
        ExpenseType::Fixed,
        ExpenseType::Variable,
        ExpenseType::Discretionary,
        ExpenseType::Essential,
        ExpenseType::NonEssential,
        ExpenseType::Periodic,
        ExpenseType::OneTime,
        ExpenseType::Operating,
        ExpenseType::Capital,
    ];

    /// The name shown to users, e.g. "Fixed Expenses".
    pub fn name(self) -> &'static str {
        match self {
            ExpenseType::Fixed => "Fixed Expenses",
            ExpenseType::Variable => "Variable Expenses",
            ExpenseType::Discretionary => "Discretionary Expenses",
            ExpenseType::Essential => "Essential Expenses",
            ExpenseType::NonEssential => "Non-Essential Expenses",
            ExpenseType::Periodic => "Periodic Expenses",
            ExpenseType::OneTime => "One-Time Expenses",
            ExpenseType::Operating => "Operating Expenses",
            ExpenseType::Capital => "Capital Expenses",
        }
    }

    /// The value used for this type in URL query strings, e.g. "fixed".
    pub fn slug(self) -> &'static str {
        match self {
            ExpenseType::Fixed => "fixed",
            ExpenseType::Variable => "variable",
            ExpenseType::Discretionary => "discretionary",
            ExpenseType::Essential => "essential",
            ExpenseType::NonEssential => "non_essential",
            ExpenseType::Periodic => "periodic",
            ExpenseType::OneTime => "one_time",
            ExpenseType::Operating => "operating",
            ExpenseType::Capital => "capital",
        }
    }

    /// The inverse of [ExpenseType::slug].
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|expense_type| expense_type.slug() == slug)
    }
}

impl Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The categories on offer for `expense_type`.
pub fn categories_for(expense_type: ExpenseType) -> &'static [&'static str] {
    match expense_type {
        ExpenseType::Fixed => &["Rent", "Utilities", "Insurance"],
        ExpenseType::Variable => &["Groceries", "Transportation", "Entertainment"],
        ExpenseType::Discretionary => &["Dining Out", "Subscriptions"],
        ExpenseType::Essential => &["Healthcare", "Education"],
        ExpenseType::NonEssential => &["Luxury Items"],
        ExpenseType::Periodic => &["Vacation", "Annual Memberships"],
        ExpenseType::OneTime => &["Car Purchase", "Home Renovation"],
        ExpenseType::Operating => &["Salaries", "Supplies"],
        ExpenseType::Capital => &["Equipment", "Property"],
    }
}
