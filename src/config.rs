/// Expense categories offered by the input prompt, in display order.
///
/// The ledger itself does not enforce membership; input validation happens
/// at the prompt boundary before a transaction is built.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Housing",
    "Utilities",
    "Entertainment",
    "Health",
    "Education",
    "Other",
];

pub const DEFAULT_DB_FILE: &str = "expenses.db";

/// Resolves a user-typed label to its configured spelling, ignoring case.
pub fn canonical_category(label: &str) -> Option<&'static str> {
    EXPENSE_CATEGORIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(label))
        .copied()
}
