use crate::models::transaction::Transaction;

/// Formats an amount with thousands separators, keeping cents only when the
/// value has a fractional part: `25000.0` becomes `25,000`, `9.5` becomes
/// `9.50`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;

    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push_str(&whole);
    if fraction != 0 {
        out.push_str(&format!(".{:02}", fraction));
    }
    out
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders the transaction history as a text table with the id as a visible
/// column, in the order the ledger returned the rows.
pub fn render_table(transactions: &[Transaction]) -> String {
    let id_width = transactions
        .iter()
        .map(|t| t.id.to_string().len())
        .chain(std::iter::once("ID".len()))
        .max()
        .unwrap_or(2);
    let description_width = transactions
        .iter()
        .map(|t| t.description.len())
        .chain(std::iter::once("Description".len()))
        .max()
        .unwrap_or(11);
    let category_width = transactions
        .iter()
        .map(|t| t.category.len())
        .chain(std::iter::once("Category".len()))
        .max()
        .unwrap_or(8);
    let amount_width = transactions
        .iter()
        .map(|t| format_amount(t.amount).len())
        .chain(std::iter::once("Amount".len()))
        .max()
        .unwrap_or(6);

    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(format!(
        "{:>id_width$}  {:10}  {:description_width$}  {:category_width$}  {:>amount_width$}",
        "ID", "Date", "Description", "Category", "Amount",
    ));
    for tx in transactions {
        lines.push(format!(
            "{:>id_width$}  {}  {:description_width$}  {:category_width$}  {:>amount_width$}",
            tx.id,
            tx.date.format("%Y-%m-%d"),
            tx.description,
            tx.category,
            format_amount(tx.amount),
        ));
    }
    lines.join("\n")
}
