use chrono::NaiveDate;

/// A stored expense row. Immutable once persisted; the only mutation the
/// ledger supports is deletion of the whole row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// A candidate expense built by the caller before insertion. The id is
/// assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, description: String, amount: f64, category: String) -> Self {
        Self {
            date,
            description,
            amount,
            category,
        }
    }
}
