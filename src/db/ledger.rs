use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::{Row, params};

use crate::db::gateway::{Gateway, StoreError};
use crate::models::transaction::{NewTransaction, Transaction};

const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    date DATE NOT NULL
)";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The business facade over the storage gateway: schema bootstrap plus the
/// five ledger operations. Construct one per process and share a reference
/// with every caller.
///
/// Storage failures never escape as errors; each operation collapses them
/// into its documented sentinel (`false`, `None`, `0.0`, or an empty map).
/// The ledger trusts callers to validate candidate transactions before
/// `add`; validation lives at the input boundary.
pub struct Ledger {
    gateway: Gateway,
}

impl Ledger {
    /// Opens the database file and idempotently ensures the schema exists.
    /// This is the only ledger entry point that surfaces a storage error:
    /// a process that cannot bootstrap its table has nothing to run on.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let gateway = Gateway::new(path);
        gateway.execute_checked(CREATE_TRANSACTIONS_TABLE, [])?;
        tracing::debug!("ledger ready at {}", gateway.path().display());
        Ok(Ledger { gateway })
    }

    /// Inserts one expense. True iff the database assigned an id to the new
    /// row.
    pub fn add(&self, tx: &NewTransaction) -> bool {
        let id = self.gateway.insert(
            "INSERT INTO transactions (description, amount, category, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                tx.description,
                tx.amount,
                tx.category,
                tx.date.format(DATE_FORMAT).to_string(),
            ],
        );
        id.is_some()
    }

    /// All stored expenses, newest date first, ties broken by most recently
    /// inserted. `None` means the read failed; an empty ledger is
    /// `Some(vec![])`.
    pub fn list(&self) -> Option<Vec<Transaction>> {
        self.gateway.query_rows(
            "SELECT id, description, amount, category, date FROM transactions
             ORDER BY date DESC, id DESC",
            [],
            map_transaction_row,
        )
    }

    /// Deletes by id. True iff the statement ran without a storage error,
    /// which includes the case where no row matched the id.
    pub fn delete(&self, id: i64) -> bool {
        self.gateway
            .execute("DELETE FROM transactions WHERE id = ?1", [id])
    }

    /// Total spend, optionally restricted to a single date. A `SUM` over
    /// zero rows yields NULL in SQL; it is coalesced to 0.0 here, and a
    /// failed read also reports 0.0.
    pub fn total_spent(&self, on: Option<NaiveDate>) -> f64 {
        let total = match on {
            Some(date) => self.gateway.query_row(
                "SELECT IFNULL(SUM(amount), 0) FROM transactions WHERE date = ?1",
                [date.format(DATE_FORMAT).to_string()],
                |row| row.get(0),
            ),
            None => self.gateway.query_row(
                "SELECT IFNULL(SUM(amount), 0) FROM transactions",
                [],
                |row| row.get(0),
            ),
        };
        total.unwrap_or(0.0)
    }

    /// Spend per category, optionally restricted to a single date. Only
    /// categories with at least one matching row appear; map order carries
    /// no meaning, callers re-sort for display.
    pub fn spent_by_category(&self, on: Option<NaiveDate>) -> HashMap<String, f64> {
        let rows = match on {
            Some(date) => self.gateway.query_rows(
                "SELECT category, SUM(amount) FROM transactions
                 WHERE date = ?1 GROUP BY category",
                [date.format(DATE_FORMAT).to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            ),
            None => self.gateway.query_rows(
                "SELECT category, SUM(amount) FROM transactions GROUP BY category",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            ),
        };
        match rows {
            Some(pairs) => pairs.into_iter().collect(),
            None => HashMap::new(),
        }
    }
}

fn map_transaction_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(4)?;
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn open_test_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(dir.path().join("test.db")).unwrap();
        (dir, ledger)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(description: &str, amount: f64, category: &str, on: NaiveDate) -> NewTransaction {
        NewTransaction::new(on, description.to_string(), amount, category.to_string())
    }

    #[test]
    fn test_add_then_list_returns_the_inserted_row() {
        let (_dir, ledger) = open_test_ledger();
        let lunch = expense("Lunch", 25000.0, "Food", date(2024, 1, 10));

        assert!(ledger.add(&lunch));

        let listed = ledger.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "Lunch");
        assert_eq!(listed[0].amount, 25000.0);
        assert_eq!(listed[0].category, "Food");
        assert_eq!(listed[0].date, date(2024, 1, 10));
        assert!(listed[0].id > 0);
    }

    #[test]
    fn test_list_of_empty_ledger_is_some_empty() {
        let (_dir, ledger) = open_test_ledger();

        assert_eq!(ledger.list(), Some(vec![]));
    }

    #[test]
    fn test_list_orders_by_date_then_insertion_descending() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Train", 12000.0, "Transport", date(2024, 1, 9)));
        ledger.add(&expense("Coffee", 8000.0, "Food", date(2024, 1, 10)));

        let listed = ledger.list().unwrap();
        let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Coffee", "Lunch", "Train"]);
    }

    #[test]
    fn test_ids_keep_increasing_after_delete() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        let last_id = ledger.list().unwrap()[0].id;

        assert!(ledger.delete(last_id));
        ledger.add(&expense("Dinner", 30000.0, "Food", date(2024, 1, 10)));

        let new_id = ledger.list().unwrap()[0].id;
        assert!(new_id > last_id, "id {} was reused", last_id);
    }

    #[test]
    fn test_total_spent_sums_all_rows() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Bus", 5000.0, "Transport", date(2024, 1, 10)));
        ledger.add(&expense("Rent", 1500000.0, "Housing", date(2024, 1, 1)));

        assert_eq!(ledger.total_spent(None), 1530000.0);
    }

    #[test]
    fn test_total_spent_with_date_filter() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Bus", 5000.0, "Transport", date(2024, 1, 10)));
        ledger.add(&expense("Rent", 1500000.0, "Housing", date(2024, 1, 1)));

        assert_eq!(ledger.total_spent(Some(date(2024, 1, 10))), 30000.0);
        assert_eq!(ledger.total_spent(Some(date(2024, 1, 11))), 0.0);
    }

    #[test]
    fn test_total_spent_of_empty_ledger_is_zero() {
        let (_dir, ledger) = open_test_ledger();

        assert_eq!(ledger.total_spent(None), 0.0);
    }

    #[test]
    fn test_spent_by_category_partitions_the_total() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Bus", 5000.0, "Transport", date(2024, 1, 10)));

        let by_category = ledger.spent_by_category(None);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Food"], 25000.0);
        assert_eq!(by_category["Transport"], 5000.0);

        let partitioned: f64 = by_category.values().sum();
        assert_eq!(partitioned, ledger.total_spent(None));
    }

    #[test]
    fn test_spent_by_category_omits_categories_without_rows() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));

        let by_category = ledger.spent_by_category(None);
        assert!(!by_category.contains_key("Transport"));
    }

    #[test]
    fn test_spent_by_category_with_date_filter() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Groceries", 90000.0, "Food", date(2024, 1, 11)));

        let on_the_tenth = ledger.spent_by_category(Some(date(2024, 1, 10)));
        assert_eq!(on_the_tenth.len(), 1);
        assert_eq!(on_the_tenth["Food"], 25000.0);

        assert!(ledger.spent_by_category(Some(date(2024, 1, 12))).is_empty());
    }

    #[test]
    fn test_delete_removes_exactly_the_targeted_row() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        ledger.add(&expense("Bus", 5000.0, "Transport", date(2024, 1, 10)));

        let lunch_id = ledger
            .list()
            .unwrap()
            .iter()
            .find(|t| t.description == "Lunch")
            .unwrap()
            .id;

        assert!(ledger.delete(lunch_id));

        let remaining = ledger.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|t| t.id != lunch_id));
        assert_eq!(ledger.total_spent(None), 5000.0);
    }

    #[test]
    fn test_delete_of_nonexistent_id_reports_success() {
        let (_dir, ledger) = open_test_ledger();

        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));

        assert!(ledger.delete(999_999));
        assert_eq!(ledger.total_spent(None), 25000.0);
    }

    #[test]
    fn test_schema_bootstrap_is_idempotent_and_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let ledger = Ledger::open(&path).unwrap();
        ledger.add(&expense("Lunch", 25000.0, "Food", date(2024, 1, 10)));
        drop(ledger);

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 1);
        assert_eq!(reopened.total_spent(None), 25000.0);
    }
}
