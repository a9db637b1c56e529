use chrono::NaiveDate;

use crate::config;
use crate::models::transaction::NewTransaction;
use crate::operations::{InputError, MAX_DESCRIPTION_LEN};

/// Parses one input line of the form
/// `date(YYYY-MM-DD), description, amount, category` into a validated
/// candidate transaction. The ledger trusts this value object as-is, so
/// every business rule on input is checked here.
pub fn parse_new_transaction(line: &str) -> Result<NewTransaction, InputError> {
    let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if fields.len() != 4 {
        return Err(InputError::WrongFieldCount(fields.len()));
    }

    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|_| InputError::BadDate(fields[0].to_string()))?;

    let description = fields[1].to_string();
    if description.is_empty() {
        return Err(InputError::EmptyDescription);
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(InputError::DescriptionTooLong(description.len()));
    }

    let amount: f64 = fields[2]
        .parse()
        .map_err(|_| InputError::BadAmount(fields[2].to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(InputError::BadAmount(fields[2].to_string()));
    }

    let category = config::canonical_category(fields[3])
        .ok_or_else(|| InputError::UnknownCategory(fields[3].to_string()))?;

    Ok(NewTransaction::new(
        date,
        description,
        amount,
        category.to_string(),
    ))
}
