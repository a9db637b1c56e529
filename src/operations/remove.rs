use crate::operations::InputError;

/// Parses a raw transaction id typed by the user. The ledger reports
/// success for ids that never existed, so this is the only gate against
/// obviously malformed input.
pub fn parse_transaction_id(input: &str) -> Result<i64, InputError> {
    let trimmed = input.trim();
    let id: i64 = trimmed
        .parse()
        .map_err(|_| InputError::BadId(trimmed.to_string()))?;
    if id <= 0 {
        return Err(InputError::BadId(trimmed.to_string()));
    }
    Ok(id)
}
