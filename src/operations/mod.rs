pub mod add;
pub mod history;
pub mod remove;
pub mod summary;

pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Rejection reasons for user input, raised before anything reaches the
/// ledger.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("expected 4 fields separated by commas but got {0}")]
    WrongFieldCount(usize),
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    BadDate(String),
    #[error("invalid amount \"{0}\", expected a number greater than zero")]
    BadAmount(String),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description too long ({0} characters, max {MAX_DESCRIPTION_LEN})")]
    DescriptionTooLong(usize),
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
    #[error("invalid transaction id \"{0}\"")]
    BadId(String),
}
