pub mod expenses;
pub mod rates;
pub mod reports;
pub mod sales;

use chrono::NaiveDate;

use crate::error::LedgerError;

pub(crate) fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), LedgerError> {
    if from > to {
        return Err(LedgerError::InvalidInput(format!(
            "invalid range: from {from} is after to {to}"
        )));
    }
    Ok(())
}
