use thiserror::Error;

use crate::recur::timezone::ConversionError;

/// Recurrence construction and expansion errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Invalid rule, no frequency property on rule")]
    MissingFrequency,

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error(transparent)]
    Timezone(#[from] ConversionError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
