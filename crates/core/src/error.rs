use thiserror::Error;

use crate::model::{ColorError, ParseIdError, SessionError};
use crate::stats::PeriodError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
