use thiserror::Error;

use crate::model::{AssessmentError, DraftError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Draft(#[from] DraftError),
}
