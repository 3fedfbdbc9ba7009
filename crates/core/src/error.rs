use thiserror::Error;

use crate::model::{ExerciseError, PlanError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}
