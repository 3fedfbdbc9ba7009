mod exercise;
mod ids;
mod plan;
mod user;

pub use ids::{SessionId, Username};

pub use exercise::{ExerciseError, ExerciseRecord, ExerciseTemplate, ExerciseTimestamp};
pub use plan::{AdvanceResult, PlanError, PlanInstance, PlanProgress, PlanSchema, ProgressError};
pub use user::{Credential, User};
