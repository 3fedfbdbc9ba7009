use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise name cannot be empty")]
    EmptyName,

    #[error("target sets must be > 0")]
    InvalidSets,

    #[error("target reps must be > 0")]
    InvalidReps,
}

//
// ─── TEMPLATE ──────────────────────────────────────────────────────────────────
//

/// One prescribed exercise of a plan: what to do and how many sets and reps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseTemplate {
    name: String,
    sets: u32,
    reps: u32,
}

impl ExerciseTemplate {
    /// Creates a template. The name is stored as given.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::EmptyName` if the name is blank, or
    /// `InvalidSets`/`InvalidReps` if either target is zero.
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Result<Self, ExerciseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ExerciseError::EmptyName);
        }
        if sets == 0 {
            return Err(ExerciseError::InvalidSets);
        }
        if reps == 0 {
            return Err(ExerciseError::InvalidReps);
        }

        Ok(Self {
            name,
            sets,
            reps,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sets(&self) -> u32 {
        self.sets
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// When an exercise was finished: a per-plan logical counter and the wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTimestamp {
    pub logical: u64,
    pub real: DateTime<Utc>,
}

/// A user's working copy of one exercise inside an active plan.
///
/// The template is fixed at instantiation; only the weight and the completion
/// stamp change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseRecord {
    template: ExerciseTemplate,
    weight: u32,
    completed_at: Option<ExerciseTimestamp>,
}

impl ExerciseRecord {
    #[must_use]
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            template: template.clone(),
            weight: 0,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn template(&self) -> &ExerciseTemplate {
        &self.template
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.template.name()
    }

    #[must_use]
    pub fn sets(&self) -> u32 {
        self.template.sets()
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.template.reps()
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<ExerciseTimestamp> {
        self.completed_at
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.completed_at.is_some()
    }

    pub(crate) fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }

    pub(crate) fn mark_done(&mut self, stamp: ExerciseTimestamp) {
        self.completed_at = Some(stamp);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rejects_blank_name() {
        let err = ExerciseTemplate::new("  ", 3, 5).unwrap_err();
        assert_eq!(err, ExerciseError::EmptyName);
    }

    #[test]
    fn template_rejects_zero_targets() {
        assert_eq!(
            ExerciseTemplate::new("squat", 0, 5).unwrap_err(),
            ExerciseError::InvalidSets
        );
        assert_eq!(
            ExerciseTemplate::new("squat", 3, 0).unwrap_err(),
            ExerciseError::InvalidReps
        );
    }

    #[test]
    fn template_keeps_name_verbatim() {
        let template = ExerciseTemplate::new("  deadlift ", 1, 5).unwrap();
        assert_eq!(template.name(), "  deadlift ");
        assert_eq!(template.sets(), 1);
        assert_eq!(template.reps(), 5);
    }

    #[test]
    fn record_starts_unweighted_and_unstamped() {
        let template = ExerciseTemplate::new("press", 3, 5).unwrap();
        let record = ExerciseRecord::from_template(&template);

        assert_eq!(record.template(), &template);
        assert_eq!(record.weight(), 0);
        assert_eq!(record.completed_at(), None);
        assert!(!record.is_done());
    }
}
