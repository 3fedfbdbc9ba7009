use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::exercise::{ExerciseRecord, ExerciseTemplate, ExerciseTimestamp};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("plan name cannot be empty")]
    EmptyName,

    #[error("plan {name:?} has no exercises")]
    NoExercises { name: String },
}

/// Raised when a finished plan is asked for its current exercise or advanced again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("plan already complete")]
    AlreadyComplete,
}

//
// ─── SCHEMA ────────────────────────────────────────────────────────────────────
//

/// Named, ordered list of exercise templates. Shared read-only by every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSchema {
    name: String,
    exercises: Vec<ExerciseTemplate>,
}

impl PlanSchema {
    /// Creates a plan schema. The name is kept exactly as given; it is the
    /// catalog key.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::EmptyName` for a blank name and
    /// `PlanError::NoExercises` when no templates are given.
    pub fn new(
        name: impl Into<String>,
        exercises: Vec<ExerciseTemplate>,
    ) -> Result<Self, PlanError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanError::EmptyName);
        }
        if exercises.is_empty() {
            return Err(PlanError::NoExercises { name });
        }

        Ok(Self { name, exercises })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseTemplate] {
        &self.exercises
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Always false for a constructed schema; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Outcome of moving the cursor one step forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvanceResult {
    /// More exercises remain; `next` is now current.
    Continuing { next: ExerciseRecord },
    /// The plan just finished; `last` is the exercise that was finished.
    Complete { last: ExerciseRecord },
}

impl AdvanceResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, AdvanceResult::Complete { .. })
    }

    /// The record a view should show after this step.
    #[must_use]
    pub fn record(&self) -> &ExerciseRecord {
        match self {
            AdvanceResult::Continuing { next } => next,
            AdvanceResult::Complete { last } => last,
        }
    }
}

/// Aggregated view of plan progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── INSTANCE ──────────────────────────────────────────────────────────────────
//

/// A user's working copy of a plan plus the cursor over its exercises.
///
/// The cursor only moves forward, one step per [`PlanInstance::advance`], and
/// `cursor == len` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInstance {
    name: String,
    exercises: Vec<ExerciseRecord>,
    cursor: usize,
    logical_clock: u64,
}

impl PlanInstance {
    /// Copies a schema into a fresh instance positioned at the first exercise.
    #[must_use]
    pub fn instantiate(schema: &PlanSchema) -> Self {
        Self {
            name: schema.name().to_owned(),
            exercises: schema
                .exercises()
                .iter()
                .map(ExerciseRecord::from_template)
                .collect(),
            cursor: 0,
            logical_clock: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor == self.exercises.len()
    }

    #[must_use]
    pub fn progress(&self) -> PlanProgress {
        PlanProgress {
            total: self.len(),
            completed: self.cursor,
            remaining: self.len().saturating_sub(self.cursor),
            is_complete: self.is_complete(),
        }
    }

    /// The exercise under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::AlreadyComplete` once every exercise is done.
    pub fn current(&self) -> Result<&ExerciseRecord, ProgressError> {
        self.exercises
            .get(self.cursor)
            .ok_or(ProgressError::AlreadyComplete)
    }

    fn current_mut(&mut self) -> Result<&mut ExerciseRecord, ProgressError> {
        self.exercises
            .get_mut(self.cursor)
            .ok_or(ProgressError::AlreadyComplete)
    }

    /// Records the weight used for the current exercise.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::AlreadyComplete` once every exercise is done.
    pub fn record_weight(&mut self, weight: u32) -> Result<&ExerciseRecord, ProgressError> {
        let record = self.current_mut()?;
        record.set_weight(weight);
        Ok(record)
    }

    /// Finishes the current exercise and moves to the next one.
    ///
    /// The finished exercise is stamped with the next logical tick and `now`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::AlreadyComplete` if the plan was already finished;
    /// the instance is left untouched in that case.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AdvanceResult, ProgressError> {
        let logical = self.logical_clock + 1;
        let finished = {
            let record = self.current_mut()?;
            record.mark_done(ExerciseTimestamp { logical, real: now });
            record.clone()
        };
        self.logical_clock = logical;
        self.cursor += 1;

        match self.exercises.get(self.cursor) {
            Some(next) => Ok(AdvanceResult::Continuing { next: next.clone() }),
            None => Ok(AdvanceResult::Complete { last: finished }),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn schema(name: &str, exercises: &[(&str, u32, u32)]) -> PlanSchema {
        let templates = exercises
            .iter()
            .map(|(n, s, r)| ExerciseTemplate::new(*n, *s, *r).unwrap())
            .collect();
        PlanSchema::new(name, templates).unwrap()
    }

    fn plan_a() -> PlanSchema {
        schema("A", &[("squat", 3, 5), ("press", 3, 5)])
    }

    #[test]
    fn schema_rejects_empty_exercise_list() {
        let err = PlanSchema::new("Empty", Vec::new()).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoExercises {
                name: "Empty".into()
            }
        );
    }

    #[test]
    fn schema_rejects_blank_name() {
        let templates = vec![ExerciseTemplate::new("squat", 3, 5).unwrap()];
        assert_eq!(
            PlanSchema::new(" ", templates).unwrap_err(),
            PlanError::EmptyName
        );
    }

    #[test]
    fn schema_keeps_surrounding_whitespace_in_name() {
        let schema = schema("Push Day ", &[("bench", 3, 5)]);
        assert_eq!(schema.name(), "Push Day ");
        assert_eq!(PlanInstance::instantiate(&schema).name(), "Push Day ");
    }

    #[test]
    fn instantiate_copies_schema_in_order() {
        let schema = schema("5x5", &[("squat", 5, 5), ("bench", 5, 5), ("row", 5, 5)]);
        let plan = PlanInstance::instantiate(&schema);

        assert_eq!(plan.name(), "5x5");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.cursor(), 0);
        assert!(!plan.is_complete());
        for (record, template) in plan.exercises().iter().zip(schema.exercises()) {
            assert_eq!(record.template(), template);
            assert_eq!(record.weight(), 0);
            assert_eq!(record.completed_at(), None);
        }
    }

    #[test]
    fn instances_are_independent_of_each_other_and_the_schema() {
        let schema = plan_a();
        let mut first = PlanInstance::instantiate(&schema);
        let second = PlanInstance::instantiate(&schema);

        first.record_weight(100).unwrap();
        first.advance(fixed_now()).unwrap();

        assert_eq!(second.exercises()[0].weight(), 0);
        assert_eq!(second.cursor(), 0);
        assert_eq!(schema, plan_a());
    }

    #[test]
    fn advance_moves_cursor_one_step_at_a_time() {
        let schema = schema("three", &[("a", 1, 1), ("b", 1, 1), ("c", 1, 1)]);
        let mut plan = PlanInstance::instantiate(&schema);

        for step in 1..=plan.len() {
            assert!(!plan.is_complete());
            plan.advance(fixed_now()).unwrap();
            assert_eq!(plan.cursor(), step);
        }
        assert!(plan.is_complete());
    }

    #[test]
    fn advance_reports_next_then_last() {
        let mut plan = PlanInstance::instantiate(&plan_a());
        assert_eq!(plan.current().unwrap().name(), "squat");

        let first = plan.advance(fixed_now()).unwrap();
        assert!(!first.is_complete());
        assert_eq!(first.record().name(), "press");

        let second = plan.advance(fixed_now()).unwrap();
        assert!(second.is_complete());
        assert_eq!(second.record().name(), "press");
        assert!(plan.is_complete());
    }

    #[test]
    fn completed_plan_rejects_further_steps() {
        let mut plan = PlanInstance::instantiate(&plan_a());
        plan.advance(fixed_now()).unwrap();
        plan.advance(fixed_now()).unwrap();
        let before = plan.clone();

        assert_eq!(
            plan.advance(fixed_now()).unwrap_err(),
            ProgressError::AlreadyComplete
        );
        assert_eq!(plan.current().unwrap_err(), ProgressError::AlreadyComplete);
        assert_eq!(
            plan.record_weight(20).unwrap_err(),
            ProgressError::AlreadyComplete
        );
        assert_eq!(plan, before);
    }

    #[test]
    fn finished_exercises_are_stamped_in_order() {
        let mut plan = PlanInstance::instantiate(&plan_a());
        let start = fixed_now();

        plan.advance(start).unwrap();
        plan.advance(start + Duration::minutes(4)).unwrap();

        let stamps: Vec<_> = plan
            .exercises()
            .iter()
            .map(|record| record.completed_at().unwrap())
            .collect();
        assert_eq!(stamps[0].logical, 1);
        assert_eq!(stamps[1].logical, 2);
        assert_eq!(stamps[0].real, start);
        assert_eq!(stamps[1].real, start + Duration::minutes(4));
    }

    #[test]
    fn record_weight_touches_only_the_current_exercise() {
        let mut plan = PlanInstance::instantiate(&plan_a());
        plan.advance(fixed_now()).unwrap();

        let record = plan.record_weight(60).unwrap();
        assert_eq!(record.name(), "press");
        assert_eq!(plan.exercises()[0].weight(), 0);
        assert_eq!(plan.exercises()[1].weight(), 60);
    }

    #[test]
    fn progress_tracks_cursor() {
        let mut plan = PlanInstance::instantiate(&plan_a());
        plan.advance(fixed_now()).unwrap();

        assert_eq!(
            plan.progress(),
            PlanProgress {
                total: 2,
                completed: 1,
                remaining: 1,
                is_complete: false,
            }
        );
    }
}
