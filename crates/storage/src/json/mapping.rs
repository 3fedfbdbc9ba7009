use std::path::Path;

use lift_core::model::{ExerciseTemplate, PlanSchema};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// On-disk shape of one plan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFile {
    pub name: String,
    pub exercises: Vec<ExerciseEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
}

impl PlanFile {
    #[must_use]
    pub fn from_schema(schema: &PlanSchema) -> Self {
        Self {
            name: schema.name().to_owned(),
            exercises: schema
                .exercises()
                .iter()
                .map(|t| ExerciseEntry {
                    exercise: t.name().to_owned(),
                    sets: t.sets(),
                    reps: t.reps(),
                })
                .collect(),
        }
    }

    /// Validate the file contents into a domain schema.
    ///
    /// # Errors
    ///
    /// Returns `lift_core::Error` if an exercise or the plan itself is invalid.
    pub fn into_schema(self) -> Result<PlanSchema, lift_core::Error> {
        let exercises = self
            .exercises
            .into_iter()
            .map(|e| ExerciseTemplate::new(e.exercise, e.sets, e.reps))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PlanSchema::new(self.name, exercises)?)
    }
}

pub(crate) fn parse_plan(path: &Path, bytes: &[u8]) -> Result<PlanSchema, StorageError> {
    let file: PlanFile =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    file.into_schema().map_err(|source| StorageError::InvalidPlan {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn render_plan(schema: &PlanSchema) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PlanFile::from_schema(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_core::model::PlanError;

    #[test]
    fn parses_plan_json() {
        let json = br#"{
            "name": "Starting Strength A",
            "exercises": [
                {"exercise": "squat", "sets": 3, "reps": 5},
                {"exercise": "press", "sets": 3, "reps": 5}
            ]
        }"#;
        let schema = parse_plan(Path::new("a.json"), json).unwrap();

        assert_eq!(schema.name(), "Starting Strength A");
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.exercises()[1].name(), "press");
        assert_eq!(schema.exercises()[1].sets(), 3);
    }

    #[test]
    fn empty_exercise_list_is_an_invalid_plan() {
        let json = br#"{"name": "nothing", "exercises": []}"#;
        let err = parse_plan(Path::new("plans/nothing.json"), json).unwrap_err();

        match err {
            StorageError::InvalidPlan { path, source } => {
                assert_eq!(path, Path::new("plans/nothing.json"));
                assert!(matches!(
                    source,
                    lift_core::Error::Plan(PlanError::NoExercises { .. })
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_reps_are_a_serialization_error() {
        let json = br#"{"name": "bad", "exercises": [{"exercise": "row", "sets": 3, "reps": -1}]}"#;
        let err = parse_plan(Path::new("bad.json"), json).unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }

    #[test]
    fn rendered_plan_parses_back_to_the_same_schema() {
        let schema = PlanSchema::new(
            "B",
            vec![ExerciseTemplate::new("deadlift", 1, 5).unwrap()],
        )
        .unwrap();
        let text = render_plan(&schema).unwrap();
        assert_eq!(parse_plan(Path::new("b.json"), text.as_bytes()).unwrap(), schema);
    }
}
