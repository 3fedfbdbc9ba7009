use serde::Serialize;

use lift_core::model::{AdvanceResult, ExerciseRecord, PlanInstance, PlanProgress, User};

use crate::catalog::PlanCatalog;

/// What the render layer needs to draw one exercise card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub plan: String,
    /// 1-based position of this exercise in the plan.
    pub position: usize,
    pub total: usize,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: u32,
}

impl CardView {
    pub(crate) fn new(plan: &PlanInstance, position: usize, record: &ExerciseRecord) -> Self {
        Self {
            plan: plan.name().to_owned(),
            position,
            total: plan.len(),
            exercise: record.name().to_owned(),
            sets: record.sets(),
            reps: record.reps(),
            weight: record.weight(),
        }
    }

    /// Card for the exercise currently under the cursor.
    pub(crate) fn current(plan: &PlanInstance, record: &ExerciseRecord) -> Self {
        Self::new(plan, plan.cursor() + 1, record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    Continuing,
    Complete,
}

/// Result of an advance request: the next card, or the final one on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvanceView {
    pub status: AdvanceStatus,
    pub card: CardView,
    pub progress: PlanProgress,
}

impl AdvanceView {
    pub(crate) fn new(plan: &PlanInstance, result: &AdvanceResult) -> Self {
        let (status, card) = match result {
            AdvanceResult::Continuing { next } => {
                (AdvanceStatus::Continuing, CardView::current(plan, next))
            }
            AdvanceResult::Complete { last } => {
                (AdvanceStatus::Complete, CardView::new(plan, plan.len(), last))
            }
        };
        Self {
            status,
            card,
            progress: plan.progress(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == AdvanceStatus::Complete
    }
}

/// Landing page model: who is logged in, which plans exist, and how far along they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandingView {
    pub username: Option<String>,
    pub plans: Vec<String>,
    pub active_plan: Option<String>,
    pub progress: Option<PlanProgress>,
}

impl LandingView {
    pub(crate) fn new(user: Option<&User>, catalog: &PlanCatalog) -> Self {
        let active = user.and_then(User::active_plan);
        Self {
            username: user.map(|u| u.username().to_string()),
            plans: catalog.names().into_iter().map(str::to_owned).collect(),
            active_plan: active.map(|plan| plan.name().to_owned()),
            progress: active.map(PlanInstance::progress),
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }
}
