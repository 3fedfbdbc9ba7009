use std::fmt;

use crate::model::ids::Username;
use crate::model::plan::{PlanInstance, PlanSchema};

/// A stored login secret.
///
/// Kept as plaintext and compared with plain equality. Any deployment beyond a
/// toy must replace this with a vetted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn plaintext(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// A user and the plan they are currently working through, if any.
#[derive(Debug, Clone)]
pub struct User {
    username: Username,
    credential: Credential,
    active_plan: Option<PlanInstance>,
}

impl User {
    #[must_use]
    pub fn new(username: Username, credential: Credential) -> Self {
        Self {
            username,
            credential,
            active_plan: None,
        }
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    #[must_use]
    pub fn active_plan(&self) -> Option<&PlanInstance> {
        self.active_plan.as_ref()
    }

    pub fn active_plan_mut(&mut self) -> Option<&mut PlanInstance> {
        self.active_plan.as_mut()
    }

    /// Replaces whatever plan was active with a fresh copy of `schema`.
    pub fn activate(&mut self, schema: &PlanSchema) -> &mut PlanInstance {
        self.install(PlanInstance::instantiate(schema))
    }

    /// Installs an already built instance, discarding the previous one.
    pub fn install(&mut self, plan: PlanInstance) -> &mut PlanInstance {
        self.active_plan.insert(plan)
    }
}
