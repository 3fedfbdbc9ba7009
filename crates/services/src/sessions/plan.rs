use lift_core::model::{PlanInstance, PlanSchema};

use crate::catalog::PlanCatalog;
use crate::error::SessionError;

/// Turns catalog schemas into fresh per-user plan instances.
pub struct PlanInstantiator;

impl PlanInstantiator {
    /// Copy `schema` into a new instance at its first exercise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PlanNotFound` without a name when no schema was
    /// supplied.
    pub fn instantiate(schema: Option<&PlanSchema>) -> Result<PlanInstance, SessionError> {
        schema
            .map(PlanInstance::instantiate)
            .ok_or(SessionError::PlanNotFound { name: None })
    }

    /// Look `name` up in `catalog` and instantiate it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PlanNotFound` naming the missing plan.
    pub fn instantiate_named(
        catalog: &PlanCatalog,
        name: &str,
    ) -> Result<PlanInstance, SessionError> {
        catalog
            .lookup(name)
            .map(PlanInstance::instantiate)
            .ok_or_else(|| SessionError::plan_not_found(name))
    }
}
