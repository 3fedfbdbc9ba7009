use std::collections::HashMap;

use lift_core::model::PlanSchema;
use storage::repository::{PlanSource, StorageError};

/// Registry of plan schemas keyed by plan name.
///
/// Built once at start-up and then shared behind an `Arc`; nothing reachable
/// from request handling can mutate it.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: HashMap<String, PlanSchema>,
}

impl PlanCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every schema from `source`, in the order the source yields them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source fails to load.
    pub async fn load(source: &dyn PlanSource) -> Result<Self, StorageError> {
        let mut catalog = Self::new();
        for schema in source.load_schemas().await? {
            catalog.register(schema);
        }
        tracing::info!(plans = catalog.len(), "plan catalog ready");
        Ok(catalog)
    }

    /// Inserts `schema` under its name. A later schema with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, schema: PlanSchema) {
        if let Some(previous) = self.plans.insert(schema.name().to_owned(), schema) {
            tracing::warn!(plan = previous.name(), "plan registered twice; keeping the later one");
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&PlanSchema> {
        self.plans.get(name)
    }

    /// Plan names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.plans.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl FromIterator<PlanSchema> for PlanCatalog {
    fn from_iter<I: IntoIterator<Item = PlanSchema>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for schema in iter {
            catalog.register(schema);
        }
        catalog
    }
}
