use async_trait::async_trait;
use lift_core::model::PlanSchema;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by plan sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error in {}: {message}", .path.display())]
    Serialization { path: PathBuf, message: String },

    #[error("invalid plan in {}: {source}", .path.display())]
    InvalidPlan {
        path: PathBuf,
        #[source]
        source: lift_core::Error,
    },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Anything that can hand over the plan schemas to register at start-up.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Load every schema this source knows about.
    ///
    /// Order matters: when two schemas share a name, the later one wins once
    /// they are registered in a catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any schema cannot be read or is malformed.
    async fn load_schemas(&self) -> Result<Vec<PlanSchema>, StorageError>;
}

/// Simple in-memory source for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryPlanSource {
    schemas: Arc<Mutex<Vec<PlanSchema>>>,
}

impl InMemoryPlanSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schemas(schemas: impl IntoIterator<Item = PlanSchema>) -> Self {
        Self {
            schemas: Arc::new(Mutex::new(schemas.into_iter().collect())),
        }
    }

    /// Queue a schema to be returned by the next load.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn push(&self, schema: PlanSchema) -> Result<(), StorageError> {
        let mut guard = self
            .schemas
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(schema);
        Ok(())
    }
}

#[async_trait]
impl PlanSource for InMemoryPlanSource {
    async fn load_schemas(&self) -> Result<Vec<PlanSchema>, StorageError> {
        let guard = self
            .schemas
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}
