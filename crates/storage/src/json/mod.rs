use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lift_core::model::PlanSchema;
use tokio::fs;

use crate::repository::{PlanSource, StorageError};

mod mapping;

pub use mapping::{ExerciseEntry, PlanFile};

const PLAN_EXTENSION: &str = "json";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Plan source backed by a directory tree of `*.json` plan files.
///
/// Subdirectories are walked depth-first in file-name order, so the load order
/// (and therefore which duplicate name wins) is stable across runs.
#[derive(Debug, Clone)]
pub struct DirectoryPlanSource {
    root: PathBuf,
}

impl DirectoryPlanSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn plan_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut files = Vec::new();
        let mut pending = vec![(self.root.clone(), true)];

        while let Some((path, is_dir)) = pending.pop() {
            if !is_dir {
                if path.extension().is_some_and(|ext| ext == PLAN_EXTENSION) {
                    files.push(path);
                } else {
                    tracing::debug!(path = %path.display(), "skipping non-plan file");
                }
                continue;
            }

            let mut entries = fs::read_dir(&path).await.map_err(io_error(&path))?;
            let mut children = Vec::new();
            while let Some(entry) = entries.next_entry().await.map_err(io_error(&path))? {
                let file_type = entry.file_type().await.map_err(io_error(&path))?;
                children.push((entry.path(), file_type.is_dir()));
            }
            children.sort();
            pending.extend(children.into_iter().rev());
        }

        Ok(files)
    }
}

#[async_trait]
impl PlanSource for DirectoryPlanSource {
    async fn load_schemas(&self) -> Result<Vec<PlanSchema>, StorageError> {
        let files = self.plan_files().await?;
        let mut schemas = Vec::with_capacity(files.len());
        for path in files {
            let bytes = fs::read(&path).await.map_err(io_error(&path))?;
            let schema = mapping::parse_plan(&path, &bytes)?;
            tracing::debug!(plan = schema.name(), path = %path.display(), "loaded plan");
            schemas.push(schema);
        }
        tracing::info!(
            root = %self.root.display(),
            count = schemas.len(),
            "loaded plan schemas"
        );
        Ok(schemas)
    }
}

/// Write `schema` as a pretty-printed plan file, creating parent directories.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be written.
pub async fn write_plan(path: &Path, schema: &PlanSchema) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(io_error(parent))?;
    }
    let text = mapping::render_plan(schema).map_err(|e| StorageError::Serialization {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, text).await.map_err(io_error(path))
}
