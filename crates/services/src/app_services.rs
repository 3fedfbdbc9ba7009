use std::sync::Arc;

use storage::repository::PlanSource;

use crate::Clock;
use crate::accounts::{AuthGate, UserDirectory};
use crate::catalog::PlanCatalog;
use crate::error::AppServicesError;
use crate::sessions::{PlanLoopService, SessionDirectory};

/// Assembles app-facing services from a plan source and a user list.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<PlanCatalog>,
    users: Arc<UserDirectory>,
    sessions: Arc<SessionDirectory>,
    plan_loop: Arc<PlanLoopService>,
}

impl AppServices {
    /// Build services with the seed accounts and every plan `source` yields.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the plan source fails to load.
    pub async fn from_source(
        source: &dyn PlanSource,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        Self::with_users(source, UserDirectory::seeded(), clock).await
    }

    /// Build services with an explicit user list.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the plan source fails to load.
    pub async fn with_users(
        source: &dyn PlanSource,
        users: UserDirectory,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(PlanCatalog::load(source).await?);
        if catalog.is_empty() {
            tracing::warn!("plan catalog is empty; no plan can be started");
        }
        Ok(Self::assemble(catalog, users, clock))
    }

    #[must_use]
    pub fn assemble(catalog: Arc<PlanCatalog>, users: UserDirectory, clock: Clock) -> Self {
        let users = Arc::new(users);
        let sessions = Arc::new(SessionDirectory::new());
        let plan_loop = Arc::new(PlanLoopService::new(
            clock,
            Arc::clone(&catalog),
            AuthGate::new(Arc::clone(&users)),
            Arc::clone(&sessions),
        ));

        Self {
            catalog,
            users,
            sessions,
            plan_loop,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<PlanCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn users(&self) -> Arc<UserDirectory> {
        Arc::clone(&self.users)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionDirectory> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn plan_loop(&self) -> Arc<PlanLoopService> {
        Arc::clone(&self.plan_loop)
    }
}
