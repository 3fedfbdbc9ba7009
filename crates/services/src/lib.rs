#![forbid(unsafe_code)]

use std::sync::{MutexGuard, PoisonError};

use lift_core::model::User;

pub mod accounts;
pub mod app_services;
pub mod catalog;
pub mod error;
pub mod sessions;

pub use lift_core::Clock;
pub use sessions as session;

pub use accounts::{AuthGate, SEED_USERS, SharedUser, UserDirectory};
pub use app_services::AppServices;
pub use catalog::PlanCatalog;
pub use error::{AppServicesError, AuthFailure, SessionError};

pub use sessions::{
    AdvanceStatus, AdvanceView, CardView, LandingView, PlanInstantiator, PlanLoopService,
    SessionDirectory,
};

/// Lock a shared user. A poisoned lock still holds a consistent `User`: every
/// mutation on it is a single field write or a whole-value replacement.
pub(crate) fn lock(user: &SharedUser) -> MutexGuard<'_, User> {
    user.lock().unwrap_or_else(PoisonError::into_inner)
}
