//! Shared error types for the services crate.

use thiserror::Error;

use lift_core::model::ProgressError;
use storage::repository::StorageError;

/// Why a login attempt was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthFailure {
    #[error("unknown user")]
    UnknownUser,
    #[error("wrong password")]
    BadCredentials,
}

/// Errors emitted while serving a session's plan requests.
///
/// Every variant is recoverable: the transport layer turns it into a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// `name` is `None` when the caller had no schema and no name to report.
    #[error("plan not found{}", named_suffix(.name.as_deref()))]
    PlanNotFound { name: Option<String> },
    #[error("no active session")]
    NoActiveSession,
    #[error("no plan has been chosen")]
    PlanNotActive,
    #[error("plan already complete")]
    PlanAlreadyComplete,
    #[error(transparent)]
    Auth(#[from] AuthFailure),
}

impl SessionError {
    pub(crate) fn plan_not_found(name: &str) -> Self {
        SessionError::PlanNotFound {
            name: Some(name.to_owned()),
        }
    }
}

fn named_suffix(name: Option<&str>) -> String {
    name.map(|name| format!(": {name}")).unwrap_or_default()
}

impl From<ProgressError> for SessionError {
    // `ProgressError` is non_exhaustive upstream; every variant means the
    // cursor is past the last exercise.
    fn from(_: ProgressError) -> Self {
        SessionError::PlanAlreadyComplete
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_not_found_message_names_the_plan_when_known() {
        assert_eq!(
            SessionError::plan_not_found("A").to_string(),
            "plan not found: A"
        );
        assert_eq!(
            SessionError::PlanNotFound { name: None }.to_string(),
            "plan not found"
        );
    }

    #[test]
    fn finished_plan_maps_to_plan_already_complete() {
        assert_eq!(
            SessionError::from(ProgressError::AlreadyComplete),
            SessionError::PlanAlreadyComplete
        );
    }
}
