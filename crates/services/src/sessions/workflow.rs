use std::sync::Arc;

use lift_core::model::{PlanProgress, SessionId};

use super::directory::SessionDirectory;
use super::plan::PlanInstantiator;
use super::view::{AdvanceView, CardView, LandingView};
use crate::Clock;
use crate::accounts::{AuthGate, SharedUser};
use crate::catalog::PlanCatalog;
use crate::error::SessionError;
use crate::lock;

/// Orchestrates login, plan activation and card progression for sessions.
///
/// Every call that touches a user holds that user's lock for its whole
/// duration, so two requests on the same session cannot interleave.
#[derive(Clone)]
pub struct PlanLoopService {
    clock: Clock,
    catalog: Arc<PlanCatalog>,
    auth: AuthGate,
    sessions: Arc<SessionDirectory>,
}

impl PlanLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<PlanCatalog>,
        auth: AuthGate,
        sessions: Arc<SessionDirectory>,
    ) -> Self {
        Self {
            clock,
            catalog,
            auth,
            sessions,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    fn user(&self, session: &SessionId) -> Result<SharedUser, SessionError> {
        self.sessions
            .resolve(session)
            .ok_or(SessionError::NoActiveSession)
    }

    /// Authenticate and bind a freshly generated session id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Auth` if the credentials are rejected.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionId, SessionError> {
        let session = SessionId::generate();
        self.login_with(session.clone(), username, password)?;
        Ok(session)
    }

    /// Authenticate and bind a caller-chosen session id, replacing any earlier binding.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Auth` if the credentials are rejected.
    pub fn login_with(
        &self,
        session: SessionId,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let user = self.auth.authenticate(username, password).map_err(|err| {
            tracing::warn!(%username, %err, "login refused");
            err
        })?;
        self.sessions.bind(session, user);
        tracing::info!(%username, "logged in");
        Ok(())
    }

    /// Landing page model. An unknown or missing session yields an anonymous view.
    #[must_use]
    pub fn landing(&self, session: Option<&SessionId>) -> LandingView {
        match session.and_then(|id| self.sessions.resolve(id)) {
            Some(user) => {
                let guard = lock(&user);
                LandingView::new(Some(&*guard), &self.catalog)
            }
            None => LandingView::new(None, &self.catalog),
        }
    }

    /// Start `plan` for the session's user, discarding whatever plan was active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` for an unbound session and
    /// `SessionError::PlanNotFound` for an unknown plan name.
    pub fn activate(&self, session: &SessionId, plan: &str) -> Result<CardView, SessionError> {
        let user = self.user(session)?;
        let instance = PlanInstantiator::instantiate_named(&self.catalog, plan)?;

        let mut guard = lock(&user);
        let username = guard.username().clone();
        let active = &*guard.install(instance);
        tracing::info!(
            %username,
            plan = active.name(),
            exercises = active.len(),
            "plan activated"
        );
        Ok(CardView::current(active, active.current()?))
    }

    /// The card under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`, `PlanNotActive`, or `PlanAlreadyComplete`.
    pub fn current(&self, session: &SessionId) -> Result<CardView, SessionError> {
        let user = self.user(session)?;
        let guard = lock(&user);
        let plan = guard.active_plan().ok_or(SessionError::PlanNotActive)?;
        Ok(CardView::current(plan, plan.current()?))
    }

    /// Finish the current exercise and move on.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`, `PlanNotActive`, or `PlanAlreadyComplete`; a
    /// rejected call leaves the plan unchanged.
    pub fn advance(&self, session: &SessionId) -> Result<AdvanceView, SessionError> {
        let user = self.user(session)?;
        let mut guard = lock(&user);
        let plan = guard.active_plan_mut().ok_or(SessionError::PlanNotActive)?;
        let result = plan.advance(self.clock.now())?;
        let view = AdvanceView::new(plan, &result);

        if view.is_complete() {
            tracing::info!(plan = %view.card.plan, username = %guard.username(), "plan complete");
        } else {
            tracing::debug!(
                plan = %view.card.plan,
                position = view.card.position,
                exercise = %view.card.exercise,
                "advanced"
            );
        }
        Ok(view)
    }

    /// Record the weight used for the current exercise.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`, `PlanNotActive`, or `PlanAlreadyComplete`.
    pub fn record_weight(&self, session: &SessionId, weight: u32) -> Result<CardView, SessionError> {
        let user = self.user(session)?;
        let mut guard = lock(&user);
        let plan = guard.active_plan_mut().ok_or(SessionError::PlanNotActive)?;
        plan.record_weight(weight)?;
        let plan = &*plan;
        Ok(CardView::current(plan, plan.current()?))
    }

    /// Progress through the active plan.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` or `PlanNotActive`.
    pub fn progress(&self, session: &SessionId) -> Result<PlanProgress, SessionError> {
        let user = self.user(session)?;
        let guard = lock(&user);
        guard
            .active_plan()
            .map(|plan| plan.progress())
            .ok_or(SessionError::PlanNotActive)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::UserDirectory;
    use crate::error::AuthFailure;
    use lift_core::model::{ExerciseTemplate, PlanSchema};
    use lift_core::time::fixed_clock;

    fn schema(name: &str, exercises: &[&str]) -> PlanSchema {
        PlanSchema::new(
            name,
            exercises
                .iter()
                .map(|e| ExerciseTemplate::new(*e, 3, 5).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn service() -> PlanLoopService {
        let catalog: PlanCatalog = [
            schema("A", &["squat", "press"]),
            schema("B", &["deadlift", "bench", "row"]),
        ]
        .into_iter()
        .collect();
        PlanLoopService::new(
            fixed_clock(),
            Arc::new(catalog),
            AuthGate::new(Arc::new(UserDirectory::seeded())),
            Arc::new(SessionDirectory::new()),
        )
    }

    #[test]
    fn requests_without_session_are_rejected() {
        let svc = service();
        let ghost = SessionId::new("ghost");

        assert_eq!(svc.activate(&ghost, "A").unwrap_err(), SessionError::NoActiveSession);
        assert_eq!(svc.current(&ghost).unwrap_err(), SessionError::NoActiveSession);
        assert_eq!(svc.advance(&ghost).unwrap_err(), SessionError::NoActiveSession);
        assert_eq!(svc.progress(&ghost).unwrap_err(), SessionError::NoActiveSession);
    }

    #[test]
    fn bad_login_binds_nothing() {
        let svc = service();
        let session = SessionId::new("s");

        let err = svc.login_with(session.clone(), "jake", "wrong").unwrap_err();
        assert_eq!(err, SessionError::Auth(AuthFailure::BadCredentials));
        assert_eq!(svc.current(&session).unwrap_err(), SessionError::NoActiveSession);
    }

    #[test]
    fn card_requests_before_activation_need_a_plan() {
        let svc = service();
        let session = svc.login("alice", "a").unwrap();

        assert_eq!(svc.current(&session).unwrap_err(), SessionError::PlanNotActive);
        assert_eq!(svc.advance(&session).unwrap_err(), SessionError::PlanNotActive);
        assert_eq!(
            svc.record_weight(&session, 20).unwrap_err(),
            SessionError::PlanNotActive
        );
    }

    #[test]
    fn unknown_plan_leaves_existing_plan_in_place() {
        let svc = service();
        let session = svc.login("bob", "b").unwrap();
        svc.activate(&session, "A").unwrap();
        svc.advance(&session).unwrap();

        let err = svc.activate(&session, "nonexistent").unwrap_err();
        assert_eq!(
            err,
            SessionError::PlanNotFound {
                name: Some("nonexistent".into())
            }
        );
        assert_eq!(svc.current(&session).unwrap().exercise, "press");
    }

    #[test]
    fn weight_is_refused_once_the_plan_is_finished() {
        let svc = service();
        let session = svc.login("jake", "j").unwrap();
        svc.activate(&session, "A").unwrap();
        svc.record_weight(&session, 60).unwrap();
        svc.advance(&session).unwrap();
        assert!(svc.advance(&session).unwrap().is_complete());

        assert_eq!(
            svc.record_weight(&session, 50).unwrap_err(),
            SessionError::PlanAlreadyComplete
        );
        let progress = svc.progress(&session).unwrap();
        assert!(progress.is_complete);
        assert_eq!(progress.completed, 2);
    }

    #[test]
    fn reactivation_starts_over() {
        let svc = service();
        let session = svc.login("charlie", "c").unwrap();
        svc.activate(&session, "A").unwrap();
        svc.advance(&session).unwrap();
        svc.advance(&session).unwrap();

        let card = svc.activate(&session, "B").unwrap();
        assert_eq!(card.plan, "B");
        assert_eq!(card.position, 1);
        assert_eq!(card.total, 3);
        assert_eq!(card.exercise, "deadlift");
    }

    #[test]
    fn weight_is_carried_on_the_card() {
        let svc = service();
        let session = svc.login("jake", "j").unwrap();
        svc.activate(&session, "A").unwrap();

        let card = svc.record_weight(&session, 100).unwrap();
        assert_eq!(card.exercise, "squat");
        assert_eq!(card.weight, 100);

        let next = svc.advance(&session).unwrap();
        assert_eq!(next.card.exercise, "press");
        assert_eq!(next.card.weight, 0);
        assert_eq!(next.card.position, 2);
    }

    #[test]
    fn landing_lists_plans_and_progress() {
        let svc = service();
        let anonymous = svc.landing(None);
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.plans, ["A", "B"]);

        let session = svc.login("jake", "j").unwrap();
        svc.activate(&session, "B").unwrap();
        svc.advance(&session).unwrap();

        let landing = svc.landing(Some(&session));
        assert_eq!(landing.username.as_deref(), Some("jake"));
        assert_eq!(landing.active_plan.as_deref(), Some("B"));
        assert_eq!(landing.progress.unwrap().completed, 1);
    }

    #[test]
    fn sessions_of_one_user_share_progress() {
        let svc = service();
        let laptop = svc.login("alice", "a").unwrap();
        let phone = svc.login("alice", "a").unwrap();
        assert_ne!(laptop, phone);

        svc.activate(&laptop, "A").unwrap();
        svc.advance(&phone).unwrap();

        assert_eq!(svc.current(&laptop).unwrap().exercise, "press");
    }
}
