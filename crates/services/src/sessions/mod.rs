mod directory;
mod plan;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use directory::SessionDirectory;
pub use plan::PlanInstantiator;
pub use view::{AdvanceStatus, AdvanceView, CardView, LandingView};
pub use workflow::PlanLoopService;
