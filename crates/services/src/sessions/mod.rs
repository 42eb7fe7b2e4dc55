mod machine;
mod plan;
mod progress;
mod transition;
mod view;
mod workflow;

// Public API of the exam session subsystem.
pub use machine::{ExamSession, SessionState};
pub use plan::{ExamPlan, ExamPlanBuilder};
pub use progress::{ExamSummary, SessionProgress};
pub use transition::{Rejection, Transition};
pub use view::SessionView;
pub use workflow::{ExamLaunch, ExamService, SkippedRecord};
