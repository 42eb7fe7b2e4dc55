#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use exam_core::Clock;

pub use error::ExamError;

pub use sessions::{
    ExamLaunch, ExamPlan, ExamPlanBuilder, ExamService, ExamSession, ExamSummary, Rejection,
    SessionProgress, SessionState, SessionView, SkippedRecord, Transition,
};
