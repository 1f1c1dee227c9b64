//! Domain model (task names, staleness, digests, commands, reports, errors).

pub mod command;
pub mod digest;
pub mod errors;
pub mod report;
pub mod staleness;
pub mod task_name;

pub use command::CommandSpec;
pub use digest::ContentHash;
pub use errors::GenError;
pub use report::{ReportCounts, RunReport, TaskOutcome, TaskReport};
pub use staleness::{StaleReason, Staleness};
pub use task_name::TaskName;
