use std::time::Duration;

use thiserror::Error;

/// Failure modes of a bounded external tool invocation.
///
/// None of these are fatal to a run; the pipeline degrades the affected
/// source to whatever partial output exists on disk and moves on.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool is not installed or not on PATH.
    #[error("`{0}` is not available on this system")]
    NotFound(String),

    /// The invocation exceeded its time bound; its process group was killed.
    #[error("`{tool}` timed out after {limit:?}")]
    TimedOut { tool: String, limit: Duration },

    /// The tool exited non-zero or could not be spawned.
    #[error("`{tool}` failed: {reason}")]
    Failed { tool: String, reason: String },
}
