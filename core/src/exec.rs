//! # Bounded External Tool Execution
//!
//! The enumeration, resolution, and probing tools are opaque subprocesses.
//! Each invocation gets a single bounded attempt: when the timeout expires
//! the tool's entire process group is killed, not just the leading process,
//! so no orphaned children keep running after the pipeline has moved on.
//! Whatever partial output the tool already flushed to disk stays usable.

use std::process::Stdio;
use std::time::Duration;

use ambit_common::error::ToolError;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time;
use tracing::debug;

/// Captured result of a completed tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    /// Whether the tool exited with status zero.
    pub exit_ok: bool,
    /// Everything the tool printed to stdout.
    pub stdout: String,
}

/// Checks PATH for an external tool. Absence is a capability signal, never
/// an error.
pub fn tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// Runs `tool` with `args`, bounded by `limit`.
///
/// The child is placed in its own process group so a timeout can take the
/// whole tree down with it. A non-zero exit is reported through
/// [`ToolOutput::exit_ok`] rather than an error, because most enumeration
/// tools still leave useful partial output behind.
pub async fn run_tool(tool: &str, args: &[&str], limit: Duration) -> Result<ToolOutput, ToolError> {
    if !tool_available(tool) {
        return Err(ToolError::NotFound(tool.to_string()));
    }

    debug!("running `{tool}` with {args:?}, limit {limit:?}");

    let mut command = Command::new(tool);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|e| ToolError::Failed {
        tool: tool.to_string(),
        reason: e.to_string(),
    })?;

    let mut stdout_pipe = child.stdout.take();
    let reader = tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut buf).await;
        }
        buf
    });

    match time::timeout(limit, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = reader.await.unwrap_or_default();
            Ok(ToolOutput {
                exit_ok: status.success(),
                stdout,
            })
        }
        Ok(Err(e)) => Err(ToolError::Failed {
            tool: tool.to_string(),
            reason: e.to_string(),
        }),
        Err(_elapsed) => {
            kill_process_group(&mut child).await;
            reader.abort();
            Err(ToolError::TimedOut {
                tool: tool.to_string(),
                limit,
            })
        }
    }
}

/// Terminates the child's whole process group, then reaps the child.
async fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child was spawned as its own group leader, so its pid is the
        // process group id.
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }

    #[cfg(not(unix))]
    let _ = child.start_kill();

    let _ = child.wait().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_of_quick_commands() {
        let output = run_tool("sh", &["-c", "echo hello"], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(output.exit_ok);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn reports_non_zero_exit_without_error() {
        let output = run_tool("sh", &["-c", "exit 3"], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!output.exit_ok);
    }

    #[tokio::test]
    async fn kills_the_process_group_on_timeout() {
        let err = run_tool("sh", &["-c", "sleep 30"], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn missing_tool_is_unavailable_not_fatal() {
        let err = run_tool("definitely-not-a-real-tool", &[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
