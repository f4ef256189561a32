//! External notifier process helpers

use super::DispatchError;
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default bound on how long a notifier process may run
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(10);

/// Find an executable by name on `PATH`
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_env = env::var_os("PATH")?;
    find_in_dirs(program, &path_env)
}

/// Find an executable by name in a `PATH`-style list of directories
pub fn find_in_dirs(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Run a notifier command to completion, bounded by `timeout`
///
/// The child gets no stdin and its stdout is discarded; stderr is kept for
/// the error. On timeout the child is killed when its future is dropped.
pub async fn run_tool(tool: &str, mut cmd: Command, timeout: Duration) -> Result<(), DispatchError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => Err(DispatchError::Exit {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(DispatchError::Unavailable {
            tool: tool.to_string(),
        }),
        Ok(Err(source)) => Err(DispatchError::Spawn {
            tool: tool.to_string(),
            source,
        }),
        Err(_elapsed) => Err(DispatchError::TimedOut {
            tool: tool.to_string(),
            secs: timeout.as_secs(),
        }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_path() {
        assert!(find_in_path("sh").is_some());
        assert!(find_in_path("surely-not-a-notifier-binary").is_none());
    }

    #[tokio::test]
    async fn test_run_tool_success() {
        let cmd = Command::new("true");
        assert!(run_tool("true", cmd, DEFAULT_TOOL_TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_tool_failure_keeps_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo broken >&2; exit 3"]);

        match run_tool("sh", cmd, DEFAULT_TOOL_TIMEOUT).await {
            Err(DispatchError::Exit { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("Expected Exit error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let cmd = Command::new("surely-not-a-notifier-binary");
        let result = run_tool("surely-not-a-notifier-binary", cmd, DEFAULT_TOOL_TIMEOUT).await;
        assert!(matches!(result, Err(DispatchError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_run_tool_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");

        let result = run_tool("sleep", cmd, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(DispatchError::TimedOut { .. })));
    }
}
