use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of an external process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,

    /// Exit code, if the process was not terminated by a signal
    pub code: Option<i32>,

    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output carrying the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output carrying the given stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Human-readable reason for a failed run: trimmed stderr, or the exit status
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }

        match self.code {
            Some(code) => format!("process exited with status {}", code),
            None => "process terminated by signal".to_string(),
        }
    }
}

/// Launches external tools with explicit argument lists
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;

    /// Look up `program` on the search path
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Runner backed by `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        tracing::debug!("Running {} {:?}", program, args);

        // stdin stays null: our own stdin is the protocol transport
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_detail_prefers_stderr() {
        let output = CommandOutput::failed(1, "  ERROR: Unsupported URL\n");
        assert_eq!(output.failure_detail(), "ERROR: Unsupported URL");
    }

    #[test]
    fn test_failure_detail_falls_back_to_status() {
        let output = CommandOutput::failed(2, "");
        assert_eq!(output.failure_detail(), "process exited with status 2");

        let killed = CommandOutput {
            success: false,
            code: None,
            ..Default::default()
        };
        assert_eq!(killed.failure_detail(), "process terminated by signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tokio_runner_captures_stdout() {
        let runner = TokioCommandRunner::new();
        let output = runner
            .run("echo", &["hello".to_string()])
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_tokio_runner_reports_missing_program() {
        let runner = TokioCommandRunner::new();
        assert!(runner.locate("definitely-not-a-real-tool-4c1d").is_none());
        assert!(runner
            .run("definitely-not-a-real-tool-4c1d", &[])
            .await
            .is_err());
    }
}
