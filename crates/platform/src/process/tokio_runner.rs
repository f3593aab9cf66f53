//! Process runner backed by `tokio::process`

use async_trait::async_trait;
use debforge_errors::{BuildError, Error, PlatformError};
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{PlatformCommand, ProcessRunner};

/// Runs commands as child processes with inherited stdio
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

enum Outcome {
    Exited(io::Result<ExitStatus>),
    Cancelled,
    TimedOut,
}

impl TokioProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill children still running after `seconds`; `None` waits forever
    #[must_use]
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    fn spawn_error(program: &str, err: &io::Error) -> Error {
        if err.kind() == io::ErrorKind::NotFound {
            PlatformError::CommandNotFound {
                command: program.to_string(),
            }
            .into()
        } else {
            BuildError::ProcessSpawnFailed {
                program: program.to_string(),
                message: err.to_string(),
            }
            .into()
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, cmd: &PlatformCommand, cancel: &CancellationToken) -> Result<i32, Error> {
        let program = cmd.program();

        let mut command = Command::new(program);
        command
            .args(cmd.get_args())
            .envs(cmd.get_envs().iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| Self::spawn_error(program, &e))?;

        let outcome = {
            let deadline = async {
                match self.timeout {
                    Some(limit) => tokio::time::sleep(limit).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                status = child.wait() => Outcome::Exited(status),
                () = cancel.cancelled() => Outcome::Cancelled,
                () = deadline => Outcome::TimedOut,
            }
        };

        match outcome {
            Outcome::Exited(status) => {
                let status = status.map_err(|e| PlatformError::ProcessExecutionFailed {
                    command: program.to_string(),
                    message: e.to_string(),
                })?;
                status.code().ok_or_else(|| {
                    BuildError::TerminatedBySignal {
                        program: program.to_string(),
                    }
                    .into()
                })
            }
            Outcome::Cancelled => {
                let _ = child.kill().await;
                Err(BuildError::Cancelled {
                    program: program.to_string(),
                }
                .into())
            }
            Outcome::TimedOut => {
                let _ = child.kill().await;
                Err(BuildError::Timeout {
                    program: program.to_string(),
                    seconds: self.timeout.map_or(0, |d| d.as_secs()),
                }
                .into())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> PlatformCommand {
        PlatformCommand::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn returns_exit_code() {
        let runner = TokioProcessRunner::new();
        let token = CancellationToken::new();

        assert_eq!(runner.run(&sh("exit 0"), &token).await.unwrap(), 0);
        assert_eq!(runner.run(&sh("exit 3"), &token).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn passes_environment_and_cwd() {
        let temp = tempfile::tempdir().unwrap();
        let cmd = sh(r#"test "$PROJECT_NAME" = hello && test "$(pwd -P)" = "$EXPECTED""#)
            .env("PROJECT_NAME", "hello")
            .env(
                "EXPECTED",
                temp.path().canonicalize().unwrap().display().to_string(),
            )
            .current_dir(temp.path());

        let code = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn missing_program_is_command_not_found() {
        let err = TokioProcessRunner::new()
            .run(
                &PlatformCommand::new("debforge-definitely-missing-tool"),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::CommandNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn cancellation_kills_child() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = TokioProcessRunner::new()
            .run(&sh("sleep 30"), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn timeout_kills_child() {
        let runner = TokioProcessRunner {
            timeout: Some(Duration::from_millis(50)),
        };
        let err = runner
            .run(&sh("sleep 30"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::Timeout { .. })));
    }
}
