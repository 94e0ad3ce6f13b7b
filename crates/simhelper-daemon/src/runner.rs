//! External command execution
//!
//! [`CommandRunner`] is the seam between SimHelper and the host system. The
//! production [`SystemCommandRunner`] spawns the program with `tokio::process`,
//! buffers stdout and stderr completely, and waits for exit. There is no
//! timeout and no output limit.
//!
//! A program that cannot be started is an `Err(Error::ProcessSpawn)`. A
//! program that runs and exits non-zero is still `Ok`; callers inspect
//! [`CommandOutput::success`] and decide what that means for them.

use std::fmt;
use std::process::Stdio;

use simhelper_core::prelude::*;
use tokio::process::Command;

/// A single external invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Invocation {
    /// Run `program` directly with an argument vector
    Exec { program: String, args: Vec<String> },

    /// Run `script` through `shell -c` (used for pipelines)
    Shell { shell: String, script: String },
}

impl Invocation {
    pub fn exec<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(shell: impl Into<String>, script: impl Into<String>) -> Self {
        Self::Shell {
            shell: shell.into(),
            script: script.into(),
        }
    }

    /// The program that is actually spawned
    pub fn program(&self) -> &str {
        match self {
            Invocation::Exec { program, .. } => program,
            Invocation::Shell { shell, .. } => shell,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Exec { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Invocation::Shell { script, .. } => f.write_str(script),
        }
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl CommandOutput {
    /// Successful exit with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
        }
    }

    /// Non-zero exit with the given stderr and no stdout
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            success: false,
        }
    }

    /// Whether anything at all reached stdout
    pub fn has_output(&self) -> bool {
        !self.stdout.is_empty()
    }
}

/// Runs external programs to completion
#[trait_variant::make(CommandRunner: Send)]
pub trait LocalCommandRunner {
    /// Run the invocation and wait for it to exit
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runner backed by `tokio::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("Running: {}", invocation);

        let mut command = match invocation {
            Invocation::Exec { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
            Invocation::Shell { shell, script } => {
                let mut command = Command::new(shell);
                command.arg("-c").arg(script);
                command
            }
        };

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::process_spawn(invocation.program(), "program not found")
                } else {
                    Error::process_spawn(invocation.program(), e.to_string())
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        trace!("{} stdout: {}", invocation, stdout);
        if !stderr.is_empty() {
            debug!("{} stderr: {}", invocation, stderr.trim_end());
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code: output.status.code(),
            success: output.status.success(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandOutput, CommandRunner, Invocation, SystemCommandRunner};
    use simhelper_core::Error;

    #[test]
    fn test_exec_display_joins_args() {
        let inv = Invocation::exec("/usr/bin/xcrun", ["simctl", "boot", "ABC-123"]);
        assert_eq!(inv.to_string(), "/usr/bin/xcrun simctl boot ABC-123");
        assert_eq!(inv.program(), "/usr/bin/xcrun");
    }

    #[test]
    fn test_shell_display_is_script() {
        let inv = Invocation::shell("/bin/sh", "echo a | cat");
        assert_eq!(inv.to_string(), "echo a | cat");
        assert_eq!(inv.program(), "/bin/sh");
    }

    #[test]
    fn test_has_output_counts_whitespace() {
        assert!(!CommandOutput::ok("").has_output());
        assert!(CommandOutput::ok(" \n\t").has_output());
        assert!(CommandOutput::ok("{}").has_output());
        assert!(!CommandOutput::failed(1, "boom").has_output());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_both_streams() {
        let inv = Invocation::shell("/bin/sh", "printf out; printf err >&2; exit 3");
        let output = SystemCommandRunner.run(&inv).await.unwrap();

        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_passes_args_verbatim() {
        let inv = Invocation::exec("/bin/sh", ["-c", "printf '%s|' \"$@\"", "sh", "a b", "c"]);
        let output = SystemCommandRunner.run(&inv).await.unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "a b|c|");
    }

    #[tokio::test]
    async fn test_system_runner_reports_launch_failure() {
        let inv = Invocation::exec("/definitely/not/a/real/program", ["list"]);
        let err = SystemCommandRunner.run(&inv).await.unwrap_err();

        match err {
            Error::ProcessSpawn { program, .. } => {
                assert_eq!(program, "/definitely/not/a/real/program");
            }
            other => panic!("expected launch failure, got {other:?}"),
        }
    }
}
