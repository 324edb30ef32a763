use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Captured result of one shell command. A non-zero exit is
/// still a successful `exec`; callers decide whether to halt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited cleanly with the given
    /// stdout.
    #[must_use]
    pub fn ok(command: &str, stdout: &str) -> Self {
        Self {
            command: command.to_string(),
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Turn a non-zero exit into [`ProvisionError::CommandFailed`],
    /// returning stdout otherwise.
    pub fn check(self) -> ProvisionResult<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ProvisionError::CommandFailed {
                command: self.command,
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Executes shell command lines on the host.
pub trait Runner {
    /// Run `command` to completion, optionally feeding `stdin`,
    /// and capture its output.
    fn exec(&self, command: &str, stdin: Option<&[u8]>) -> ProvisionResult<CommandOutput>;

    /// Run a command, echo it with its captured output, and fail
    /// on a non-zero exit.
    fn run(&self, command: &str) -> ProvisionResult<String> {
        let output = self.exec(command, None)?;
        report(&output);
        output.check()
    }

    /// Like [`Runner::run`] with `input` piped to the command.
    fn run_with_stdin(&self, command: &str, input: &[u8]) -> ProvisionResult<String> {
        let output = self.exec(command, Some(input))?;
        report(&output);
        output.check()
    }
}

/// Runs commands through `sh -c` on the local host.
pub struct Shell;

impl Runner for Shell {
    fn exec(&self, command: &str, stdin: Option<&[u8]>) -> ProvisionResult<CommandOutput> {
        debug!(command, "spawning");

        let mut child = Command::new("sh")
            .args(["-c", command])
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProvisionError::CommandNotFound("sh".to_string())
                } else {
                    ProvisionError::Io(e)
                }
            })?;

        if let (Some(data), Some(pipe)) = (stdin, &mut child.stdin) {
            // The child may exit without draining stdin; its status
            // is what gets reported.
            match pipe.write_all(data) {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(command, "stdin closed early");
                }
                other => other?,
            }
        }
        drop(child.stdin.take());

        let output = child.wait_with_output()?;

        Ok(CommandOutput {
            command: command.to_string(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Prints commands instead of running them. Every command
/// succeeds with empty output.
pub struct DryRun;

impl Runner for DryRun {
    fn exec(&self, command: &str, stdin: Option<&[u8]>) -> ProvisionResult<CommandOutput> {
        eprintln!("[dry-run] {command}");
        if let Some(data) = stdin {
            eprintln!("[dry-run] stdin:\n{}", String::from_utf8_lossy(data));
        }
        Ok(CommandOutput::ok(command, ""))
    }

    fn run(&self, command: &str) -> ProvisionResult<String> {
        self.exec(command, None)?.check()
    }

    fn run_with_stdin(&self, command: &str, input: &[u8]) -> ProvisionResult<String> {
        self.exec(command, Some(input))?.check()
    }
}

/// Single-quote `value` for interpolation into a `sh` command
/// line.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn report(output: &CommandOutput) {
    if output.success() {
        eprintln!("Command succeeded: {}", output.command);
        let stdout = output.stdout.trim_end();
        if !stdout.is_empty() {
            eprintln!("{stdout}");
        }
    } else {
        warn!(command = %output.command, code = ?output.code, "command failed");
        eprintln!("Command failed: {}", output.command);
        eprintln!("{}", output.stderr.trim_end());
    }
}
