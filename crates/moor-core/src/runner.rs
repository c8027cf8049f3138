use std::{
    collections::VecDeque,
    io,
    process::Command,
    sync::Mutex,
};

use thiserror::Error;
use tracing::debug;

/// Errors produced when launching external commands.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The child process could not be spawned at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Captured result of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Capability to run external programs (`sudo`, `ssh-keygen`, `ssh`).
///
/// The stores depend on this trait rather than on `std::process` directly so
/// the subprocess boundary can be substituted with a fake in tests. Calls
/// block until the child exits; no timeout is applied.
pub trait CommandRunner {
    /// Run a program to completion, capturing stdout and stderr.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError>;

    /// Run a program wired to the caller's terminal (`ssh`, `sudo` password
    /// prompts). Returns whether the child exited successfully.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<bool, RunnerError>;
}

/// Real implementation over `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        debug!(program, ?args, "running external command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| RunnerError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<bool, RunnerError> {
        debug!(program, ?args, "running interactive command");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RunnerError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(status.success())
    }
}

/// Scripted runner that replays canned outputs in order and records every
/// invocation. Used by store and CLI tests; not cryptographically faithful to
/// any real tool, it only simulates exit status and captured text.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    /// Runner that answers every call with an empty success.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that replays `outputs` in order, then empty successes.
    pub fn with_outputs(outputs: impl IntoIterator<Item = CommandOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation so far, as `[program, arg, arg, ..]` rows.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let mut call = Vec::with_capacity(args.len() + 1);
        call.push(program.to_string());
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.lock().expect("calls lock").push(call);
    }

    fn next_output(&self) -> CommandOutput {
        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| CommandOutput::ok(""))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        self.record(program, args);
        Ok(self.next_output())
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<bool, RunnerError> {
        self.record(program, args);
        Ok(self.next_output().success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_runner_replays_outputs_in_order() {
        let runner = ScriptedRunner::with_outputs([
            CommandOutput::ok("first"),
            CommandOutput::failed("boom"),
        ]);

        let first = runner.run("tool", &["a"]).expect("run");
        assert!(first.success);
        assert_eq!(first.stdout, "first");

        let second = runner.run("tool", &["b"]).expect("run");
        assert!(!second.success);
        assert_eq!(second.stderr, "boom");

        // Exhausted script falls back to empty success.
        let third = runner.run("tool", &[]).expect("run");
        assert!(third.success);
    }

    #[test]
    fn scripted_runner_records_invocations() {
        let runner = ScriptedRunner::new();
        runner.run("sudo", &["cp", "a", "b"]).expect("run");
        runner.run_interactive("ssh", &["web"]).expect("run");

        assert_eq!(
            runner.calls(),
            vec![
                vec!["sudo".to_string(), "cp".into(), "a".into(), "b".into()],
                vec!["ssh".to_string(), "web".into()],
            ]
        );
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let err = SystemRunner
            .run("moor-test-definitely-not-a-program", &[])
            .expect_err("spawn should fail");
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
