//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::sync::{CommandOutput, CommandRunner, CopyOutcome, FileCopier, SyncError, SyncOptions};

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic command outcomes without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<CommandOutput>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Pushes a successful exit status with empty output.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32) {
        self.push_output(Some(code), "", "simulated failure");
    }

    /// Pushes a response with no exit code to simulate abnormal termination.
    pub fn push_missing_exit_code(&self) {
        self.push_output(None, "", "");
    }

    /// Pushes an explicit command output response.
    pub fn push_output(
        &self,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        });
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError> {
        self.invocations.borrow_mut().push(CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SyncError::Spawn {
                program: program.to_owned(),
                message: String::from("no scripted response available"),
            })
    }
}

/// Records a single call made through [`RecordingCopier`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CopyCall {
    /// Source file handed to the copier.
    pub source: Utf8PathBuf,
    /// Destination computed by the backup run.
    pub destination: Utf8PathBuf,
    /// Options in effect for the call.
    pub options: SyncOptions,
}

/// Fake [`FileCopier`] that records calls and replays scripted results.
///
/// When the script is exhausted every further call reports
/// [`CopyOutcome::Changed`].
#[derive(Clone, Debug, Default)]
pub struct RecordingCopier {
    results: Rc<RefCell<VecDeque<Result<CopyOutcome, SyncError>>>>,
    calls: Rc<RefCell<Vec<CopyCall>>>,
}

impl RecordingCopier {
    /// Creates a copier with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result for the next call.
    pub fn push_result(&self, result: Result<CopyOutcome, SyncError>) {
        self.results.borrow_mut().push_back(result);
    }

    /// Queues a non-zero rsync exit for the next call.
    pub fn push_failure(&self, code: i32) {
        self.push_result(Err(SyncError::CommandFailure {
            program: String::from("rsync"),
            status: Some(code),
            status_text: code.to_string(),
            stderr: String::from("simulated failure"),
        }));
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CopyCall> {
        self.calls.borrow().clone()
    }
}

impl FileCopier for RecordingCopier {
    fn copy(
        &self,
        source: &Utf8Path,
        destination: &Utf8Path,
        options: SyncOptions,
    ) -> Result<CopyOutcome, SyncError> {
        self.calls.borrow_mut().push(CopyCall {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            options,
        });
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CopyOutcome::Changed))
    }
}
