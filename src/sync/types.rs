//! Core sync types, the copy seam, and the command runner abstraction.

use std::ffi::OsString;
use std::process::Command;

use camino::Utf8Path;

use crate::sync::SyncError;

/// Result of running an external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code reported by the process, if available.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the exit code equals zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Abstraction over command execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs `program` with the given arguments, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Spawn`] if the command cannot be started.
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError>;
}

/// Real command runner that shells out to the host operating system.
#[derive(Clone, Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| SyncError::Spawn {
                program: program.to_owned(),
                message: err.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Pass-through switches for the synchronisation tool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag mirrors one independent rsync option"
)]
pub struct SyncOptions {
    /// Report what would change without touching the filesystem.
    pub dry_run: bool,
    /// Show rsync's per-item change lines at info level. The lines are always
    /// requested, since they are how metadata-only updates are detected.
    pub itemize_changes: bool,
    /// Compare files by checksum instead of size and modification time.
    pub checksum: bool,
    /// Delete extraneous destination entries after the transfer.
    pub delete_after: bool,
}

impl SyncOptions {
    /// Returns the rsync options for the enabled switches, in a stable order.
    ///
    /// `--itemize-changes` is not included: the syncer always passes it once,
    /// and passing it twice would make rsync list unchanged files too.
    #[must_use]
    pub fn rsync_flags(self) -> Vec<&'static str> {
        [
            (self.dry_run, "--dry-run"),
            (self.checksum, "--checksum"),
            (self.delete_after, "--delete-after"),
        ]
        .into_iter()
        .filter_map(|(enabled, flag)| enabled.then_some(flag))
        .collect()
    }

    /// Returns `true` when the tool's itemized report should be shown to the
    /// operator rather than kept at debug level.
    #[must_use]
    pub const fn reports_changes(self) -> bool {
        self.dry_run || self.itemize_changes
    }
}

/// What a successful copy did to the destination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CopyOutcome {
    /// Content or attributes were (or, under dry-run, would be) updated.
    Changed,
    /// The destination already matched the source.
    Unchanged,
}

/// Narrow interface over the external synchronisation tool.
///
/// The backup run only ever talks to this trait, so it can be exercised with
/// an in-memory fake instead of a real `rsync` process.
pub trait FileCopier {
    /// Copies the single file `source` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the tool cannot be started or reports a
    /// failure for this file.
    fn copy(
        &self,
        source: &Utf8Path,
        destination: &Utf8Path,
        options: SyncOptions,
    ) -> Result<CopyOutcome, SyncError>;
}
