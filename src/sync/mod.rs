//! Single-file rsync invocation behind the [`FileCopier`] seam.
//!
//! Each listed file is copied by one `rsync --archive --stats
//! --itemize-changes` call. The itemized lines and the statistics block tell
//! us whether anything was updated, which lets the backup run distinguish
//! changed entries from ones already up to date.

use std::ffi::OsString;

use camino::Utf8Path;
use shell_escape::unix::escape;
use tracing::{debug, info};

mod error;
mod report;
mod types;

pub use error::SyncError;
pub use report::TransferReport;
pub use types::{
    CommandOutput, CommandRunner, CopyOutcome, FileCopier, ProcessCommandRunner, SyncOptions,
};

/// Default name of the rsync executable.
pub const DEFAULT_RSYNC_BIN: &str = "rsync";

/// Copies files by shelling out to `rsync`.
#[derive(Clone, Debug)]
pub struct Syncer<R: CommandRunner> {
    rsync_bin: String,
    runner: R,
}

impl Syncer<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] when `rsync_bin` is blank.
    pub fn with_process_runner(rsync_bin: impl Into<String>) -> Result<Self, SyncError> {
        Self::new(rsync_bin, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> Syncer<R> {
    /// Creates a new syncer using the provided runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] when `rsync_bin` is blank.
    pub fn new(rsync_bin: impl Into<String>, runner: R) -> Result<Self, SyncError> {
        let program: String = rsync_bin.into();
        if program.trim().is_empty() {
            return Err(SyncError::InvalidConfig {
                field: String::from("rsync_bin"),
            });
        }
        Ok(Self {
            rsync_bin: program,
            runner,
        })
    }

    fn build_rsync_args(
        source: &Utf8Path,
        destination: &Utf8Path,
        options: SyncOptions,
    ) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("--archive"),
            OsString::from("--stats"),
            OsString::from("--itemize-changes"),
        ];
        args.extend(options.rsync_flags().into_iter().map(OsString::from));
        args.push(OsString::from(source));
        args.push(OsString::from(destination));
        args
    }

    fn log_report(report: &TransferReport, options: SyncOptions) {
        for line in &report.itemized {
            if options.reports_changes() {
                info!("{line}");
            } else {
                debug!("{line}");
            }
        }
    }
}

impl<R: CommandRunner> FileCopier for Syncer<R> {
    fn copy(
        &self,
        source: &Utf8Path,
        destination: &Utf8Path,
        options: SyncOptions,
    ) -> Result<CopyOutcome, SyncError> {
        let args = Self::build_rsync_args(source, destination, options);
        debug!(command = %render_command(&self.rsync_bin, &args), "running rsync");

        let output = self.runner.run(&self.rsync_bin, &args)?;
        debug!(stdout = %output.stdout, stderr = %output.stderr, "rsync finished");
        if !output.is_success() {
            let status_text = output
                .code
                .map_or_else(|| String::from("unknown"), |code| code.to_string());
            return Err(SyncError::CommandFailure {
                program: self.rsync_bin.clone(),
                status: output.code,
                status_text,
                stderr: output.stderr.trim_end().to_owned(),
            });
        }

        let report = TransferReport::parse(&output.stdout);
        Self::log_report(&report, options);
        Ok(report.outcome())
    }
}

/// Renders a program invocation as a shell-escaped command line for logs.
#[must_use]
pub fn render_command(program: &str, args: &[OsString]) -> String {
    let mut result = String::from(escape(program.into()));
    for arg in args {
        result.push(' ');
        let lossy = arg.to_string_lossy();
        result.push_str(escape(lossy).as_ref());
    }
    result
}

#[cfg(test)]
mod tests;
