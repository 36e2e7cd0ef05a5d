//! Command-line interface definitions for the `sfs` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page. It
//! must only depend on `clap`.

use clap::{ArgAction, Parser, ValueEnum};

/// Top-level CLI for the `sfs` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sfs",
    version,
    about = "Back up individual system files into a per-host mirror tree",
    long_about = "Reads a list of absolute file paths and copies each file with rsync into \
                  TARGET_DIRECTORY/HOSTNAME/, preserving the original path so the files can \
                  be restored to their locations later."
)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each boolean maps one-to-one onto an independent command-line switch"
)]
pub(crate) struct Cli {
    /// Input file containing a list of files to back up, one per line
    /// [default: ~/.systemfiles/systemfile_list.txt].
    #[arg(short = 'f', long, value_name = "PATH")]
    pub(crate) input_file: Option<String>,
    /// Target folder for saving system files [default: ~/.systemfiles/].
    #[arg(short = 't', long, value_name = "DIR")]
    pub(crate) target_directory: Option<String>,
    /// Files are saved in TARGET_DIRECTORY/HOSTNAME/ [default: the system
    /// hostname].
    #[arg(short = 'o', long, value_name = "NAME")]
    pub(crate) hostname: Option<String>,
    /// Run rsync with --dry-run; nothing is written to disk.
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Show rsync's itemized changes for every updated file.
    #[arg(long)]
    pub(crate) itemize_changes: bool,
    /// Run rsync with --checksum.
    #[arg(long)]
    pub(crate) checksum: bool,
    /// Run rsync with --delete-after.
    #[arg(long)]
    pub(crate) delete_after: bool,
    /// Logging verbosity.
    #[arg(long, value_enum, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub(crate) log_level: LogLevel,
    /// Print extra status messages (same as --log-level debug).
    #[arg(short = 'v', long, action = ArgAction::SetTrue, conflicts_with = "quiet")]
    pub(crate) verbose: bool,
    /// Only print errors (same as --log-level error).
    #[arg(short = 'q', long, action = ArgAction::SetTrue)]
    pub(crate) quiet: bool,
}

/// Log levels accepted by `--log-level`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum LogLevel {
    /// Failures only.
    Error,
    /// Failures and warnings.
    Warn,
    /// Per-file progress and the run summary.
    Info,
    /// Rendered rsync command lines and raw output.
    Debug,
    /// Everything.
    Trace,
}

impl Cli {
    /// Returns the effective log level after applying `-v` and `-q`.
    #[must_use]
    pub(crate) const fn effective_log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}
