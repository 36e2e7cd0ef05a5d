//! Drives one backup run over the entries of a list.
//!
//! Entries are handled one at a time, in list order. A failure scoped to one
//! entry is logged and recorded in the [`BackupSummary`]; only problems with
//! the list itself or the backup root abort the run.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::RunConfiguration;
use crate::list::{ListEntry, ListError};
use crate::mapping::{BackupTarget, MappingError};
use crate::sync::{CopyOutcome, FileCopier, SyncError};

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Raised when the list cannot be read.
    #[error(transparent)]
    List(#[from] ListError),
    /// Raised when the host directory under the backup root cannot be created.
    #[error("failed to create backup root {path}: {message}")]
    CreateRoot {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
}

/// Errors scoped to a single list entry.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EntryError {
    /// The entry could not be mapped into the mirror tree.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// The source file does not exist.
    #[error("{path} is not a valid file: no such file")]
    MissingSource {
        /// Source path.
        path: Utf8PathBuf,
    },
    /// The source is a directory; only files are backed up.
    #[error("{path} is not a valid file: it is a directory")]
    SourceIsDirectory {
        /// Source path.
        path: Utf8PathBuf,
    },
    /// The source could not be inspected.
    #[error("cannot inspect {path}: {message}")]
    Inspect {
        /// Source path.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// A destination directory could not be created.
    #[error("failed to create {path}: {message}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// The copy itself failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// A per-entry failure recorded during the run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryFailure {
    /// 1-based line number of the entry in the list.
    pub line: usize,
    /// Path as listed.
    pub source: Utf8PathBuf,
    /// What went wrong.
    pub error: EntryError,
}

/// Totals for a finished run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BackupSummary {
    /// Entries for which a backup was attempted.
    pub attempted: usize,
    /// Entries whose destination was (or would be) updated.
    pub changed: usize,
    /// Entries whose destination was already up to date.
    pub unchanged: usize,
    /// Entries that failed.
    pub failures: Vec<EntryFailure>,
}

impl BackupSummary {
    /// Returns `true` when no entry failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status for this run: `0` on success, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }

    fn record(&mut self, entry: &ListEntry, result: Result<CopyOutcome, EntryError>) {
        self.attempted += 1;
        match result {
            Ok(CopyOutcome::Changed) => self.changed += 1,
            Ok(CopyOutcome::Unchanged) => self.unchanged += 1,
            Err(err) => self.failures.push(EntryFailure {
                line: entry.line,
                source: entry.path.clone(),
                error: err,
            }),
        }
    }
}

/// Backs up list entries with a [`FileCopier`].
#[derive(Clone, Debug)]
pub struct BackupRun<C: FileCopier> {
    config: RunConfiguration,
    copier: C,
}

impl<C: FileCopier> BackupRun<C> {
    /// Creates a run over `config` using `copier` for each file.
    #[must_use]
    pub const fn new(config: RunConfiguration, copier: C) -> Self {
        Self { config, copier }
    }

    /// Creates `{target_directory}/{hostname}` unless this is a dry run.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::CreateRoot`] when the directory cannot be
    /// created.
    pub fn prepare(&self) -> Result<(), BackupError> {
        let root = self.config.host_root();
        if self.config.options.dry_run {
            debug!(root = %root, "dry run: leaving backup root untouched");
            return Ok(());
        }
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(|err| {
            BackupError::CreateRoot {
                path: root.clone(),
                message: err.to_string(),
            }
        })
    }

    /// Prepares the backup root and backs up every entry in order.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when the backup root cannot be created or the
    /// list cannot be read. Per-entry failures are reported in the summary.
    pub fn execute<I>(&self, entries: I) -> Result<BackupSummary, BackupError>
    where
        I: IntoIterator<Item = Result<ListEntry, ListError>>,
    {
        self.prepare()?;

        let mut summary = BackupSummary::default();
        for entry in entries {
            let current = entry?;
            let result = self.back_up_entry(&current);
            if let Err(err) = &result {
                error!(line = current.line, source = %current.path, "{err}");
            }
            summary.record(&current, result);
        }

        log_summary(&summary, self.config.options.dry_run);
        Ok(summary)
    }

    /// Backs up a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError`] describing why this entry could not be backed
    /// up.
    pub fn back_up_entry(&self, entry: &ListEntry) -> Result<CopyOutcome, EntryError> {
        let target = BackupTarget::new(
            &self.config.target_directory,
            &self.config.hostname,
            &entry.path,
        )?;
        check_source(&target.source)?;

        let options = self.config.options;
        if options.dry_run {
            if !destination_parent_exists(&target.destination) {
                info!(
                    source = %target.source,
                    destination = %target.destination,
                    "dry run: would create"
                );
                return Ok(CopyOutcome::Changed);
            }
        } else {
            Self::create_parent_directories(&target)?;
        }

        debug!(source = %target.source, destination = %target.destination, "backing up");
        let outcome = self
            .copier
            .copy(&target.source, &target.destination, options)?;
        match outcome {
            CopyOutcome::Changed => info!(source = %target.source, "updated"),
            CopyOutcome::Unchanged => debug!(source = %target.source, "unchanged"),
        }
        Ok(outcome)
    }

    fn create_parent_directories(target: &BackupTarget) -> Result<(), EntryError> {
        let Some(parent) = target.destination.parent() else {
            return Ok(());
        };
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|err| {
            EntryError::CreateDirectory {
                path: parent.to_path_buf(),
                message: err.to_string(),
            }
        })
    }
}

fn check_source(source: &Utf8Path) -> Result<(), EntryError> {
    match source.metadata() {
        Ok(metadata) if metadata.is_dir() => Err(EntryError::SourceIsDirectory {
            path: source.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(EntryError::MissingSource {
            path: source.to_path_buf(),
        }),
        Err(err) => Err(EntryError::Inspect {
            path: source.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn destination_parent_exists(destination: &Utf8Path) -> bool {
    destination.parent().is_some_and(Utf8Path::is_dir)
}

fn log_summary(summary: &BackupSummary, dry_run: bool) {
    let failed = summary.failures.len();
    let mode = if dry_run { " (dry run)" } else { "" };
    if failed == 0 {
        info!(
            attempted = summary.attempted,
            changed = summary.changed,
            unchanged = summary.unchanged,
            "backup complete{mode}"
        );
    } else {
        warn!(
            attempted = summary.attempted,
            changed = summary.changed,
            unchanged = summary.unchanged,
            failed,
            "backup finished with failures{mode}"
        );
    }
}
