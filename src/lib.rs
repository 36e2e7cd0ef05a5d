//! Core library for the System File Saver.
//!
//! A backup list names individual files on the live system. Each one is
//! copied with `rsync` to `{target_directory}/{hostname}/{path}`, so the
//! mirror tree records exactly where every file has to be restored to.

pub mod backup;
pub mod config;
pub mod host;
pub mod list;
pub mod mapping;
pub mod sync;
pub mod test_support;

pub use backup::{BackupError, BackupRun, BackupSummary, EntryError, EntryFailure};
pub use config::{ConfigError, ConfigOverrides, HostEnvironment, RunConfiguration, SaverConfig};
pub use host::{HostError, locate_program, system_hostname};
pub use list::{ListEntry, ListError, ListLoader};
pub use mapping::{BackupTarget, MappingError, destination_for};
pub use sync::{
    CommandOutput, CommandRunner, CopyOutcome, FileCopier, ProcessCommandRunner, SyncError,
    SyncOptions, Syncer,
};
