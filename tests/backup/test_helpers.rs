//! Shared fixtures for backup BDD scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::fixture;
use system_file_saver::BackupSummary;

use crate::sandbox::Sandbox;

#[derive(Clone, Debug)]
pub enum BackupOutcome {
    Finished(BackupSummary),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct BackupContext {
    pub sandbox: Arc<Sandbox>,
    pub sources: Vec<Utf8PathBuf>,
    pub list_lines: Vec<String>,
    pub dry_run: bool,
    pub outcome: Option<BackupOutcome>,
}

#[fixture]
pub fn backup_context() -> BackupContext {
    BackupContext {
        sandbox: Arc::new(Sandbox::new()),
        sources: Vec::new(),
        list_lines: Vec::new(),
        dry_run: false,
        outcome: None,
    }
}
