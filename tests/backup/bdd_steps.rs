//! BDD step definitions for backing up a file list into a host mirror.

use rstest_bdd_macros::{given, then, when};
use system_file_saver::sync::SyncOptions;
use system_file_saver::{BackupRun, BackupSummary, ListLoader, RunConfiguration};

use super::test_doubles::LocalCopier;
use super::test_helpers::{BackupContext, BackupOutcome};
use crate::sandbox::read_file;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a live system with files \"{first}\" and \"{second}\"")]
fn live_system(mut backup_context: BackupContext, first: String, second: String) -> BackupContext {
    for relative in [first, second] {
        let path = backup_context
            .sandbox
            .write_source(&relative, &format!("contents of {relative}\n"));
        backup_context.sources.push(path);
    }
    backup_context
}

#[given("a backup list naming every file")]
fn list_naming_every_file(mut backup_context: BackupContext) -> BackupContext {
    backup_context.list_lines = backup_context
        .sources
        .iter()
        .map(ToString::to_string)
        .collect();
    backup_context
}

#[given("a backup list with only comments and blank lines")]
fn list_of_comments(mut backup_context: BackupContext) -> BackupContext {
    backup_context.list_lines = vec![
        String::from("# system files for this host"),
        String::new(),
        String::from("   "),
        String::from("#/etc/fstab"),
    ];
    backup_context
}

#[given("the list entry for \"{relative}\" carries an inline comment")]
fn inline_comment(mut backup_context: BackupContext, relative: String) -> BackupContext {
    let target = backup_context.sandbox.system.join(&relative).to_string();
    for line in &mut backup_context.list_lines {
        if *line == target {
            line.push_str(" # keep");
        }
    }
    backup_context
}

#[given("a dry run")]
fn dry_run(mut backup_context: BackupContext) -> BackupContext {
    backup_context.dry_run = true;
    backup_context
}

#[when("I back up the list for host \"{hostname}\"")]
fn back_up(mut backup_context: BackupContext, hostname: String) -> BackupContext {
    let list = backup_context.sandbox.write_list(&backup_context.list_lines);
    let config = RunConfiguration {
        input_file: list,
        target_directory: backup_context.sandbox.backup.clone(),
        hostname,
        options: SyncOptions {
            dry_run: backup_context.dry_run,
            ..SyncOptions::default()
        },
    };

    let result = ListLoader::new(config.input_file.clone())
        .entries()
        .map_err(|err| err.to_string())
        .and_then(|entries| {
            BackupRun::new(config, LocalCopier)
                .execute(entries)
                .map_err(|err| err.to_string())
        });
    backup_context.outcome = Some(match result {
        Ok(summary) => BackupOutcome::Finished(summary),
        Err(message) => BackupOutcome::Failed(message),
    });
    backup_context
}

#[then("the mirror for host \"{hostname}\" contains \"{relative}\"")]
fn mirror_contains(
    backup_context: &BackupContext,
    hostname: String,
    relative: String,
) -> Result<(), StepError> {
    let source = backup_context.sandbox.system.join(&relative);
    let mirrored = backup_context.sandbox.mirrored(&hostname, &source);
    if !mirrored.is_file() {
        return Err(StepError::Assertion(format!("{mirrored} was not created")));
    }
    if read_file(&mirrored) == read_file(&source) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "{mirrored} does not match {source}"
        )))
    }
}

#[then("the mirror for host \"{hostname}\" does not contain \"{relative}\"")]
fn mirror_lacks(
    backup_context: &BackupContext,
    hostname: String,
    relative: String,
) -> Result<(), StepError> {
    let source = backup_context.sandbox.system.join(&relative);
    let mirrored = backup_context.sandbox.mirrored(&hostname, &source);
    if mirrored.exists() {
        Err(StepError::Assertion(format!("{mirrored} should not exist")))
    } else {
        Ok(())
    }
}

#[then("the backup root for host \"{hostname}\" was not created")]
fn root_not_created(backup_context: &BackupContext, hostname: String) -> Result<(), StepError> {
    let root = backup_context.sandbox.backup.join(&hostname);
    if root.exists() {
        Err(StepError::Assertion(format!("{root} should not exist")))
    } else {
        Ok(())
    }
}

#[then("the run attempted \"{attempted}\" entries with \"{failed}\" failures")]
fn run_totals(
    backup_context: &BackupContext,
    attempted: usize,
    failed: usize,
) -> Result<(), StepError> {
    let summary = finished(backup_context)?;
    if summary.attempted == attempted && summary.failures.len() == failed {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {attempted} attempted and {failed} failed, got {summary:?}"
        )))
    }
}

#[then("the last run changed \"{changed}\" entries")]
fn run_changed(backup_context: &BackupContext, changed: usize) -> Result<(), StepError> {
    let summary = finished(backup_context)?;
    if summary.changed == changed {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {changed} changed, got {summary:?}"
        )))
    }
}

#[then("the run exits with code \"{code}\"")]
fn run_exit_code(backup_context: &BackupContext, code: i32) -> Result<(), StepError> {
    let summary = finished(backup_context)?;
    if summary.exit_code() == code {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected exit code {code}, got {}",
            summary.exit_code()
        )))
    }
}

fn finished(backup_context: &BackupContext) -> Result<&BackupSummary, StepError> {
    match backup_context.outcome.as_ref() {
        Some(BackupOutcome::Finished(summary)) => Ok(summary),
        Some(BackupOutcome::Failed(message)) => Err(StepError::Assertion(format!(
            "backup run failed: {message}"
        ))),
        None => Err(StepError::Assertion(String::from("backup was not run"))),
    }
}
