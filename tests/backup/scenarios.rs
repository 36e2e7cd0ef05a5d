//! BDD scenarios for the backup run.

use rstest_bdd_macros::scenario;

use super::test_helpers::{BackupContext, backup_context};

#[scenario(
    path = "tests/features/backup.feature",
    name = "Mirror every listed file under the host directory"
)]
fn scenario_mirror_listed_files(backup_context: BackupContext) {
    let _ = backup_context;
}

#[scenario(
    path = "tests/features/backup.feature",
    name = "Running the backup twice changes nothing the second time"
)]
fn scenario_idempotent_rerun(backup_context: BackupContext) {
    let _ = backup_context;
}

#[scenario(
    path = "tests/features/backup.feature",
    name = "A list of comments backs up nothing"
)]
fn scenario_comment_only_list(backup_context: BackupContext) {
    let _ = backup_context;
}

#[scenario(
    path = "tests/features/backup.feature",
    name = "Inline comments are part of the path"
)]
fn scenario_inline_comment(backup_context: BackupContext) {
    let _ = backup_context;
}

#[scenario(
    path = "tests/features/backup.feature",
    name = "A dry run leaves the mirror untouched"
)]
fn scenario_dry_run(backup_context: BackupContext) {
    let _ = backup_context;
}
