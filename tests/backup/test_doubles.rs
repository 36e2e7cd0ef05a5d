//! In-process stand-in for rsync.

use std::fs;
use std::io;

use camino::Utf8Path;
use system_file_saver::sync::{CopyOutcome, FileCopier, SyncError, SyncOptions};

/// Copies with `std::fs`, reporting `Unchanged` when the destination already
/// holds identical bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalCopier;

impl FileCopier for LocalCopier {
    fn copy(
        &self,
        source: &Utf8Path,
        destination: &Utf8Path,
        options: SyncOptions,
    ) -> Result<CopyOutcome, SyncError> {
        let contents = fs::read(source).map_err(|err| copy_error(&err))?;
        if fs::read(destination).is_ok_and(|existing| existing == contents) {
            return Ok(CopyOutcome::Unchanged);
        }
        if !options.dry_run {
            fs::write(destination, contents).map_err(|err| copy_error(&err))?;
        }
        Ok(CopyOutcome::Changed)
    }
}

fn copy_error(err: &io::Error) -> SyncError {
    SyncError::Spawn {
        program: String::from("local-copy"),
        message: err.to_string(),
    }
}
