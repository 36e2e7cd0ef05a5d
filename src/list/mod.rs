//! Loading of the newline-delimited backup list.
//!
//! One path per line. Blank lines and lines whose first character is `#` are
//! skipped; every other line is emitted verbatim, so a `#` later in the line
//! is part of the path. Nothing here checks whether a path exists.

use std::io::{self, BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::File};
use thiserror::Error;

/// Errors raised while reading the list file. All of them are fatal.
#[derive(Debug, Error)]
pub enum ListError {
    /// Raised when the list file does not exist.
    #[error("input file list not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// Raised when the list file cannot be opened or read.
    #[error("failed to read input file list {path}: {message}")]
    Io {
        /// Path of the list file.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
}

/// One non-ignored line of the list file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListEntry {
    /// 1-based line number in the list file.
    pub line: usize,
    /// Path exactly as written on that line.
    pub path: Utf8PathBuf,
}

/// Returns the path carried by `line`, or `None` when the line is ignored.
#[must_use]
pub fn parse_line(line: &str) -> Option<&Utf8Path> {
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }
    Some(Utf8Path::new(line))
}

/// Handle on a list file. Each call to [`ListLoader::entries`] re-reads the
/// file from the beginning.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListLoader {
    path: Utf8PathBuf,
}

impl ListLoader {
    /// Creates a loader for the list stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the list file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Opens the list and returns a lazy iterator over its entries.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotFound`] when the file is missing and
    /// [`ListError::Io`] when it cannot be opened.
    pub fn entries(&self) -> Result<Entries<BufReader<File>>, ListError> {
        let file = self.open()?;
        Ok(Entries::new(self.path.clone(), BufReader::new(file)))
    }

    /// Reads the whole list eagerly.
    ///
    /// # Errors
    ///
    /// Returns the first [`ListError`] hit while opening or reading.
    pub fn load(&self) -> Result<Vec<ListEntry>, ListError> {
        self.entries()?.collect()
    }

    fn open(&self) -> Result<File, ListError> {
        let file = File::open_ambient(&self.path, ambient_authority())
            .map_err(|err| self.map_open_error(&err))?;
        let metadata = file.metadata().map_err(|err| self.map_open_error(&err))?;
        if metadata.is_dir() {
            return Err(ListError::Io {
                path: self.path.clone(),
                message: String::from("is a directory"),
            });
        }
        Ok(file)
    }

    fn map_open_error(&self, err: &io::Error) -> ListError {
        if err.kind() == io::ErrorKind::NotFound {
            ListError::NotFound {
                path: self.path.clone(),
            }
        } else {
            ListError::Io {
                path: self.path.clone(),
                message: err.to_string(),
            }
        }
    }
}

/// Lazy iterator over the entries of a list.
///
/// Yields an error at most once; iteration stops after the first failure.
#[derive(Debug)]
pub struct Entries<R> {
    path: Utf8PathBuf,
    reader: R,
    line: usize,
    buffer: String,
    failed: bool,
}

impl<R: BufRead> Entries<R> {
    /// Wraps an already-open reader. `path` is only used in error messages.
    pub fn new(path: impl Into<Utf8PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            reader,
            line: 0,
            buffer: String::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for Entries<R> {
    type Item = Result<ListEntry, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    self.failed = true;
                    return Some(Err(ListError::Io {
                        path: self.path.clone(),
                        message: format!("line {}: {err}", self.line + 1),
                    }));
                }
            }
            self.line += 1;

            let content = strip_line_ending(&self.buffer);
            if let Some(path) = parse_line(content) {
                return Some(Ok(ListEntry {
                    line: self.line,
                    path: path.to_path_buf(),
                }));
            }
        }
    }
}

fn strip_line_ending(line: &str) -> &str {
    let without_lf = line.strip_suffix('\n').unwrap_or(line);
    without_lf.strip_suffix('\r').unwrap_or(without_lf)
}
