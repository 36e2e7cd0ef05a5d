//! Temporary live-system, backup and home trees shared by the integration
//! tests.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A fake live system, a backup root and a home directory, all temporary.
#[derive(Debug)]
pub struct Sandbox {
    pub system: Utf8PathBuf,
    pub backup: Utf8PathBuf,
    pub home: Utf8PathBuf,
    _system_tmp: TempDir,
    _backup_tmp: TempDir,
    _home_tmp: TempDir,
}

fn utf8_temp_dir(label: &str) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("{label}: {err}"));
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("{label}: non UTF-8 path {}", path.display()));
    (dir, path)
}

impl Sandbox {
    pub fn new() -> Self {
        let (system_tmp, system) = utf8_temp_dir("create system temp directory");
        let (backup_tmp, backup) = utf8_temp_dir("create backup temp directory");
        let (home_tmp, home) = utf8_temp_dir("create home temp directory");
        Self {
            system,
            backup,
            home,
            _system_tmp: system_tmp,
            _backup_tmp: backup_tmp,
            _home_tmp: home_tmp,
        }
    }

    /// Writes `contents` to `relative` under the fake system and returns the
    /// absolute path.
    pub fn write_source(&self, relative: &str, contents: &str) -> Utf8PathBuf {
        let path = self.system.join(relative);
        write_file(&path, contents);
        path
    }

    /// Writes the list file into the home directory and returns its path.
    pub fn write_list(&self, lines: &[String]) -> Utf8PathBuf {
        let path = self.home.join("systemfile_list.txt");
        let mut content = lines.join("\n");
        content.push('\n');
        write_file(&path, &content);
        path
    }

    /// Mirror location of `source` for `hostname`.
    pub fn mirrored(&self, hostname: &str, source: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}/{hostname}{source}", self.backup))
    }
}

pub fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|err| panic!("create parent directories for {path}: {err}"));
    }
    fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

pub fn read_file(path: &Utf8Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}
