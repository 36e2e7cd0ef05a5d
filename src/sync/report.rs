//! Parsing of the report `rsync --stats` prints on standard output.

use super::types::CopyOutcome;

const STATS_HEADER: &str = "Number of files:";
const TRANSFERRED_PREFIXES: [&str; 2] = [
    "Number of regular files transferred:",
    "Number of files transferred:",
];

/// Summary extracted from one rsync invocation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransferReport {
    /// Itemized change lines printed ahead of the statistics block.
    pub itemized: Vec<String>,
    /// Transferred file count, when the statistics block was present.
    pub files_transferred: Option<u64>,
}

impl TransferReport {
    /// Parses captured standard output.
    ///
    /// Everything before the statistics block that is not blank counts as an
    /// itemized line. Older rsync releases label the transfer counter
    /// `Number of files transferred`; both spellings are accepted and
    /// thousands separators are ignored.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        let mut report = Self::default();
        let mut in_stats = false;

        for line in stdout.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with(STATS_HEADER) {
                in_stats = true;
            }
            if !in_stats {
                if !trimmed.is_empty() {
                    report.itemized.push(trimmed.to_owned());
                }
                continue;
            }
            if let Some(count) = transferred_count(trimmed) {
                report.files_transferred = Some(count);
            }
        }

        report
    }

    /// Classifies the copy.
    ///
    /// Any itemized line means the destination was updated, including
    /// permission or timestamp changes that transfer no data. Otherwise the
    /// transfer counter decides. Without a statistics block the copy is
    /// assumed to have changed the destination.
    #[must_use]
    pub fn outcome(&self) -> CopyOutcome {
        if !self.itemized.is_empty() {
            return CopyOutcome::Changed;
        }
        match self.files_transferred {
            Some(0) => CopyOutcome::Unchanged,
            _ => CopyOutcome::Changed,
        }
    }
}

fn transferred_count(line: &str) -> Option<u64> {
    let value = TRANSFERRED_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))?;
    let digits: String = value
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
