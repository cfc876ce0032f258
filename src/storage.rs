use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;

use crate::board::Board;
use crate::error::Error;
use crate::result::Result;

/// Whether a write extends the target file or replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Extend the target file, creating it if absent.
    Append,

    /// Replace the target file's contents.
    Truncate,
}

/// On-disk layout for one board under the output root.
///
/// Holds `<root>/<board>` and guarantees `<root>/<board>/images/` exists.
#[derive(Debug, Clone)]
pub struct Layout {
    base: PathBuf,
}

impl Layout {
    /// Creates `<root>/<board>/images/` with all intermediate directories
    /// and returns the layout. Succeeds if the directories already exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`] when the directories cannot be created,
    /// e.g. on missing permissions or when a path component already exists
    /// as a regular file.
    pub fn create(root: &Path, board: &Board) -> Result<Self> {
        let base = root.join(board.as_str());
        let images = base.join("images");
        std::fs::create_dir_all(&images).map_err(|source| Error::Filesystem {
            path: images.clone(),
            source,
        })?;
        Ok(Self { base })
    }

    /// Path of the board's cumulative thread starter file.
    pub fn thread_list(&self) -> PathBuf {
        self.base.join("thread_list.json")
    }

    /// Path of the per-thread image record file.
    pub fn image_list(&self, board: &Board, thread_no: u64) -> PathBuf {
        self.base
            .join("images")
            .join(format!("{board}-{thread_no}_ImageURLs.json"))
    }
}

/// Writes `records` to `path` as line-delimited JSON, one object per line,
/// in input order.
///
/// All lines are serialized into one buffer and written in a single
/// open/write/close cycle, so concurrent appends from sibling tasks can
/// interleave whole record sets but never partial lines. Nothing is rolled
/// back when a write fails partway.
///
/// # Errors
///
/// Returns [`Error::Serialize`] if a record cannot be serialized and
/// [`Error::Io`] when the underlying write fails.
pub fn write_records<T: Serialize>(path: &Path, records: &[T], mode: WriteMode) -> Result<()> {
    info!("saving {} record(s) to {}", records.len(), path.display());

    let mut buffer = String::new();
    for record in records {
        buffer.push_str(&serde_json::to_string(record)?);
        buffer.push('\n');
    }

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    match mode {
        WriteMode::Append => {
            options.append(true);
        }
        WriteMode::Truncate => {
            options.truncate(true);
        }
    }

    options
        .open(path)
        .and_then(|mut file| file.write_all(buffer.as_bytes()))
        .map_err(|source| {
            error!("error saving records to {}: {source}", path.display());
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        })
}
