//! CSV persistence for battle history.
//!
//! Header is `time,size_1,size_2,morale_1,morale_2`, one row per record.

use std::path::{Path, PathBuf};

use crate::HistoryRecord;

/// Streams history rows to a CSV file.
pub struct HistoryFileWriter {
    path: PathBuf,
    rows: usize,
    writer: csv::Writer<std::fs::File>,
}

impl HistoryFileWriter {
    /// Create (or truncate) the file. The header goes out with the first row.
    pub fn create(path: impl Into<PathBuf>) -> csv::Result<Self> {
        let path = path.into();
        let writer = csv::Writer::from_path(&path)?;
        Ok(Self {
            path,
            rows: 0,
            writer,
        })
    }

    pub fn write_row(&mut self, record: &HistoryRecord) -> csv::Result<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all(&mut self, history: &[HistoryRecord]) -> csv::Result<()> {
        for record in history {
            self.write_row(record)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write a whole history to `path`.
pub fn write_history_csv(path: &Path, history: &[HistoryRecord]) -> csv::Result<()> {
    let mut writer = HistoryFileWriter::create(path)?;
    writer.write_all(history)?;
    writer.flush()?;
    Ok(())
}

pub fn read_history_csv(path: &Path) -> csv::Result<Vec<HistoryRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}
