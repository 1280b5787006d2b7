//! CSV archiving functionality
//!
//! An `Archiver` writes one serialisable record per row into a CSV file in the
//! session's archive directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::{Path, PathBuf};
use std::fs::File;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    path: PathBuf,
    writer: Writer<File>,
    num_records: usize
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file {0:?}: {1}")]
    CannotCreateFile(PathBuf, std::io::Error),

    #[error("Cannot write a record to {0:?}: {1}")]
    CannotWriteRecord(PathBuf, csv::Error),

    #[error("Cannot flush the archive {0:?}: {1}")]
    CannotFlush(PathBuf, std::io::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        Self::from_file_path(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, truncating any
    /// existing content.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();

        let file = File::create(&path)
            .map_err(|e| ArchiveError::CannotCreateFile(path.clone(), e))?;

        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            path,
            writer,
            num_records: 0
        })
    }

    /// Serialise every record from an iterator, flushing once at the end.
    ///
    /// The header row is taken from the field names of the first record.
    pub fn serialise_all<T, I>(&mut self, records: I) -> Result<(), ArchiveError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>
    {
        for record in records {
            self.writer
                .serialize(record)
                .map_err(|e| ArchiveError::CannotWriteRecord(self.path.clone(), e))?;
            self.num_records += 1;
        }

        self.writer
            .flush()
            .map_err(|e| ArchiveError::CannotFlush(self.path.clone(), e))
    }

    /// The path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    pub fn num_records(&self) -> usize {
        self.num_records
    }
}
