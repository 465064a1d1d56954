//! Chapter roster CSV import used to seed the member directory.
//!
//! The membership system exports one roster per chapter. Rows carry the
//! member's id, display name, chapter, program role, tutor flag, and an
//! optional per-tutor active engagement limit. Duplicate member ids keep
//! the last row; unrecognized role or limit text falls back to defaults
//! instead of failing the import.

mod mapping;
mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::workflows::tutoring::directory::MemberRecord;
use crate::workflows::tutoring::domain::MemberId;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, message: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { line, message } => {
                write!(f, "invalid roster row at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MemberRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<MemberRecord>, RosterImportError> {
        let mut records: BTreeMap<MemberId, MemberRecord> = BTreeMap::new();

        // Header occupies line 1; data rows start at 2.
        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let record = mapping::member_from_row(row, index + 2)?;
            records.insert(record.member_id.clone(), record);
        }

        Ok(records.into_values().collect())
    }
}
