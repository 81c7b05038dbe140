//! Generic reader for the semicolon-separated input tables.
//!
//! All tabular inputs share the same shape: one header row, `;` as the
//! delimiter, and a value per column on each following row. Header names are
//! trimmed and spaces are replaced with underscores so that columns can be
//! addressed by a stable identifier.
//!
//! # File Format
//!
//! ```text
//! soilprofile_id;top_level;bottom_level;soil_name
//! PR-1;2.0;-1.0;Klei
//! PR-1;-1.0;-6.0;Veen
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// Error type for table reading and column access.
#[derive(Debug, Error)]
pub enum TableError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File has no header row
    #[error("{path}: file is empty")]
    Empty {
        /// Offending file
        path: String,
    },

    /// A named column does not exist in the header
    #[error("{path}: missing column '{column}'")]
    MissingColumn {
        /// Offending file
        path: String,
        /// Requested column name (normalized)
        column: String,
    },

    /// A cell could not be parsed
    #[error("{path} line {line}: {message}")]
    Parse {
        /// Offending file
        path: String,
        /// One-based line number in the file
        line: usize,
        /// Description of the parse failure
        message: String,
    },
}

/// An in-memory semicolon-separated table.
#[derive(Clone, Debug)]
pub struct CsvTable {
    path: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Read a table from a file.
    pub fn read(path: &Path) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(TableError::Empty { path: display }),
        };

        let columns: Vec<String> = header
            .split(';')
            .map(|s| s.trim().replace(' ', "_"))
            .collect();

        let mut rows = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(line.split(';').map(|s| s.trim().to_string()).collect());
        }

        Ok(Self {
            path: display,
            columns,
            rows,
        })
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Normalized column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    /// Cell value at `row` for a named column.
    pub fn get(&self, row: usize, column: &str) -> Result<&str, TableError> {
        let index = self.column_index(column)?;
        self.rows[row]
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| TableError::Parse {
                path: self.path.clone(),
                line: row + 2,
                message: format!("row has no value for column '{column}'"),
            })
    }

    /// Cell value at `row` for a named column, parsed as `f64`.
    pub fn get_f64(&self, row: usize, column: &str) -> Result<f64, TableError> {
        let value = self.get(row, column)?;
        value.parse().map_err(|_| TableError::Parse {
            path: self.path.clone(),
            line: row + 2,
            message: format!("column '{column}': '{value}' is not a number"),
        })
    }

    /// Raw fields of one row, in file order.
    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    /// Source path, for error messages of callers.
    pub fn path(&self) -> &str {
        &self.path
    }
}
