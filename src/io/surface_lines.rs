//! Reader for the surface line survey file.
//!
//! Each data row holds one cross-section: the line id followed by the survey
//! points as repeating x;y;z triples, ordered from the water side to the
//! polder side.
//!
//! # File Format
//!
//! ```text
//! LOCATIONID;X1;Y1;Z1;.....;Xn;Yn;Zn
//! DP-180;0.0;100.0;-0.5;12.5;100.1;4.2;40.0;100.0;-0.8
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::types::{SurfaceLine, SurfaceLinePoint};

/// Error type for surface line file parsing.
#[derive(Debug, Error)]
pub enum SurfaceLineError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed data row
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

/// Read all surface lines from a file.
///
/// The header row is skipped; blank lines and a trailing empty field left by
/// a terminating `;` are tolerated.
pub fn read_surface_lines(path: &Path) -> Result<Vec<SurfaceLine>, SurfaceLineError> {
    let display = path.display().to_string();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line_num == 0 || line.trim().is_empty() {
            continue;
        }

        let mut fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.last() == Some(&"") {
            fields.pop();
        }

        let parse = |s: &str, what: &str| -> Result<f64, SurfaceLineError> {
            s.parse().map_err(|_| SurfaceLineError::Parse {
                path: display.clone(),
                line: line_num + 1,
                message: format!("{what}: '{s}' is not a number"),
            })
        };

        if fields.len() < 4 || (fields.len() - 1) % 3 != 0 {
            return Err(SurfaceLineError::Parse {
                path: display.clone(),
                line: line_num + 1,
                message: format!(
                    "expected an id followed by x;y;z triples, got {} fields",
                    fields.len()
                ),
            });
        }

        let id = fields[0].to_string();
        let mut points = Vec::with_capacity((fields.len() - 1) / 3);
        for triple in fields[1..].chunks(3) {
            points.push(SurfaceLinePoint {
                x: parse(triple[0], "x")?,
                y: parse(triple[1], "y")?,
                z: parse(triple[2], "z")?,
            });
        }

        lines.push(SurfaceLine::new(id, points));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read(content: &str) -> Result<Vec<SurfaceLine>, SurfaceLineError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        read_surface_lines(file.path())
    }

    #[test]
    fn test_read_two_lines() {
        let lines = read(
            "LOCATIONID;X1;Y1;Z1\n\
             DP-1;0.0;100.0;-0.5;10.0;100.0;4.0\n\
             DP-2;0.0;200.0;0.0;5.0;200.0;2.0;15.0;200.0;1.0\n",
        )
        .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "DP-1");
        assert_eq!(lines[0].points.len(), 2);
        assert_eq!(lines[1].points.len(), 3);
        assert_eq!(lines[1].points[2].z, 1.0);
    }

    #[test]
    fn test_trailing_semicolon_tolerated() {
        let lines = read("header\nDP-1;0.0;0.0;1.0;\n").unwrap();
        assert_eq!(lines[0].points.len(), 1);
    }

    #[test]
    fn test_incomplete_triple_rejected() {
        let result = read("header\nDP-1;0.0;0.0\n");
        assert!(matches!(result, Err(SurfaceLineError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_bad_number_rejected() {
        let result = read("header\nDP-1;0.0;oops;1.0\n");
        assert!(matches!(result, Err(SurfaceLineError::Parse { .. })));
    }
}
