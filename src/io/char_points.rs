//! Reader for the characteristic points table.
//!
//! The input format marks an absent landmark with the sentinel value −9999.
//! That sentinel is resolved here, at the parse boundary: optional landmarks
//! (berm and ditch edges) come out as `Option<f64>`, and a sentinel on a
//! required landmark is an error.

use std::path::Path;

use thiserror::Error;

use super::csv_table::{CsvTable, TableError};
use crate::types::CharacteristicPoints;

/// Sentinel marking an undefined landmark in the input format.
const X_UNDEFINED: f64 = -9999.0;

/// Column names of the characteristic points table.
const COL_LOCATION: &str = "LOCATIONID";
const COL_OUTER_TOE: &str = "X_Teen_dijk_buitenwaarts";
const COL_OUTER_CREST: &str = "X_Kruin_buitentalud";
const COL_INNER_CREST: &str = "X_Kruin_binnentalud";
const COL_INNER_BERM: &str = "X_Insteek_binnenberm";
const COL_INNER_TOE: &str = "X_Teen_dijk_binnenwaarts";
const COL_DITCH_DIKE: &str = "X_Insteek_sloot_dijkzijde";
const COL_DITCH_POLDER: &str = "X_Insteek_sloot_polderzijde";

/// Error type for characteristic point parsing.
#[derive(Debug, Error)]
pub enum CharPointsError {
    /// Underlying table error
    #[error(transparent)]
    Table(#[from] TableError),

    /// A required landmark carries the undefined sentinel
    #[error("characteristic point '{column}' of '{id}' is undefined")]
    RequiredUndefined {
        /// Surface line id the row belongs to
        id: String,
        /// Column of the required landmark
        column: String,
    },
}

fn is_undefined(x: f64) -> bool {
    // The sentinel is written verbatim by the survey export; half a metre of
    // slack guards against formatting noise without colliding with real
    // chainage values.
    (x - X_UNDEFINED).abs() < 0.5
}

/// Read characteristic points, keyed by the surface line id they attach to.
pub fn read_characteristic_points(
    path: &Path,
) -> Result<Vec<(String, CharacteristicPoints)>, CharPointsError> {
    let table = CsvTable::read(path)?;

    let mut result = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let id = table.get(row, COL_LOCATION)?.to_string();

        let required = |column: &str| -> Result<f64, CharPointsError> {
            let x = table.get_f64(row, column)?;
            if is_undefined(x) {
                return Err(CharPointsError::RequiredUndefined {
                    id: id.clone(),
                    column: column.to_string(),
                });
            }
            Ok(x)
        };
        let optional = |column: &str| -> Result<Option<f64>, CharPointsError> {
            let x = table.get_f64(row, column)?;
            Ok(if is_undefined(x) { None } else { Some(x) })
        };

        let points = CharacteristicPoints {
            x_outer_toe: required(COL_OUTER_TOE)?,
            x_outer_crest: required(COL_OUTER_CREST)?,
            x_inner_crest: required(COL_INNER_CREST)?,
            x_inner_berm_edge: optional(COL_INNER_BERM)?,
            x_inner_toe: required(COL_INNER_TOE)?,
            x_ditch_edge_dike_side: optional(COL_DITCH_DIKE)?,
            x_ditch_edge_polder_side: optional(COL_DITCH_POLDER)?,
        };

        result.push((id, points));
    }

    Ok(result)
}
