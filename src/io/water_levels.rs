//! Readers for the water-level shapefiles.
//!
//! Hydraulic boundary data arrives as three ESRI point shapefiles, one per
//! concern, all keyed by a `LOCATIONID` attribute:
//!
//! - polder levels: minimum and maximum polder level per location
//! - seepage heads: aquifer head ("stijghoogte") per location
//! - design levels: design water level ("toetspeil") and the head loss
//!   ("verschil") over the dike body
//!
//! Only the dBASE attribute records are used; the point geometries are the
//! map positions of the locations and play no role here. A location missing
//! from one of the three files gets no [`WaterLevelSet`]; the gap surfaces
//! later as a per-scenario lookup failure rather than a load failure.

use std::collections::HashMap;
use std::path::Path;

use shapefile::dbase::{FieldValue, Record};
use thiserror::Error;
use tracing::warn;

use crate::types::WaterLevelSet;

/// Attribute field names of the water-level shapefiles.
const FIELD_LOCATION: &str = "LOCATIONID";
const FIELD_POLDER_MIN: &str = "MIN_PEIL";
const FIELD_POLDER_MAX: &str = "MAX_PEIL";
const FIELD_SEEPAGE: &str = "STIJGHOOGT";
const FIELD_DESIGN: &str = "TOETSPEIL";
const FIELD_HEAD_LOSS: &str = "VERSCHIL";

/// Base names (without extension) of the three water-level shapefiles.
#[derive(Clone, Debug)]
pub struct ShapeFileNames {
    /// Polder level shapefile
    pub polder_levels: String,
    /// Seepage head shapefile
    pub seepage_heads: String,
    /// Design level shapefile
    pub design_levels: String,
}

impl Default for ShapeFileNames {
    fn default() -> Self {
        Self {
            polder_levels: "locations_peilen".to_string(),
            seepage_heads: "stijghoogteAtLocations".to_string(),
            design_levels: "toetspeil_V1".to_string(),
        }
    }
}

/// Error type for water-level shapefile reading.
#[derive(Debug, Error)]
pub enum WaterLevelError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shapefile parsing error
    #[error("shapefile error in '{file}': {message}")]
    Shapefile {
        /// Offending file (base name)
        file: String,
        /// Underlying shapefile error
        message: String,
    },

    /// A record lacks a required attribute field
    #[error("'{file}' record {index}: missing or non-numeric field '{field}'")]
    MissingField {
        /// Offending file (base name)
        file: String,
        /// Zero-based record index
        index: usize,
        /// Missing attribute field
        field: String,
    },
}

/// Extract a string attribute from a dBASE record.
pub(crate) fn field_string(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(v)) => Some(v.to_string()),
        _ => None,
    }
}

/// Extract a numeric attribute from a dBASE record.
pub(crate) fn field_f64(record: &Record, name: &str) -> Option<f64> {
    match record.get(name)? {
        FieldValue::Numeric(Some(v)) => Some(*v),
        FieldValue::Float(Some(v)) => Some(f64::from(*v)),
        FieldValue::Double(v) => Some(*v),
        FieldValue::Integer(v) => Some(f64::from(*v)),
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read the attribute records of one shapefile.
fn read_records(folder: &Path, name: &str) -> Result<Vec<Record>, WaterLevelError> {
    let path = folder.join(format!("{name}.shp"));
    let mut reader =
        shapefile::Reader::from_path(&path).map_err(|e| WaterLevelError::Shapefile {
            file: name.to_string(),
            message: e.to_string(),
        })?;

    let mut records = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (_shape, record) = result.map_err(|e| WaterLevelError::Shapefile {
            file: name.to_string(),
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Read one attribute table into a per-location map of extracted values.
fn read_keyed<T>(
    folder: &Path,
    name: &str,
    extract: impl Fn(&Record) -> Option<T>,
    fields: &[&str],
) -> Result<HashMap<String, T>, WaterLevelError> {
    let mut map = HashMap::new();
    for (index, record) in read_records(folder, name)?.into_iter().enumerate() {
        let id = field_string(&record, FIELD_LOCATION).ok_or_else(|| {
            WaterLevelError::MissingField {
                file: name.to_string(),
                index,
                field: FIELD_LOCATION.to_string(),
            }
        })?;
        let value = extract(&record).ok_or_else(|| WaterLevelError::MissingField {
            file: name.to_string(),
            index,
            field: fields.join("/"),
        })?;
        map.insert(id, value);
    }
    Ok(map)
}

/// Read and join the three water-level shapefiles.
///
/// Returns one [`WaterLevelSet`] per location that is present in all three
/// files; partially covered locations are dropped with a warning.
pub fn read_water_levels(
    folder: &Path,
    names: &ShapeFileNames,
) -> Result<HashMap<String, WaterLevelSet>, WaterLevelError> {
    let polder = read_keyed(
        folder,
        &names.polder_levels,
        |r| Some((field_f64(r, FIELD_POLDER_MIN)?, field_f64(r, FIELD_POLDER_MAX)?)),
        &[FIELD_POLDER_MIN, FIELD_POLDER_MAX],
    )?;
    let seepage = read_keyed(
        folder,
        &names.seepage_heads,
        |r| field_f64(r, FIELD_SEEPAGE),
        &[FIELD_SEEPAGE],
    )?;
    let design = read_keyed(
        folder,
        &names.design_levels,
        |r| Some((field_f64(r, FIELD_DESIGN)?, field_f64(r, FIELD_HEAD_LOSS)?)),
        &[FIELD_DESIGN, FIELD_HEAD_LOSS],
    )?;

    let mut result = HashMap::new();
    for (id, (polder_min, polder_max)) in &polder {
        match (seepage.get(id), design.get(id)) {
            (Some(&seepage_head), Some(&(design_level, head_loss))) => {
                result.insert(
                    id.clone(),
                    WaterLevelSet {
                        polder_min: *polder_min,
                        polder_max: *polder_max,
                        design_level,
                        head_loss,
                        seepage_head,
                    },
                );
            }
            _ => {
                warn!(
                    location = %id,
                    "location lacks seepage head or design level; no water levels joined"
                );
            }
        }
    }

    for id in seepage.keys().chain(design.keys()) {
        if !polder.contains_key(id) {
            warn!(location = %id, "location has no polder levels; no water levels joined");
        }
    }

    Ok(result)
}
