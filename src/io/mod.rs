//! Readers for the tabular and shapefile survey inputs.
//!
//! This module provides:
//! - **Semicolon-separated tables**: the shared format of all CSV inputs
//! - **Surface lines**: cross-section survey polylines as x;y;z triples
//! - **Characteristic points**: named landmarks with sentinel resolution
//! - **Water levels**: three ESRI shapefiles joined per location
//!
//! All readers fail loudly: a malformed record is a load-time error, since
//! the batch cannot run against an incomplete record store.

mod char_points;
mod csv_table;
mod surface_lines;
mod water_levels;

pub use char_points::{read_characteristic_points, CharPointsError};
pub use csv_table::{CsvTable, TableError};
pub use surface_lines::{read_surface_lines, SurfaceLineError};
pub use water_levels::{read_water_levels, ShapeFileNames, WaterLevelError};
