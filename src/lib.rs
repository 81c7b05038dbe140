//! # dam2geom
//!
//! Converts tabular dike-geometry and water-level survey data into
//! per-scenario 2D cross-section geometry input for slope-stability
//! assessment.
//!
//! For each scenario ("combination") the crate:
//! - resolves the crest and toe soil profiles, the surface line, and the
//!   water levels of the joined location ([`store::RecordStore`])
//! - has an external levee-geometry engine assemble the cross-section
//!   ([`geometry::GeometryEngine`])
//! - synthesizes the phreatic line from the characteristic points and water
//!   levels ([`phreatic::build_phreatic_line`])
//! - accounts raw and footprint-limited soil areas
//!   ([`area::compute_soil_areas`])
//! - writes the geometry file, a scenario log, and one row in each of the
//!   two running area tables ([`batch::run_batch`])
//!
//! Assembly of the raw soil polygons and serialization of the geometry file
//! belong to the external engine; this crate defines the traits that engine
//! implements and everything around them.

pub mod area;
pub mod batch;
pub mod geometry;
pub mod interpolate;
pub mod io;
pub mod phreatic;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use area::{compute_soil_areas, Footprint, SoilAreas};
pub use batch::{run_batch, BatchConfig, BatchError, BatchSummary, ScenarioError, ScenarioFailure};
pub use geometry::{
    CrossSection, GeometryEngine, GeometryError, SectionExtent, SectionGeometry, SoilPolygon,
};
pub use interpolate::PiecewiseLinear;
pub use io::ShapeFileNames;
pub use phreatic::{build_phreatic_line, clamp_non_increasing, PhreaticConfig, PhreaticError};
pub use store::{LookupKind, RecordStore, Scenario, StoreError};
pub use types::{
    CharacteristicPoints, Combination, Location, ProfilePoint, SlopeLayer, Soil, SoilProfile,
    SoilProfileError, SoilProfileLayer, SurfaceLine, SurfaceLinePoint, WaterLevelSet,
};
