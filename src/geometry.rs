//! Interfaces to the external levee-geometry engine.
//!
//! Assembling the raw soil polygons from two profiles and a surface line,
//! and serializing the finished geometry file, are the job of an external
//! 2D levee-geometry engine. This module defines the seams that engine has
//! to fill:
//!
//! - [`SectionGeometry`]: read-only queries on an assembled cross-section
//!   (bounding box, ground surface, height lookup, surface intersections)
//! - [`CrossSection`]: the mutating operations the batch driver applies
//!   (top layer, phreatic line) plus polygon export and serialization
//! - [`GeometryEngine`]: the assembly entry point
//!
//! Soil polygons cross the boundary as [`geo::Polygon`] values so the area
//! accounting can use generic polygon algebra.

use std::path::Path;

use geo::Polygon;
use thiserror::Error;

use crate::types::{ProfilePoint, Soil, SoilProfile, SurfaceLine};

/// Error reported by the external geometry engine.
#[derive(Debug, Error)]
#[error("geometry engine: {0}")]
pub struct GeometryError(pub String);

/// One soil polygon of an assembled cross-section.
#[derive(Clone, Debug)]
pub struct SoilPolygon {
    /// Code of the soil filling this polygon
    pub soil_code: String,
    /// The polygon in (x, elevation) coordinates
    pub polygon: Polygon<f64>,
}

/// Read-only geometry queries on an assembled cross-section.
pub trait SectionGeometry {
    /// Left bound of the cross-section [m]
    fn left(&self) -> f64;
    /// Right bound of the cross-section [m]
    fn right(&self) -> f64;
    /// Top of the bounding box [m]
    fn top(&self) -> f64;
    /// Bottom of the bounding box [m]
    fn bottom(&self) -> f64;

    /// Ground surface as an ordered (x, elevation) polyline.
    fn surface(&self) -> &[ProfilePoint];

    /// Ground elevation at `x`.
    fn elevation_at(&self, x: f64) -> f64;

    /// Intersections of the ground surface with a query segment,
    /// ordered by increasing x.
    fn surface_intersections(&self, start: ProfilePoint, end: ProfilePoint) -> Vec<ProfilePoint>;
}

/// The bounding box of a section, captured as plain values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionExtent {
    /// Left bound [m]
    pub left: f64,
    /// Right bound [m]
    pub right: f64,
    /// Top bound [m]
    pub top: f64,
    /// Bottom bound [m]
    pub bottom: f64,
}

impl SectionExtent {
    /// Capture the extent of a section.
    pub fn of<S: SectionGeometry + ?Sized>(section: &S) -> Self {
        Self {
            left: section.left(),
            right: section.right(),
            top: section.top(),
            bottom: section.bottom(),
        }
    }
}

/// Mutating operations and outputs of an assembled cross-section.
pub trait CrossSection: SectionGeometry {
    /// Replace the surface between `x_start` and `x_end` with a layer of
    /// `height` metres of the given soil (the clay cap).
    fn add_top_layer(&mut self, x_start: f64, x_end: f64, height: f64, soil_code: &str);

    /// Attach the phreatic line control points.
    fn add_phreatic_line(&mut self, points: &[ProfilePoint]);

    /// The soil polygons of the current geometry.
    fn soil_polygons(&self) -> Vec<SoilPolygon>;

    /// Write the geometry file.
    fn serialize(&self, path: &Path) -> Result<(), GeometryError>;
}

/// Entry point of the external geometry engine.
pub trait GeometryEngine {
    /// The cross-section type this engine produces.
    type Section: CrossSection;

    /// Assemble a 2D cross-section from the crest and toe profiles and the
    /// ground surface. `x_inner_toe` marks where the crest profile hands
    /// over to the toe profile; `fill_code` names the soil used for the
    /// dike body fill above the profiles.
    fn assemble(
        &self,
        crest_profile: &SoilProfile,
        toe_profile: &SoilProfile,
        surface: &SurfaceLine,
        x_inner_toe: f64,
        soils: &[Soil],
        fill_code: &str,
    ) -> Result<Self::Section, GeometryError>;
}
