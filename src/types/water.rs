//! Hydraulic boundary data per location.

/// Water levels governing one location's phreatic line.
///
/// All levels share the vertical datum of the surface lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterLevelSet {
    /// Minimum polder level [m]
    pub polder_min: f64,
    /// Maximum polder level [m]. Parsed and reported but not used by the
    /// phreatic line construction.
    pub polder_max: f64,
    /// Design water level ("toetspeil") on the outer side [m]
    pub design_level: f64,
    /// Head loss ("verschil") between outer and inner crest [m]
    pub head_loss: f64,
    /// Seepage head ("stijghoogte") in the aquifer [m]
    pub seepage_head: f64,
}

/// Join record between a surface line and its water-level records.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// Location id, the key of the water-level shapefiles
    pub id: String,
    /// Id of the surface line measured at this location
    pub surfaceline_id: String,
}
