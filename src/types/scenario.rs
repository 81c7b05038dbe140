//! Scenario combinations, the units of work of a batch run.

/// One scenario: which profiles and surface line to combine, and the name
/// of the geometry file to produce.
#[derive(Clone, Debug, PartialEq)]
pub struct Combination {
    /// Soil profile at the crest boring
    pub soilprofile_id_crest: String,
    /// Soil profile at the toe boring
    pub soilprofile_id_toe: String,
    /// Surface line of the cross-section
    pub surfaceline_id: String,
    /// Output name of the generated 2D geometry
    pub geometry_name: String,
}

/// Clay-cap thickness configured for one surface line.
///
/// A thickness of zero means no top layer is added.
#[derive(Clone, Debug, PartialEq)]
pub struct SlopeLayer {
    /// Surface line this cap applies to
    pub surfaceline_id: String,
    /// Cap thickness [m]
    pub thickness: f64,
}
