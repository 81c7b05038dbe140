//! Ground-surface polylines and their characteristic points.
//!
//! A [`SurfaceLine`] is the measured ground surface of one dike
//! cross-section, a polyline of (x, y, z) survey points ordered from the
//! water side to the polder side. The builder only needs the projected
//! (x, elevation) form, obtained with [`SurfaceLine::profile`].
//!
//! [`CharacteristicPoints`] are the named x-positions along that line
//! (toes, crests, berm, ditch edges). The berm and ditch landmarks are
//! optional per cross-section and carried as `Option<f64>`; the −9999
//! sentinel of the input format never leaves the reader.

/// A point in the projected (x, elevation) plane of a cross-section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfilePoint {
    /// Horizontal position along the cross-section [m]
    pub x: f64,
    /// Elevation [m, vertical datum]
    pub z: f64,
}

impl ProfilePoint {
    /// Create a new profile point.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// A surveyed 3D point on a surface line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLinePoint {
    /// Position along the cross-section [m]
    pub x: f64,
    /// Position along the dike axis [m]
    pub y: f64,
    /// Elevation [m, vertical datum]
    pub z: f64,
}

/// Named x-positions along one surface line.
///
/// The required landmarks exist for every cross-section; berm and ditch
/// landmarks are `None` when the cross-section has no berm or ditch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacteristicPoints {
    /// Outer (water side) toe of the dike
    pub x_outer_toe: f64,
    /// Outer edge of the crest
    pub x_outer_crest: f64,
    /// Inner (polder side) edge of the crest
    pub x_inner_crest: f64,
    /// Outer edge of the inner berm, if a berm exists
    pub x_inner_berm_edge: Option<f64>,
    /// Inner toe of the dike
    pub x_inner_toe: f64,
    /// Dike-side edge of the ditch, if a ditch exists
    pub x_ditch_edge_dike_side: Option<f64>,
    /// Polder-side edge of the ditch, if a ditch exists
    pub x_ditch_edge_polder_side: Option<f64>,
}

/// Measured ground surface of one dike cross-section.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceLine {
    /// Surface line id, referenced from combinations and locations
    pub id: String,
    /// Survey points ordered from the water side to the polder side
    pub points: Vec<SurfaceLinePoint>,
    /// Characteristic points, attached after both inputs are loaded
    pub characteristic: Option<CharacteristicPoints>,
}

impl SurfaceLine {
    /// Create a surface line without characteristic points.
    pub fn new(id: impl Into<String>, points: Vec<SurfaceLinePoint>) -> Self {
        Self {
            id: id.into(),
            points,
            characteristic: None,
        }
    }

    /// Project the line onto the (x, elevation) plane.
    pub fn profile(&self) -> Vec<ProfilePoint> {
        self.points
            .iter()
            .map(|p| ProfilePoint::new(p.x, p.z))
            .collect()
    }
}
