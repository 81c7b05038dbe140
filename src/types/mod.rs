//! Domain data model: soils, surface lines, water levels, scenarios.
//!
//! These are plain records built once at load time by the record store
//! (see [`crate::store`]) and treated as immutable afterwards.

mod scenario;
mod soil;
mod surface;
mod water;

pub use scenario::{Combination, SlopeLayer};
pub use soil::{Soil, SoilProfile, SoilProfileError, SoilProfileLayer};
pub use surface::{CharacteristicPoints, ProfilePoint, SurfaceLine, SurfaceLinePoint};
pub use water::{Location, WaterLevelSet};
