//! Phreatic line synthesis.
//!
//! Turns one scenario's characteristic points, water levels, and ground
//! surface into the control-point polyline of the phreatic (pore-pressure)
//! line. The construction has three steps:
//!
//! 1. **Seed**: fixed control points at the cross-section landmarks, from
//!    the design level on the water side down to the polder level or the
//!    ground surface on the polder side.
//! 2. **Resample**: between the inner crest (or berm edge) and the ditch
//!    edge (or right bound), the seed line is re-evaluated at every ground
//!    vertex and seed x, and pressed down wherever it would come closer to
//!    the ground surface than the configured clearance.
//! 3. **Clamp**: elevations are made non-increasing from left to right, so
//!    the seepage head never appears to rise towards the polder side.
//!
//! The result is a pure function of its inputs; the same scenario always
//! yields the same control points.

use thiserror::Error;

use crate::geometry::SectionGeometry;
use crate::interpolate::PiecewiseLinear;
use crate::types::{CharacteristicPoints, ProfilePoint, WaterLevelSet};

/// Tunable offsets of the phreatic line construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhreaticConfig {
    /// Elevation drop applied at the outer crest [m]
    pub crest_offset: f64,
    /// Minimum clearance kept below the ground surface [m]
    pub ground_offset: f64,
}

impl Default for PhreaticConfig {
    fn default() -> Self {
        Self {
            crest_offset: 0.0,
            ground_offset: 0.1,
        }
    }
}

/// Error type for phreatic line construction.
///
/// Both variants are fatal for their scenario only.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PhreaticError {
    /// The ground surface never reaches the design level on the outer slope
    #[error(
        "ground surface does not cross the design level {design_level} \
         between the left bound and the outer crest"
    )]
    NoEntryCrossing {
        /// Design water level that found no crossing
        design_level: f64,
    },

    /// The crest offset would push the outer crest below the inner crest
    #[error("crest offset {crest_offset} exceeds head loss {head_loss}")]
    CrestOffsetExceedsHeadLoss {
        /// Configured crest offset
        crest_offset: f64,
        /// Head loss of the scenario's water levels
        head_loss: f64,
    },

    /// The characteristic points are not ordered from outer to inner side
    #[error(
        "characteristic points out of order: {name} at x = {x} \
         does not lie right of {prev_name} at x = {prev_x}"
    )]
    DisorderedLandmarks {
        /// Landmark that should lie further left
        prev_name: &'static str,
        /// Its x-position
        prev_x: f64,
        /// Landmark that fails to lie right of it
        name: &'static str,
        /// Its x-position
        x: f64,
    },
}

/// Check that the landmarks feeding the seed polyline increase in x.
///
/// The survey export can carry any parseable value, so a disordered row is
/// a per-scenario input error, not a programming error.
fn check_landmark_order(
    points: &CharacteristicPoints,
    right: f64,
) -> Result<(), PhreaticError> {
    let mut landmarks: Vec<(&'static str, f64)> = vec![
        ("outer crest", points.x_outer_crest),
        ("inner crest", points.x_inner_crest),
    ];
    if let Some(x) = points.x_inner_berm_edge {
        landmarks.push(("inner berm edge", x));
    }
    landmarks.push(("inner toe", points.x_inner_toe));
    if let Some(x) = points.x_ditch_edge_dike_side {
        landmarks.push(("ditch edge (dike side)", x));
    }

    for pair in landmarks.windows(2) {
        if pair[1].1 <= pair[0].1 {
            return Err(PhreaticError::DisorderedLandmarks {
                prev_name: pair[0].0,
                prev_x: pair[0].1,
                name: pair[1].0,
                x: pair[1].1,
            });
        }
    }

    // The right bound closes the seed polyline; it may coincide with the
    // last landmark but must not lie left of it.
    let (last_name, last_x) = landmarks[landmarks.len() - 1];
    if right < last_x {
        return Err(PhreaticError::DisorderedLandmarks {
            prev_name: last_name,
            prev_x: last_x,
            name: "right bound",
            x: right,
        });
    }

    Ok(())
}

/// Build the phreatic control-point polyline for one scenario.
///
/// # Arguments
/// * `section` - the assembled cross-section (bounds, surface, queries)
/// * `points` - characteristic x-positions of the surface line
/// * `water` - the scenario's water levels
/// * `config` - crest and ground offsets
///
/// # Returns
/// Control points ordered by increasing x with non-increasing elevation.
pub fn build_phreatic_line<S: SectionGeometry + ?Sized>(
    section: &S,
    points: &CharacteristicPoints,
    water: &WaterLevelSet,
    config: &PhreaticConfig,
) -> Result<Vec<ProfilePoint>, PhreaticError> {
    if config.crest_offset > water.head_loss {
        return Err(PhreaticError::CrestOffsetExceedsHeadLoss {
            crest_offset: config.crest_offset,
            head_loss: water.head_loss,
        });
    }

    let left = section.left();
    let right = section.right();
    let level = water.design_level;

    check_landmark_order(points, right)?;

    // Step 1: seed control points at the landmarks.
    let mut seed = vec![ProfilePoint::new(left, level)];

    let entry = section
        .surface_intersections(
            ProfilePoint::new(left, level),
            ProfilePoint::new(points.x_outer_crest, level),
        )
        .into_iter()
        .find(|p| p.x > left && p.x < points.x_outer_crest)
        .ok_or(PhreaticError::NoEntryCrossing {
            design_level: level,
        })?;
    seed.push(ProfilePoint::new(entry.x, level));

    seed.push(ProfilePoint::new(
        points.x_outer_crest,
        level - config.crest_offset,
    ));
    seed.push(ProfilePoint::new(
        points.x_inner_crest,
        level - water.head_loss,
    ));

    if let Some(x_berm) = points.x_inner_berm_edge {
        seed.push(ProfilePoint::new(
            x_berm,
            section.elevation_at(x_berm) - config.ground_offset,
        ));
    }
    seed.push(ProfilePoint::new(
        points.x_inner_toe,
        section.elevation_at(points.x_inner_toe) - config.ground_offset,
    ));

    if let Some(x_ditch) = points.x_ditch_edge_dike_side {
        seed.push(ProfilePoint::new(x_ditch, water.polder_min));
        seed.push(ProfilePoint::new(right, water.polder_min));
    } else {
        seed.push(ProfilePoint::new(
            right,
            section.elevation_at(right) - config.ground_offset,
        ));
    }

    // Step 2: resample the toe region against the ground surface.
    let inner_limit = points.x_inner_berm_edge.unwrap_or(points.x_inner_crest);
    let outer_limit = points.x_ditch_edge_dike_side.unwrap_or(right);

    let seed_line = PiecewiseLinear::new(seed.clone());
    let mut xs: Vec<f64> = section
        .surface()
        .iter()
        .map(|p| p.x)
        .chain(seed.iter().map(|p| p.x))
        .filter(|&x| x > inner_limit && x <= outer_limit)
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let resampled = xs.into_iter().map(|x| {
        let clearance = section.elevation_at(x) - config.ground_offset;
        let z = match seed_line.at(x) {
            Some(seed_z) => seed_z.min(clearance),
            None => clearance,
        };
        ProfilePoint::new(x, z)
    });

    // Step 3: final list and monotonicity clamp.
    let mut line: Vec<ProfilePoint> = seed
        .iter()
        .filter(|p| p.x <= points.x_inner_crest)
        .copied()
        .collect();
    line.extend(resampled);
    if outer_limit != right {
        line.extend(seed.iter().filter(|p| p.x > outer_limit));
    }

    Ok(clamp_non_increasing(&line))
}

/// Clamp elevations so they never increase from left to right.
///
/// Whenever a point rises above its predecessor it is flattened down to the
/// predecessor's elevation.
pub fn clamp_non_increasing(line: &[ProfilePoint]) -> Vec<ProfilePoint> {
    let mut result = Vec::with_capacity(line.len());
    let mut ceiling = f64::INFINITY;
    for point in line {
        let z = point.z.min(ceiling);
        result.push(ProfilePoint::new(point.x, z));
        ceiling = z;
    }
    result
}
