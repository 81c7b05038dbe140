//! Per-soil-code area accounting.
//!
//! Reports two totals per soil code for one assembled cross-section:
//!
//! - **raw**: the summed area of every polygon of that code
//! - **limited**: the same area restricted to the physically relevant
//!   footprint, i.e. between the outer and inner toe and above the minimum
//!   polder level
//!
//! The footprint restriction is applied by subtracting three rectangular
//! masks from a working copy of each polygon: everything left of the outer
//! toe, everything right of the inner toe, and everything below the polder
//! level. Each mask extends one metre beyond the section's bounding box on
//! its non-clipping sides so the difference can never clip along a box edge
//! it is not meant to touch.

use std::collections::BTreeMap;

use geo::{coord, Area, BooleanOps, Intersects, MultiPolygon, Polygon, Rect};

use crate::geometry::{SectionExtent, SoilPolygon};
use crate::types::Soil;

/// Margin by which masks extend past the section bounding box [m].
const MASK_MARGIN: f64 = 1.0;

/// The x-positions and level that bound the reported footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Outer toe of the dike [m]
    pub x_outer_toe: f64,
    /// Inner toe of the dike [m]
    pub x_inner_toe: f64,
    /// Minimum polder level [m]
    pub polder_min: f64,
}

/// Raw and footprint-limited area per soil code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoilAreas {
    /// Total polygon area per soil code
    pub raw: BTreeMap<String, f64>,
    /// Area within the footprint per soil code
    pub limited: BTreeMap<String, f64>,
}

impl SoilAreas {
    /// Raw area for a code, zero when the code has no geometry.
    pub fn raw_area(&self, code: &str) -> f64 {
        self.raw.get(code).copied().unwrap_or(0.0)
    }

    /// Limited area for a code, zero when the code has no geometry.
    pub fn limited_area(&self, code: &str) -> f64 {
        self.limited.get(code).copied().unwrap_or(0.0)
    }
}

/// The three footprint masks for a section.
fn masks(extent: &SectionExtent, footprint: &Footprint) -> [Polygon<f64>; 3] {
    let left = extent.left - MASK_MARGIN;
    let right = extent.right + MASK_MARGIN;
    let top = extent.top + MASK_MARGIN;
    let bottom = extent.bottom - MASK_MARGIN;

    let rect = |x0: f64, y0: f64, x1: f64, y1: f64| {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()
    };

    [
        // Everything left of the outer toe.
        rect(left, bottom, footprint.x_outer_toe, top),
        // Everything right of the inner toe.
        rect(footprint.x_inner_toe, bottom, right, top),
        // Everything below the minimum polder level.
        rect(left, bottom, right, footprint.polder_min),
    ]
}

/// Compute raw and footprint-limited areas for one scenario.
///
/// Every code of `soils` gets an entry, so codes without geometry report
/// zero. Polygons carrying a code outside `soils` are still accounted.
pub fn compute_soil_areas(
    polygons: &[SoilPolygon],
    soils: &[Soil],
    extent: &SectionExtent,
    footprint: &Footprint,
) -> SoilAreas {
    let mut areas = SoilAreas::default();
    for soil in soils {
        areas.raw.insert(soil.name.clone(), 0.0);
        areas.limited.insert(soil.name.clone(), 0.0);
    }

    let masks = masks(extent, footprint).map(|m| MultiPolygon::new(vec![m]));

    for soil_polygon in polygons {
        *areas
            .raw
            .entry(soil_polygon.soil_code.clone())
            .or_insert(0.0) += soil_polygon.polygon.unsigned_area();

        let mut work = MultiPolygon::new(vec![soil_polygon.polygon.clone()]);
        for mask in &masks {
            // Skip masks that cannot remove anything.
            if work.intersects(mask) {
                work = work.difference(mask);
            }
        }

        *areas
            .limited
            .entry(soil_polygon.soil_code.clone())
            .or_insert(0.0) += work.unsigned_area();
    }

    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    const TOL: f64 = 1e-9;

    fn soil(name: &str) -> Soil {
        Soil {
            name: name.to_string(),
            yd: 14.0,
            ys: 16.0,
            c: 2.0,
            phi: 25.0,
        }
    }

    fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64, code: &str) -> SoilPolygon {
        SoilPolygon {
            soil_code: code.to_string(),
            polygon: polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: y1),
                (x: x0, y: y1),
            ],
        }
    }

    fn extent() -> SectionExtent {
        SectionExtent {
            left: 0.0,
            right: 10.0,
            top: 2.0,
            bottom: 0.0,
        }
    }

    #[test]
    fn test_raw_area_sums_polygons_per_code() {
        let polygons = [
            rectangle(0.0, 0.0, 10.0, 1.0, "Klei"),
            rectangle(0.0, 1.0, 10.0, 2.0, "Klei"),
        ];
        let soils = [soil("Klei"), soil("Veen")];
        let footprint = Footprint {
            x_outer_toe: 0.0,
            x_inner_toe: 10.0,
            polder_min: 0.0,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        assert!((areas.raw_area("Klei") - 20.0).abs() < TOL);
    }

    #[test]
    fn test_codes_without_geometry_report_zero() {
        let polygons = [rectangle(0.0, 0.0, 10.0, 2.0, "Klei")];
        let soils = [soil("Klei"), soil("Veen")];
        let footprint = Footprint {
            x_outer_toe: 0.0,
            x_inner_toe: 10.0,
            polder_min: 0.0,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        assert_eq!(areas.raw_area("Veen"), 0.0);
        assert_eq!(areas.limited_area("Veen"), 0.0);
    }

    #[test]
    fn test_masks_limit_to_footprint() {
        let polygons = [rectangle(0.0, 0.0, 10.0, 2.0, "Klei")];
        let soils = [soil("Klei")];
        let footprint = Footprint {
            x_outer_toe: 2.0,
            x_inner_toe: 8.0,
            polder_min: 0.5,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        // Remaining region: x in [2, 8], z in [0.5, 2] = 6 x 1.5.
        assert!((areas.raw_area("Klei") - 20.0).abs() < TOL);
        assert!((areas.limited_area("Klei") - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_limited_equals_raw_when_masks_miss() {
        let polygons = [rectangle(0.0, 0.0, 10.0, 2.0, "Klei")];
        let soils = [soil("Klei")];
        // All three masks fall outside the geometry.
        let footprint = Footprint {
            x_outer_toe: -5.0,
            x_inner_toe: 15.0,
            polder_min: -3.0,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        assert!((areas.limited_area("Klei") - areas.raw_area("Klei")).abs() < TOL);
    }

    #[test]
    fn test_limited_never_exceeds_raw() {
        let polygons = [
            rectangle(0.0, 0.0, 10.0, 1.0, "Klei"),
            rectangle(3.0, 1.0, 7.0, 2.0, "Veen"),
        ];
        let soils = [soil("Klei"), soil("Veen")];
        let footprint = Footprint {
            x_outer_toe: 4.0,
            x_inner_toe: 6.0,
            polder_min: 0.5,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        for code in ["Klei", "Veen"] {
            assert!(areas.limited_area(code) <= areas.raw_area(code) + TOL);
        }
    }

    #[test]
    fn test_unknown_code_still_accounted() {
        let polygons = [rectangle(0.0, 0.0, 2.0, 1.0, "Dijksmateriaal")];
        let soils = [soil("Klei")];
        let footprint = Footprint {
            x_outer_toe: -5.0,
            x_inner_toe: 15.0,
            polder_min: -3.0,
        };
        let areas = compute_soil_areas(&polygons, &soils, &extent(), &footprint);
        assert!((areas.raw_area("Dijksmateriaal") - 2.0).abs() < TOL);
    }
}
