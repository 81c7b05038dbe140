//! In-memory joined view of the parsed survey inputs.
//!
//! The [`RecordStore`] is built once from an input folder and is read-only
//! afterwards. All cross-record references are resolved through id-keyed
//! maps; a dangling reference is a typed [`StoreError::NotFound`] naming the
//! lookup kind and the offending id.
//!
//! # Input folder layout
//!
//! ```text
//! input/
//!   combinationfile.csv        scenarios to generate
//!   soilprofiles.csv           flat layer table, grouped by profile id
//!   soilparameters.csv         soil codes with mechanical parameters
//!   surfacelines.csv           cross-section survey polylines
//!   characteristicpoints.csv   named landmarks per surface line
//!   slopelayers.csv            clay-cap thickness per surface line
//!   locations.csv              location id -> surface line id join
//!   <polder levels>.shp        water levels, see io::ShapeFileNames
//!   <seepage heads>.shp
//!   <design levels>.shp
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::io::{
    read_characteristic_points, read_surface_lines, read_water_levels, CharPointsError,
    CsvTable, ShapeFileNames, SurfaceLineError, TableError, WaterLevelError,
};
use crate::types::{
    CharacteristicPoints, Combination, Location, SlopeLayer, Soil, SoilProfile, SoilProfileError,
    SoilProfileLayer, SurfaceLine, WaterLevelSet,
};

/// What kind of record a failed lookup was after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    /// Soil profile by id
    SoilProfile,
    /// Surface line by id
    SurfaceLine,
    /// Characteristic points attached to a surface line
    CharacteristicPoints,
    /// Location joined to a surface line
    Location,
    /// Water levels for a location
    WaterLevels,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::SoilProfile => "soil profile",
            LookupKind::SurfaceLine => "surface line",
            LookupKind::CharacteristicPoints => "characteristic points for surface line",
            LookupKind::Location => "location for surface line",
            LookupKind::WaterLevels => "water levels for location",
        };
        f.write_str(name)
    }
}

/// Error type for loading the store and resolving scenario references.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Tabular input error
    #[error(transparent)]
    Table(#[from] TableError),

    /// Surface line file error
    #[error(transparent)]
    SurfaceLines(#[from] SurfaceLineError),

    /// Characteristic points file error
    #[error(transparent)]
    CharPoints(#[from] CharPointsError),

    /// Water-level shapefile error
    #[error(transparent)]
    WaterLevels(#[from] WaterLevelError),

    /// Malformed soil profile
    #[error(transparent)]
    Profile(#[from] SoilProfileError),

    /// A referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Lookup kind
        kind: LookupKind,
        /// Id that failed to resolve
        id: String,
    },
}

/// One fully resolved scenario, borrowed from the store.
#[derive(Clone, Copy, Debug)]
pub struct Scenario<'a> {
    /// The combination driving this scenario
    pub combination: &'a Combination,
    /// Soil profile at the crest
    pub crest_profile: &'a SoilProfile,
    /// Soil profile at the toe
    pub toe_profile: &'a SoilProfile,
    /// Ground surface of the cross-section
    pub surface_line: &'a SurfaceLine,
    /// Characteristic points of the surface line
    pub points: &'a CharacteristicPoints,
    /// Hydraulic boundary data of the joined location
    pub water: &'a WaterLevelSet,
    /// Clay-cap thickness [m], zero when no cap is configured
    pub clay_cap: f64,
}

/// Read-only joined view of all parsed input records.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    /// All soil materials, in file order (drives area table columns)
    pub soils: Vec<Soil>,
    /// Soil profiles by id
    pub soil_profiles: HashMap<String, SoilProfile>,
    /// Surface lines by id, with characteristic points attached
    pub surface_lines: HashMap<String, SurfaceLine>,
    /// Locations keyed by the surface line they were measured at
    pub locations: HashMap<String, Location>,
    /// Water levels by location id
    pub water_levels: HashMap<String, WaterLevelSet>,
    /// Clay-cap records keyed by surface line id
    pub slope_layers: HashMap<String, SlopeLayer>,
    /// Scenarios in input order
    pub combinations: Vec<Combination>,
}

impl RecordStore {
    /// Load all inputs from a folder.
    ///
    /// Any malformed record aborts the load; see the module docs for the
    /// expected folder layout.
    pub fn from_folder(folder: &Path, shapes: &ShapeFileNames) -> Result<Self, StoreError> {
        let mut store = RecordStore::default();

        let combinations = CsvTable::read(&folder.join("combinationfile.csv"))?;
        for row in 0..combinations.n_rows() {
            store.combinations.push(Combination {
                soilprofile_id_crest: combinations.get(row, "soilprofile_id_crest")?.to_string(),
                soilprofile_id_toe: combinations.get(row, "soilprofile_id_toe")?.to_string(),
                surfaceline_id: combinations.get(row, "surfaceline_id")?.to_string(),
                geometry_name: combinations.get(row, "soilgeometry2D_name")?.to_string(),
            });
        }

        let profiles = CsvTable::read(&folder.join("soilprofiles.csv"))?;
        store.soil_profiles = group_soil_profiles(&profiles)?;

        for line in read_surface_lines(&folder.join("surfacelines.csv"))? {
            store.surface_lines.insert(line.id.clone(), line);
        }

        let charpoints = read_characteristic_points(&folder.join("characteristicpoints.csv"))?;
        for (id, points) in charpoints {
            let line = store
                .surface_lines
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: LookupKind::SurfaceLine,
                    id: id.clone(),
                })?;
            line.characteristic = Some(points);
        }

        let soils = CsvTable::read(&folder.join("soilparameters.csv"))?;
        store.soils = parse_soils(&soils)?;

        let slopelayers = CsvTable::read(&folder.join("slopelayers.csv"))?;
        for row in 0..slopelayers.n_rows() {
            let layer = SlopeLayer {
                surfaceline_id: slopelayers.get(row, "surfaceline_id")?.to_string(),
                thickness: slopelayers.get_f64(row, "slope_layer_thickness")?,
            };
            store
                .slope_layers
                .insert(layer.surfaceline_id.clone(), layer);
        }

        let locations = CsvTable::read(&folder.join("locations.csv"))?;
        for row in 0..locations.n_rows() {
            let location = Location {
                id: locations.get(row, "location_id")?.to_string(),
                surfaceline_id: locations.get(row, "surfaceline_id")?.to_string(),
            };
            store
                .locations
                .insert(location.surfaceline_id.clone(), location);
        }

        store.water_levels = read_water_levels(folder, shapes)?;

        info!(
            combinations = store.combinations.len(),
            soil_profiles = store.soil_profiles.len(),
            surface_lines = store.surface_lines.len(),
            soils = store.soils.len(),
            water_levels = store.water_levels.len(),
            "record store loaded"
        );

        Ok(store)
    }

    /// Resolve the full record bundle for one combination.
    pub fn resolve<'a>(&'a self, combination: &'a Combination) -> Result<Scenario<'a>, StoreError> {
        let not_found = |kind: LookupKind, id: &str| StoreError::NotFound {
            kind,
            id: id.to_string(),
        };

        let crest_profile = self
            .soil_profiles
            .get(&combination.soilprofile_id_crest)
            .ok_or_else(|| not_found(LookupKind::SoilProfile, &combination.soilprofile_id_crest))?;
        let toe_profile = self
            .soil_profiles
            .get(&combination.soilprofile_id_toe)
            .ok_or_else(|| not_found(LookupKind::SoilProfile, &combination.soilprofile_id_toe))?;
        let surface_line = self
            .surface_lines
            .get(&combination.surfaceline_id)
            .ok_or_else(|| not_found(LookupKind::SurfaceLine, &combination.surfaceline_id))?;
        let points = surface_line.characteristic.as_ref().ok_or_else(|| {
            not_found(LookupKind::CharacteristicPoints, &combination.surfaceline_id)
        })?;
        let location = self
            .locations
            .get(&combination.surfaceline_id)
            .ok_or_else(|| not_found(LookupKind::Location, &combination.surfaceline_id))?;
        let water = self
            .water_levels
            .get(&location.id)
            .ok_or_else(|| not_found(LookupKind::WaterLevels, &location.id))?;
        let clay_cap = self
            .slope_layers
            .get(&combination.surfaceline_id)
            .map_or(0.0, |layer| layer.thickness);

        Ok(Scenario {
            combination,
            crest_profile,
            toe_profile,
            surface_line,
            points,
            water,
            clay_cap,
        })
    }
}

/// Group the flat soil profile table into validated profiles.
fn group_soil_profiles(
    table: &CsvTable,
) -> Result<HashMap<String, SoilProfile>, StoreError> {
    let mut layers_by_id: HashMap<String, Vec<SoilProfileLayer>> = HashMap::new();
    for row in 0..table.n_rows() {
        let id = table.get(row, "soilprofile_id")?.to_string();
        layers_by_id.entry(id).or_default().push(SoilProfileLayer {
            top: table.get_f64(row, "top_level")?,
            bottom: table.get_f64(row, "bottom_level")?,
            soil_name: table.get(row, "soil_name")?.to_string(),
        });
    }

    let mut profiles = HashMap::with_capacity(layers_by_id.len());
    for (id, layers) in layers_by_id {
        let profile = SoilProfile::new(id.clone(), layers);
        profile.validate()?;
        profiles.insert(id, profile);
    }
    Ok(profiles)
}

/// Parse the positional soil parameter table (`name;yd;ys;c;phi`).
fn parse_soils(table: &CsvTable) -> Result<Vec<Soil>, StoreError> {
    let mut soils = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let fields = table.row(row);
        if fields.len() < 5 {
            return Err(StoreError::Table(TableError::Parse {
                path: table.path().to_string(),
                line: row + 2,
                message: format!("expected 5 soil parameter fields, got {}", fields.len()),
            }));
        }
        let num = |i: usize| -> Result<f64, StoreError> {
            fields[i].parse().map_err(|_| {
                StoreError::Table(TableError::Parse {
                    path: table.path().to_string(),
                    line: row + 2,
                    message: format!("'{}' is not a number", fields[i]),
                })
            })
        };
        soils.push(Soil {
            name: fields[0].clone(),
            yd: num(1)?,
            ys: num(2)?,
            c: num(3)?,
            phi: num(4)?,
        });
    }
    Ok(soils)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SurfaceLinePoint, WaterLevelSet};

    fn test_store() -> RecordStore {
        let mut store = RecordStore::default();

        store.soils = vec![Soil {
            name: "Klei".to_string(),
            yd: 14.0,
            ys: 16.0,
            c: 5.0,
            phi: 22.5,
        }];

        let profile = SoilProfile::new(
            "PR-1",
            vec![SoilProfileLayer {
                top: 4.0,
                bottom: -6.0,
                soil_name: "Klei".to_string(),
            }],
        );
        store.soil_profiles.insert("PR-1".to_string(), profile);

        let mut line = SurfaceLine::new(
            "DP-1",
            vec![
                SurfaceLinePoint {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
                SurfaceLinePoint {
                    x: 40.0,
                    y: 0.0,
                    z: 1.0,
                },
            ],
        );
        line.characteristic = Some(CharacteristicPoints {
            x_outer_toe: 5.0,
            x_outer_crest: 10.0,
            x_inner_crest: 20.0,
            x_inner_berm_edge: None,
            x_inner_toe: 30.0,
            x_ditch_edge_dike_side: None,
            x_ditch_edge_polder_side: None,
        });
        store.surface_lines.insert("DP-1".to_string(), line);

        store.locations.insert(
            "DP-1".to_string(),
            Location {
                id: "LOC-1".to_string(),
                surfaceline_id: "DP-1".to_string(),
            },
        );
        store.water_levels.insert(
            "LOC-1".to_string(),
            WaterLevelSet {
                polder_min: -0.5,
                polder_max: -0.2,
                design_level: 2.0,
                head_loss: 0.5,
                seepage_head: 1.0,
            },
        );

        store.combinations = vec![Combination {
            soilprofile_id_crest: "PR-1".to_string(),
            soilprofile_id_toe: "PR-1".to_string(),
            surfaceline_id: "DP-1".to_string(),
            geometry_name: "DP-1_geom".to_string(),
        }];

        store
    }

    #[test]
    fn test_resolve_complete_bundle() {
        let store = test_store();
        let scenario = store.resolve(&store.combinations[0]).unwrap();
        assert_eq!(scenario.crest_profile.id, "PR-1");
        assert_eq!(scenario.surface_line.id, "DP-1");
        assert_eq!(scenario.water.design_level, 2.0);
        assert_eq!(scenario.clay_cap, 0.0);
    }

    #[test]
    fn test_resolve_missing_profile() {
        let store = test_store();
        let mut combination = store.combinations[0].clone();
        combination.soilprofile_id_crest = "PR-9".to_string();
        match store.resolve(&combination) {
            Err(StoreError::NotFound { kind, id }) => {
                assert_eq!(kind, LookupKind::SoilProfile);
                assert_eq!(id, "PR-9");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_water_levels() {
        let mut store = test_store();
        store.water_levels.clear();
        assert!(matches!(
            store.resolve(&store.combinations[0]),
            Err(StoreError::NotFound {
                kind: LookupKind::WaterLevels,
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_missing_characteristic_points() {
        let mut store = test_store();
        store
            .surface_lines
            .get_mut("DP-1")
            .unwrap()
            .characteristic = None;
        assert!(matches!(
            store.resolve(&store.combinations[0]),
            Err(StoreError::NotFound {
                kind: LookupKind::CharacteristicPoints,
                ..
            })
        ));
    }

    #[test]
    fn test_clay_cap_from_slope_layers() {
        let mut store = test_store();
        store.slope_layers.insert(
            "DP-1".to_string(),
            SlopeLayer {
                surfaceline_id: "DP-1".to_string(),
                thickness: 0.8,
            },
        );
        let scenario = store.resolve(&store.combinations[0]).unwrap();
        assert_eq!(scenario.clay_cap, 0.8);
    }
}
