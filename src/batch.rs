//! Batch driver: one pass over all scenario combinations.
//!
//! Scenarios are processed strictly sequentially in input order. Each
//! scenario either fully succeeds — geometry file, scenario log, one row in
//! each area table — or is skipped with a recorded failure reason; a failed
//! scenario never leaks state into the next one.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use crate::area::{compute_soil_areas, Footprint, SoilAreas};
use crate::geometry::{CrossSection, GeometryEngine, GeometryError, SectionExtent};
use crate::phreatic::{build_phreatic_line, PhreaticConfig, PhreaticError};
use crate::store::{RecordStore, Scenario, StoreError};
use crate::types::{Combination, SoilProfile};

/// Settings of one batch run.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Phreatic line offsets
    pub phreatic: PhreaticConfig,
    /// Soil code used for the dike body fill
    pub fill_code: String,
    /// Soil code used for the optional clay cap
    pub top_layer_code: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            phreatic: PhreaticConfig::default(),
            fill_code: "Dijksmateriaal".to_string(),
            top_layer_code: "Klei".to_string(),
        }
    }
}

/// Error that aborts the whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Output directory or table could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error that aborts a single scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A referenced record failed to resolve
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Phreatic line construction failed
    #[error(transparent)]
    Phreatic(#[from] PhreaticError),

    /// The geometry engine reported a failure
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Scenario output could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A scenario that was skipped, with the reason.
#[derive(Clone, Debug)]
pub struct ScenarioFailure {
    /// Output name of the failed scenario
    pub name: String,
    /// Human-readable failure reason
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    /// Output names of successfully generated scenarios, in input order
    pub generated: Vec<String>,
    /// Skipped scenarios with their failure reasons
    pub failures: Vec<ScenarioFailure>,
}

/// Process every combination of the store and write all outputs.
///
/// Produces, per successful scenario, a geometry file and a `<name>.log`
/// summary in `output_dir`, and appends one row to each of the two area
/// tables (`soil_areas.csv`, `soil_areas_limited.csv`) written at the end
/// of the run.
pub fn run_batch<E: GeometryEngine>(
    store: &RecordStore,
    engine: &E,
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<BatchSummary, BatchError> {
    fs::create_dir_all(output_dir)?;

    let mut summary = BatchSummary::default();
    let mut rows: Vec<(String, SoilAreas)> = Vec::new();

    for combination in &store.combinations {
        let name = combination.geometry_name.clone();
        info!(scenario = %name, "processing");

        match process_scenario(store, engine, combination, output_dir, config) {
            Ok(areas) => {
                rows.push((name.clone(), areas));
                summary.generated.push(name);
            }
            Err(e) => {
                error!(scenario = %name, error = %e, "scenario skipped");
                summary.failures.push(ScenarioFailure {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    write_area_table(
        &output_dir.join("soil_areas.csv"),
        store,
        &rows,
        |areas, code| areas.raw_area(code),
    )?;
    write_area_table(
        &output_dir.join("soil_areas_limited.csv"),
        store,
        &rows,
        |areas, code| areas.limited_area(code),
    )?;

    info!(
        generated = summary.generated.len(),
        failed = summary.failures.len(),
        "batch finished"
    );

    Ok(summary)
}

/// Run one scenario end to end.
fn process_scenario<E: GeometryEngine>(
    store: &RecordStore,
    engine: &E,
    combination: &Combination,
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<SoilAreas, ScenarioError> {
    let scenario = store.resolve(combination)?;
    let points = scenario.points;

    let mut section = engine.assemble(
        scenario.crest_profile,
        scenario.toe_profile,
        scenario.surface_line,
        points.x_inner_toe,
        &store.soils,
        &config.fill_code,
    )?;

    if scenario.clay_cap > 0.0 {
        section.add_top_layer(
            points.x_outer_toe,
            points.x_inner_toe,
            scenario.clay_cap,
            &config.top_layer_code,
        );
    }

    let phreatic_line = build_phreatic_line(&section, points, scenario.water, &config.phreatic)?;
    section.add_phreatic_line(&phreatic_line);

    let extent = SectionExtent::of(&section);
    let areas = compute_soil_areas(
        &section.soil_polygons(),
        &store.soils,
        &extent,
        &Footprint {
            x_outer_toe: points.x_outer_toe,
            x_inner_toe: points.x_inner_toe,
            polder_min: scenario.water.polder_min,
        },
    );

    section.serialize(&output_dir.join(&combination.geometry_name))?;

    // Only after the geometry file exists: a failed scenario must leave no
    // outputs behind.
    let log_path = output_dir.join(format!("{}.log", combination.geometry_name));
    fs::write(&log_path, scenario_log(&scenario))?;

    Ok(areas)
}

/// Render the human-readable input summary of one scenario.
fn scenario_log(scenario: &Scenario<'_>) -> String {
    let points = scenario.points;
    let water = scenario.water;
    let optional = |x: Option<f64>| match x {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    };

    let mut log = String::new();
    let _ = writeln!(log, "# {}", scenario.combination.geometry_name);
    let _ = writeln!(log, "# generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(log);
    let _ = writeln!(
        log,
        "surface line: {} ({} points)",
        scenario.surface_line.id,
        scenario.surface_line.points.len()
    );
    let _ = writeln!(log, "characteristic points:");
    let _ = writeln!(log, "  outer toe:          {:.2}", points.x_outer_toe);
    let _ = writeln!(log, "  outer crest:        {:.2}", points.x_outer_crest);
    let _ = writeln!(log, "  inner crest:        {:.2}", points.x_inner_crest);
    let _ = writeln!(log, "  inner berm edge:    {}", optional(points.x_inner_berm_edge));
    let _ = writeln!(log, "  inner toe:          {:.2}", points.x_inner_toe);
    let _ = writeln!(
        log,
        "  ditch (dike side):  {}",
        optional(points.x_ditch_edge_dike_side)
    );
    let _ = writeln!(
        log,
        "  ditch (polder side):{}",
        optional(points.x_ditch_edge_polder_side)
    );
    let _ = writeln!(log, "water levels:");
    let _ = writeln!(log, "  design level (toetspeil): {:.2}", water.design_level);
    let _ = writeln!(log, "  head loss (verschil):     {:.2}", water.head_loss);
    let _ = writeln!(log, "  polder min:               {:.2}", water.polder_min);
    let _ = writeln!(log, "  polder max:               {:.2}", water.polder_max);
    let _ = writeln!(log, "  seepage head:             {:.2}", water.seepage_head);
    let _ = writeln!(log, "clay cap thickness: {:.2}", scenario.clay_cap);
    let _ = writeln!(log);
    write_profile(&mut log, "crest profile", scenario.crest_profile);
    write_profile(&mut log, "toe profile", scenario.toe_profile);
    log
}

fn write_profile(log: &mut String, label: &str, profile: &SoilProfile) {
    let _ = writeln!(log, "{label} {}:", profile.id);
    for layer in &profile.layers {
        let _ = writeln!(
            log,
            "  {:8.2} .. {:8.2}  {}",
            layer.top, layer.bottom, layer.soil_name
        );
    }
}

/// Write one area table with the soils as columns, in soil-file order.
fn write_area_table(
    path: &Path,
    store: &RecordStore,
    rows: &[(String, SoilAreas)],
    value: impl Fn(&SoilAreas, &str) -> f64,
) -> Result<(), BatchError> {
    let mut out = String::from("id");
    for soil in &store.soils {
        let _ = write!(out, ";{}", soil.name);
    }
    out.push('\n');

    for (name, areas) in rows {
        let _ = write!(out, "{name}");
        for soil in &store.soils {
            let _ = write!(out, ";{:.2}", value(areas, &soil.name));
        }
        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.phreatic.crest_offset, 0.0);
        assert_eq!(config.phreatic.ground_offset, 0.1);
        assert_eq!(config.fill_code, "Dijksmateriaal");
    }
}
