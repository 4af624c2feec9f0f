//! Debug script to output the dominant splat layer per cell as ASCII

use biome_splat::export::{ascii_map, layer_char};
use biome_splat::grid::TerrainGrid;
use biome_splat::probe::probe_cell;
use biome_splat::splat::{synthesize_with, SplatParams};
use biome_splat::zones::scatter_zones;
use std::error::Error;
use std::fs::File;
use std::io::Write;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let width = 96;
    let height = 48;
    let layers = 4;
    let seed = 12345u64;

    let grid = TerrainGrid::new(width, height, (0.0, 0.0), (960.0, 480.0), layers);
    let zones = scatter_zones(&grid, 9, seed);
    let params = SplatParams::default();

    let out = synthesize_with(&grid, &zones, &params)?;

    let mut file = File::create("zone_debug.txt")?;

    writeln!(file, "=== SPLAT ZONE DEBUG MAP ({}x{}) seed={} ===", width, height, seed)?;
    writeln!(file)?;

    writeln!(file, "LEGEND:")?;
    for layer in 0..layers {
        writeln!(file, "  {} = layer {}", layer_char(layer), layer)?;
    }
    writeln!(file)?;

    writeln!(file, "ZONES:")?;
    for (i, z) in zones.iter().enumerate() {
        writeln!(
            file,
            "  [{}] {} -> layer {} at ({:.1}, {:.1}) r={:.1} strength={:.2}",
            i, z.name, z.output_layer, z.center.0, z.center.1, z.radius, z.base_strength
        )?;
    }
    for w in &out.report.warnings {
        writeln!(file, "  warning: {}", w)?;
    }
    writeln!(file)?;

    writeln!(file, "DOMINANT LAYER MAP:")?;
    write!(file, "{}", ascii_map(&out.buffer))?;
    writeln!(file)?;

    writeln!(file, "COVERAGE:")?;
    for (layer, c) in out.buffer.layer_coverage().iter().enumerate() {
        writeln!(file, "  layer {}: {:.1}%", layer, c * 100.0)?;
    }
    writeln!(
        file,
        "  fallback cells: {} ({:.1}%)",
        out.report.fallback_cells,
        out.report.fallback_ratio() * 100.0
    )?;
    writeln!(file, "  max sum error: {:.2e}", out.buffer.max_sum_error())?;
    writeln!(file)?;

    // Center cell breakdown
    let (cx, cy) = (width / 2, height / 2);
    let probe = probe_cell(&grid, &zones, &params, cx, cy)?;
    writeln!(file, "CENTER CELL ({}, {}) at ({:.1}, {:.1}):", cx, cy, probe.point.0, probe.point.1)?;
    for s in &probe.samples {
        writeln!(
            file,
            "  {}: distance={:.1}, normalized={:.2}, influence={:.3}, weight={:.3}",
            s.name, s.distance, s.normalized_distance, s.influence, s.raw_weight
        )?;
    }
    writeln!(file, "  weights: {:?}", probe.weights)?;

    println!("Wrote zone_debug.txt");
    Ok(())
}
