use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use biome_splat::config::{load_config, save_config, SplatConfig};
use biome_splat::export;
use biome_splat::probe::{probe_point, zone_bounds};
use biome_splat::zones::{scatter_zones, LayerOverflow};

#[derive(Parser, Debug)]
#[command(name = "biome_splat")]
#[command(about = "Synthesize terrain texture weights from circular biome zones")]
struct Args {
    /// Job file (JSON). Uses the built-in ocean floor job if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override alpha map width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Override alpha map height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Override the number of texture layers
    #[arg(short = 'l', long)]
    layers: Option<usize>,

    /// Replace the zones with this many randomly scattered ones
    #[arg(long)]
    scatter: Option<usize>,

    /// Seed for --scatter (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Keep out-of-range zones in the normalization total (weights may sum below 1)
    #[arg(long)]
    lossy: bool,

    /// Write a blended color preview PNG
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Write one grayscale PNG per layer using this prefix
    #[arg(long)]
    masks: Option<String>,

    /// Write the sculpted seabed as a 16-bit PNG
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Write raw little-endian f32 weights
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Print zone diagnostics at a world position (x,z)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    probe: Option<(f32, f32)>,

    /// Save the effective job (after overrides) as JSON
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, z) = s.split_once(',').ok_or_else(|| format!("expected x,z but got '{}'", s))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let z = z.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, z))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut job = match &args.config {
        Some(path) => {
            println!("Loading job from {}", path.display());
            load_config(path)?
        }
        None => {
            println!("Using built-in ocean floor job");
            SplatConfig::ocean_floor()
        }
    };

    if let Some(grid) = job.grid.as_mut() {
        if let Some(w) = args.width { grid.width = w; }
        if let Some(h) = args.height { grid.height = h; }
        if let Some(l) = args.layers { grid.layer_count = l; }
    }
    if args.lossy {
        job.params.layer_overflow = LayerOverflow::Lossy;
    }

    if let Some(count) = args.scatter {
        let seed = args.seed.unwrap_or_else(rand::random);
        let grid = job.grid.as_ref().ok_or("cannot scatter zones without a grid")?;
        println!("Scattering {} zones with seed: {}", count, seed);
        job.zones = scatter_zones(grid, count, seed);
    }

    if let Some(path) = &args.write_config {
        save_config(&job, path)?;
        println!("Saved job to {}", path.display());
    }

    let grid = job.grid.clone().ok_or(biome_splat::ConfigError::MissingGrid)?;
    println!("Alpha map: {}x{} cells, {} layers", grid.width, grid.height, grid.layer_count);
    let (min, max) = grid.world_bounds();
    println!("Terrain bounds: X({:.1} to {:.1}), Z({:.1} to {:.1})", min.0, max.0, min.1, max.1);

    for b in zone_bounds(&grid, &job.zones) {
        let status = if b.inside { "inside bounds" } else { "OUTSIDE bounds" };
        println!("  Zone '{}' at ({:.1}, {:.1}) -> {}", b.name, b.center.0, b.center.1, status);
    }

    println!("Synthesizing weights...");
    let out = job.run()?;
    let report = &out.report;
    for w in &report.warnings {
        println!("  Warning: {}", w);
    }
    println!(
        "Synthesis complete: {} cells, {:.1}% on fallback ({:?})",
        report.cells,
        100.0 * report.fallback_ratio(),
        report.fallback
    );
    println!("Max layer-sum error: {:.2e}", out.buffer.max_sum_error());
    for (layer, coverage) in out.buffer.layer_coverage().iter().enumerate() {
        let names: Vec<&str> = job
            .zones
            .iter()
            .filter(|z| z.output_layer == layer)
            .map(|z| z.name.as_str())
            .collect();
        println!("  Layer {}: {:5.1}% coverage [{}]", layer, coverage * 100.0, names.join(", "));
    }

    if let Some(point) = args.probe {
        let probe = probe_point(&grid, &job.zones, &job.params, point)?;
        let (cx, cy) = grid.world_to_cell(point);
        println!("Probe at ({:.1}, {:.1}), nearest cell ({}, {}):", point.0, point.1, cx, cy);
        for s in &probe.samples {
            println!(
                "  Zone {} ({}): distance={:.1}, normalized={:.2}, influence={:.3}, weight={:.3}{}",
                s.zone,
                s.name,
                s.distance,
                s.normalized_distance,
                s.influence,
                s.raw_weight,
                if s.contributes { "" } else { " (dropped)" }
            );
        }
        println!("  Total raw weight: {:.3}", probe.total);
        if let Some(fallback) = probe.fallback {
            println!("  Fallback: {:?}", fallback);
        }
        println!("  Layer weights: {:?}", probe.weights);
    }

    if let Some(path) = &args.preview {
        export::export_splat_preview(&out.buffer, path)?;
        println!("Wrote preview to {}", path.display());
    }

    if let Some(prefix) = &args.masks {
        for layer in 0..out.buffer.layers {
            let path = PathBuf::from(format!("{}_layer{}.png", prefix, layer));
            export::export_layer_mask(&out.buffer, layer, &path)?;
            println!("Wrote layer {} mask to {}", layer, path.display());
        }
    }

    if let Some(path) = &args.raw {
        export::export_weights_raw(&out.buffer, path)?;
        println!("Wrote raw weights to {}", path.display());
    }

    if let Some(path) = &args.heightmap {
        match job.heights()? {
            Some(heights) => {
                export::export_heightmap(&heights, path)?;
                if let Some((lo, hi)) = heights.min_max() {
                    println!("Seabed depth range: {:.3} to {:.3}", lo, hi);
                }
                println!("Wrote heightmap to {}", path.display());
            }
            None => println!("Job has no sculpt section; skipping heightmap"),
        }
    }

    Ok(())
}
