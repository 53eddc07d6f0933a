use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

use coverage_map::api::{fetch_named_nodes, geocode_boundary};
use coverage_map::config::{
    DEFAULT_DENSITY_PER_KM2, DEFAULT_RADIUS_M, FileConfig, NominatimConfig, OverpassConfig,
};
use coverage_map::coverage::{
    CoverageEstimator, DEFAULT_MAX_BATCHES, DEFAULT_MAX_SAMPLES, EmptyReferencePolicy,
    PolygonSampler, sample_count,
};
use coverage_map::domain::Region;
use coverage_map::osm::parse_reference_points;
use coverage_map::report::{ReportContext, write_html_report};

/// Estimate how much of a place lies within a radius of a brand's stores
///
/// Examples:
///   # 800m coverage of 50嵐 stores in Taichung
///   coverage-map -p "Taichung" -b "50嵐"
///
///   # Tighter radius, denser sampling, reproducible run
///   coverage-map -p "Taipei" -b "7-Eleven" -r 300 -d 200 --seed 42
///
///   # Use a config file
///   coverage-map --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "coverage-map")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches coverage-map.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Place name to geocode (city, district, country...)
    #[arg(short = 'p', long)]
    place: Option<String>,

    /// Store name to search for (exact OSM `name` tag)
    #[arg(short = 'b', long)]
    brand: Option<String>,

    /// Coverage radius around each store in meters [default: 800]
    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Monte Carlo samples per km² (50-500 recommended) [default: 50]
    #[arg(short = 'd', long)]
    density: Option<f64>,

    /// Random seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum candidate batches before sampling gives up [default: 1000]
    #[arg(long)]
    max_batches: Option<usize>,

    /// Largest sample count a run may draw [default: 5000000]
    #[arg(long)]
    max_samples: Option<usize>,

    /// Fail instead of reporting 0% when no stores are found
    #[arg(long)]
    strict: bool,

    /// Output HTML report path (defaults to {place}_{brand}_coverage.html)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {:?}", config_path);
            }
            Some(FileConfig::load_from(config_path)?)
        }
        None => FileConfig::load(),
    };
    let file = file_config.as_ref();

    let place = args.place.clone().or_else(|| file.and_then(|c| c.place.clone()));
    let brand = args.brand.clone().or_else(|| file.and_then(|c| c.brand.clone()));
    let radius = args
        .radius
        .unwrap_or_else(|| file.map(|c| c.radius).unwrap_or(DEFAULT_RADIUS_M));
    let density = args
        .density
        .unwrap_or_else(|| file.map(|c| c.density).unwrap_or(DEFAULT_DENSITY_PER_KM2));
    let max_batches = args
        .max_batches
        .unwrap_or_else(|| file.map(|c| c.max_batches).unwrap_or(DEFAULT_MAX_BATCHES));
    let max_samples = args
        .max_samples
        .unwrap_or_else(|| file.map(|c| c.max_samples).unwrap_or(DEFAULT_MAX_SAMPLES));
    let seed = args.seed.or_else(|| file.and_then(|c| c.seed));
    let strict = args.strict || file.map(|c| c.strict).unwrap_or(false);
    let verbose = args.verbose || file.map(|c| c.verbose).unwrap_or(false);
    let output = args.output.clone().or_else(|| file.and_then(|c| c.output.clone()));

    let overpass_config: OverpassConfig = file
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();
    let nominatim_config: NominatimConfig = file
        .and_then(|c| c.nominatim.clone())
        .unwrap_or_default();

    let (Some(place), Some(brand)) = (place, brand) else {
        bail!("Must provide both --place/-p and --brand/-b (or set them in the config file)");
    };
    validate_inputs(radius, density)?;

    println!("coverage-map - Store Coverage Estimator");
    println!("=======================================");
    println!();

    let output_path = output.unwrap_or_else(|| default_output_path(&place, &brand));

    let seed = match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            eprintln!("No seed provided, using: {} (pass --seed to reproduce)", seed);
            seed
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);

    if verbose {
        println!("Configuration:");
        println!("  Place: {}", place);
        println!("  Brand: {}", brand);
        println!("  Radius: {}m", radius);
        println!("  Density: {} samples/km²", density);
        println!("  Seed: {}", seed);
        println!("  Max batches: {}", max_batches);
        println!("  Max samples: {}", max_samples);
        println!(
            "  Empty store policy: {}",
            if strict { "fail" } else { "report 0%" }
        );
        println!("  Output: {}", output_path.display());
        println!("  Overpass mirrors: {}", overpass_config.urls.len());
        println!();
    }

    let spinner = create_spinner("Geocoding place boundary...");
    let start = Instant::now();
    let (display_name, geometry) =
        geocode_boundary(&place, &nominatim_config).context("Failed to geocode place")?;
    let region = Region::try_from(geometry).context("Place boundary is not an area")?;
    let bounds = region
        .bounds()
        .context("Place boundary has no coordinates")?;
    spinner.finish_with_message(format!(
        "Geocoded: {} -> {} part(s), {:.1} km² [{:.1}s]",
        display_name,
        region.shape().0.len(),
        region.area_km2(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner(&format!("Fetching \"{}\" stores from OpenStreetMap...", brand));
    let start = Instant::now();
    let response = fetch_named_nodes(&bounds, &brand, &overpass_config)
        .context("Failed to fetch stores from Overpass API")?;
    let stores = parse_reference_points(&response, &region);
    spinner.finish_with_message(format!(
        "Found {} {} stores ({} in bounding box) [{:.1}s]",
        stores.len(),
        brand,
        response.elements.len(),
        start.elapsed().as_secs_f32()
    ));

    let budget = sample_count(&region, density);
    println!("Monte Carlo samples: {}", budget);

    let sampler = PolygonSampler::new(max_batches).with_max_samples(max_samples);
    let policy = if strict {
        EmptyReferencePolicy::Reject
    } else {
        EmptyReferencePolicy::Uncovered
    };
    let estimator = CoverageEstimator::new(sampler).with_empty_reference_policy(policy);

    let spinner = create_spinner("Estimating coverage...");
    let start = Instant::now();
    let result = estimator
        .estimate(&region, &stores, radius, density, &mut rng)
        .context("Coverage estimation failed")?;
    spinner.finish_with_message(format!(
        "Labelled {} samples, {} covered [{:.1}s]",
        result.len(),
        result.covered_count(),
        start.elapsed().as_secs_f32()
    ));

    if verbose && !stores.is_empty() {
        println!("  Stores:");
        for store in &stores {
            println!(
                "    ({:.5}, {:.5}) {}",
                store.lat,
                store.lon,
                store.name.as_deref().unwrap_or("")
            );
        }
    }

    println!();
    if stores.is_empty() {
        println!("No {} stores found in {}", brand, place);
    } else {
        println!(
            "{} coverage of {} ({}m radius): about {:.5}%",
            place,
            brand,
            radius,
            result.ratio * 100.0
        );
    }

    let ctx = ReportContext {
        place: &place,
        brand: &brand,
        region: &region,
        references: &stores,
        radius_m: radius,
        result: &result,
    };
    write_html_report(&output_path, &ctx).context("Failed to write HTML report")?;

    println!();
    println!("Map written to: {}", output_path.display());
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn validate_inputs(radius: f64, density: f64) -> Result<()> {
    if !(radius.is_finite() && radius >= 0.0) {
        bail!("--radius must be a non-negative number of meters, got {}", radius);
    }
    if !(density.is_finite() && density >= 0.0) {
        bail!("--density must be a non-negative number of samples per km², got {}", density);
    }
    Ok(())
}

fn default_output_path(place: &str, brand: &str) -> PathBuf {
    let slug = |s: &str| {
        s.trim()
            .to_lowercase()
            .replace(|c: char| c.is_whitespace() || std::path::is_separator(c), "_")
    };
    PathBuf::from(format!("{}_{}_coverage.html", slug(place), slug(brand)))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
