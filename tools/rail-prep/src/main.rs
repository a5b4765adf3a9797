use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rail_topology::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

mod input;
mod output;
mod stats;

use input::{read_next_stations, read_stations, StationFormat};
use output::{write_groups_csv, write_path_rows_csv, write_paths_geojson};
use stats::PrepStats;

/// Which clustering threshold preset to use
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pipeline {
    /// Full station dataset (0.45 km)
    Primary,
    /// Stations decoded from GeoJSON only (0.37 km)
    Geojson,
}

impl Pipeline {
    fn for_format(format: StationFormat) -> Self {
        match format {
            StationFormat::Records => Self::Primary,
            StationFormat::GeoJson => Self::Geojson,
        }
    }

    fn cluster_config(self) -> ClusterConfig {
        match self {
            Self::Primary => ClusterConfig::primary(),
            Self::Geojson => ClusterConfig::geojson(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "rail-prep",
    author,
    version,
    about = "Build station groups and drawable railway paths from station data",
    long_about = "Groups raw station features that represent the same physical station, \
                  then reconstructs each railway's station graph from next-station links \
                  and traces one drawable path per connected component.\n\n\
                  Run once per dataset refresh; the outputs are loaded into the reference \
                  database keyed by (railway_code, path_id, ord)."
)]
struct Args {
    /// Station file: JSON array of {name, railway, company, lat, lng} or GeoJSON station features
    #[arg(short, long)]
    stations: PathBuf,

    /// Next-station file: JSON array of {station, left, right} (indices into the station file)
    #[arg(short, long)]
    next_stations: PathBuf,

    /// Output GeoJSON file for railway paths
    #[arg(short, long)]
    output: PathBuf,

    /// Also write path rows (railway_code, path_id, ord, lat, lng) as CSV
    #[arg(long)]
    rows_output: Option<PathBuf>,

    /// Also write the station group assigned to every station as CSV
    #[arg(long)]
    groups_output: Option<PathBuf>,

    /// Clustering preset (defaults to geojson for GeoJSON input, primary otherwise)
    #[arg(long, value_enum)]
    pipeline: Option<Pipeline>,

    /// Override the clustering distance threshold in kilometres
    #[arg(long)]
    threshold_km: Option<f64>,

    /// Additional station names that must never be merged (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    excluded_names: Vec<String>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Rail Path Preparation ===");
    log::info!("Stations: {}", args.stations.display());
    log::info!("Next stations: {}", args.next_stations.display());
    log::info!("Output: {}", args.output.display());

    for path in [&args.stations, &args.next_stations] {
        if !path.exists() {
            bail!("Input file does not exist: {}", path.display());
        }
    }
    if let Some(threshold) = args.threshold_km {
        if !threshold.is_finite() || threshold < 0.0 {
            bail!("--threshold-km must be a non-negative number, got {}", threshold);
        }
    }

    let mut stats = PrepStats::default();

    // Phase 1: Load stations
    log::info!("");
    log::info!("Phase 1: Loading stations...");
    let loaded = read_stations(&args.stations).context("Failed to load stations")?;
    stats.station_count = loaded.features.len();
    log::info!("  Loaded {} station features ({:?})", loaded.features.len(), loaded.format);

    // Phase 2: Group stations
    log::info!("");
    log::info!("Phase 2: Grouping stations...");
    let pipeline = args.pipeline.unwrap_or_else(|| Pipeline::for_format(loaded.format));
    let mut config = pipeline.cluster_config();
    if let Some(threshold) = args.threshold_km {
        config = config.with_threshold_km(threshold);
    }
    for name in &args.excluded_names {
        config = config.with_excluded_name(name.as_str());
    }
    log::info!(
        "  Pipeline {:?}: threshold {} km, {} excluded names",
        pipeline,
        config.threshold_km,
        config.excluded_names.len()
    );

    let clustering = StationClusterer::new(config).cluster(&loaded.features);
    stats.group_count = clustering.group_count();
    log::info!("  {} features -> {} station groups", stats.station_count, stats.group_count);

    if let Some(groups_path) = &args.groups_output {
        write_groups_csv(&loaded.features, &clustering, groups_path)
            .context("Failed to write station groups")?;
    }

    // Phase 3: Build railway graphs
    log::info!("");
    log::info!("Phase 3: Building railway graphs...");
    let records = read_next_stations(&args.next_stations).context("Failed to load next stations")?;
    log::info!("  Loaded {} next-station records", records.len());

    let network = StaticRailNetwork::from_records(&loaded.features, &records)
        .context("Next-station data does not match the station list")?;
    log::info!("  Built {} railway graphs", network.len());

    // Phase 4: Trace paths
    log::info!("");
    log::info!("Phase 4: Tracing paths...");
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Tracing {} railways", network.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let service = RailPathService::new(network);
    let railways = service.par_all_paths();
    pb.finish_and_clear();

    stats.record_paths(&railways);
    log::info!("  Traced {} paths", stats.path_count());

    // Phase 5: Write output
    log::info!("");
    log::info!("Phase 5: Writing output...");
    stats.feature_count =
        write_paths_geojson(&railways, &args.output).context("Failed to write path GeoJSON")?;

    if let Some(rows_path) = &args.rows_output {
        stats.row_count =
            write_path_rows_csv(&railways, rows_path).context("Failed to write path rows")?;
    }

    // Summary
    log::info!("");
    stats.log_summary();
    log::info!("");
    log::info!("Output written to: {}", args.output.display());
    log::info!("Done!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_pipeline_defaults() {
        assert_eq!(Pipeline::for_format(StationFormat::Records), Pipeline::Primary);
        assert_eq!(Pipeline::for_format(StationFormat::GeoJson), Pipeline::Geojson);
        assert_eq!(
            Pipeline::Geojson.cluster_config().threshold_km,
            ClusterConfig::GEOJSON_THRESHOLD_KM
        );
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "rail-prep",
            "--stations",
            "s.json",
            "--next-stations",
            "n.json",
            "--output",
            "out.geojson",
            "--pipeline",
            "geojson",
            "--exclude",
            "堀田",
            "--exclude",
            "大手町",
        ])
        .unwrap();

        assert_eq!(args.pipeline, Some(Pipeline::Geojson));
        assert_eq!(args.excluded_names, vec!["堀田", "大手町"]);
        assert!(args.rows_output.is_none());
    }
}
