use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bus_assistant_core::transit::StopMatch;
use bus_assistant_core::{JsonStopSource, ServiceConfig, StopIndexService};
use clap::{Parser, Subcommand};
use geo::{Point, Rect, coord};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stop-finder",
    author,
    version,
    about = "Look up Christchurch Metro stops near a point",
    long_about = "Loads a stop dataset (stop_information.json format), builds the spatial \
                  stop index, and answers nearby, nearest, map-region, and favourite-stop \
                  queries against it."
)]
struct Args {
    /// TOML config file (radius, listing length, walking speed, favourites)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop dataset JSON file; overrides `stop_file` from the config
    #[arg(short, long)]
    stops: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stops within a radius of a point, closest first
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Search radius in meters (defaults to the configured nearby radius)
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// The closest stops to a point
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Number of stops (defaults to the configured listing length)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Stops inside a latitude/longitude rectangle
    Region {
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
    },
    /// Details for one stop number
    Stop { number: String },
    /// Configured favourite stops ordered by walking time
    Favourites {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    let Some(stop_file) = args.stops.clone().or_else(|| config.stop_file.clone()) else {
        bail!("No stop dataset given: pass --stops or set stop_file in the config");
    };

    let service = StopIndexService::new(config);
    let status = service
        .reload(&JsonStopSource::new(&stop_file))
        .with_context(|| format!("Failed to build stop index from {}", stop_file.display()))?;
    debug!(stops = status.stop_count, "stop index ready");

    match args.command {
        Command::Nearby { lat, lon, radius } => {
            let center = Point::new(lon, lat);
            let results = match radius {
                Some(radius) => service.query(center, radius)?,
                None => service.nearby(center)?,
            };
            print_matches(&results);
        }
        Command::Nearest { lat, lon, count } => {
            let center = Point::new(lon, lat);
            let count = count.unwrap_or(service.config().nearest_count);
            print_matches(&service.nearest(center, count)?);
        }
        Command::Region {
            south,
            west,
            north,
            east,
        } => {
            let region = region_from_bounds(south, west, north, east)?;
            print_matches(&service.region(region)?);
        }
        Command::Stop { number } => {
            let stop = service.stop(&number)?;
            println!("{} {} ({})", stop.number, stop.name, stop.road_name);
            println!("  tag:      {}", stop.tag);
            println!("  location: {:.6}, {:.6}", stop.latitude(), stop.longitude());
            println!("  lines:    {}", format_lines(&stop.lines));
        }
        Command::Favourites { lat, lon } => {
            let etas = service.favourites(Point::new(lon, lat))?;
            if etas.is_empty() {
                println!("No favourite stops configured");
            }
            for eta in etas {
                println!(
                    "{:>6}  {:<32} {:>6.0} m  {:>3} min walk",
                    eta.stop.number,
                    eta.stop.name,
                    eta.distance_m,
                    eta.walk_minutes()
                );
            }
        }
    }

    Ok(())
}

fn region_from_bounds(south: f64, west: f64, north: f64, east: f64) -> Result<Rect> {
    if south > north || west > east {
        bail!("Region bounds are inverted: south {south} north {north}, west {west} east {east}");
    }
    Ok(Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north }))
}

fn format_lines(lines: &[bus_assistant_core::transit::BusLine]) -> String {
    if lines.is_empty() {
        return "-".to_string();
    }
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_match(m: &StopMatch) -> String {
    format!(
        "{:>6}  {:<32} {:<20} {:>6.0} m  [{}]",
        m.stop.number,
        m.stop.name,
        m.stop.road_name,
        m.distance_m,
        format_lines(&m.stop.lines)
    )
}

fn print_matches(matches: &[StopMatch]) {
    if matches.is_empty() {
        println!("No stops nearby");
        return;
    }
    for m in matches {
        println!("{}", format_match(m));
    }
}
