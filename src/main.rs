use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use station_lookup::api::{NominatimClient, OverpassClient};
use station_lookup::config::{FileConfig, ResolverConfig};
use station_lookup::domain::{LookupResult, TransportError, load_station_list};
use station_lookup::logging::init_logger;
use station_lookup::output::write_results;
use station_lookup::{Progress, Resolver};

/// Look up coordinates for railway stations via Nominatim, falling back to
/// Overpass for stations the geocoder does not know.
///
/// Examples:
///   # Resolve the built-in station list
///   station-lookup
///
///   # Use a contact email and a custom list
///   station-lookup --email ops@example.org --stations konkan.txt -o konkan.json
#[derive(Parser, Debug)]
#[command(name = "station-lookup")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches station-lookup.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Contact email sent in the From header and User-Agent (empty to omit)
    #[arg(short = 'e', long)]
    email: Option<String>,

    /// Output JSON file path (defaults to station-lookup-results.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// File with one station name per line (defaults to the built-in list)
    #[arg(short = 's', long)]
    stations: Option<PathBuf>,

    /// Pause between stations in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Prints the per-station narration above a progress bar.
///
/// Lines go through `suspend` rather than `ProgressBar::println` so they
/// still reach stdout when the bar is hidden (non-terminal output).
struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.green} {pos}/{len} stations") {
            bar.set_style(style);
        }
        Self { bar }
    }

    fn say(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
    }
}

impl Progress for ConsoleProgress {
    fn looking_up(&mut self, query: &str) {
        self.say(&format!("Looking up: {}", query));
    }

    fn primary_missed(&mut self, _name: &str) {
        self.say(" -> NOT FOUND in Nominatim, trying Overpass...");
    }

    fn resolved(&mut self, result: &LookupResult) {
        self.say(&describe(result));
        self.bar.inc(1);
    }
}

fn describe(result: &LookupResult) -> String {
    match result {
        LookupResult::Primary {
            display_name,
            lat,
            lon,
            ..
        } => format!(
            " -> {} {} - {}",
            lat.as_deref().unwrap_or("?"),
            lon.as_deref().unwrap_or("?"),
            display_name.as_deref().unwrap_or("?")
        ),
        LookupResult::Fallback {
            display_name,
            lat,
            lon,
            ..
        } => format!(
            " -> Overpass found: {} {} - {}",
            lat,
            lon,
            display_name.as_deref().unwrap_or("?")
        ),
        LookupResult::NotFound { .. } => " -> NOT FOUND".to_string(),
        LookupResult::Failed { error, .. } => match error {
            TransportError::Status(_) => format!(" -> {}", error),
            TransportError::Request(_) => format!(" -> ERROR {}", error),
        },
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);
    let start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => Some(FileConfig::load_from(path)?),
        None => FileConfig::load(),
    };
    let mut config = ResolverConfig::from_file(file_config);

    if let Some(email) = args.email {
        config.contact_email = Some(email);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(ms) = args.delay_ms {
        config.delay = Duration::from_millis(ms);
    }
    if let Some(ref path) = args.stations {
        config.stations = load_station_list(path)?;
    }

    tracing::debug!(
        stations = config.stations.len(),
        user_agent = %config.user_agent(),
        "starting lookup run"
    );

    let primary = NominatimClient::new(&config)?;
    let fallback = OverpassClient::new(&config)?;
    let resolver = Resolver::new(primary, fallback, &config);

    let mut progress = ConsoleProgress::new(config.stations.len());
    let results = resolver.run(&config.stations, &mut progress);
    progress.bar.finish_and_clear();

    let output_path = std::env::current_dir()
        .context("Failed to resolve working directory")?
        .join(&config.output);
    write_results(&output_path, &results).context("Failed to write results file")?;

    tracing::info!(
        "Resolved {} stations in {:.1}s",
        results.len(),
        start.elapsed().as_secs_f32()
    );

    let file_name = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_path.display().to_string());
    println!();
    println!("Saved results to {}", output_path.display());
    println!(
        "Please review {} before injecting the coordinates into the map.",
        file_name
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use station_lookup::domain::{FallbackMatch, PrimaryMatch};

    #[test]
    fn test_describe_outcome_lines() {
        let primary = LookupResult::from_primary(
            "VIRAR",
            PrimaryMatch {
                display_name: Some("Virar Railway Station, Maharashtra, India".into()),
                lat: Some("19.4559".into()),
                lon: Some("72.8135".into()),
                kind: Some("station".into()),
            },
        );
        assert_eq!(
            describe(&primary),
            " -> 19.4559 72.8135 - Virar Railway Station, Maharashtra, India"
        );

        let fallback = LookupResult::from_fallback(
            "Karambeli",
            FallbackMatch {
                display_name: Some("Karambeli".into()),
                lat: 20.4455,
                lon: 72.9012,
            },
        );
        assert_eq!(
            describe(&fallback),
            " -> Overpass found: 20.4455 72.9012 - Karambeli"
        );

        assert_eq!(describe(&LookupResult::not_found("Ancheli")), " -> NOT FOUND");
        assert_eq!(
            describe(&LookupResult::failed("Vapi", TransportError::Status(503))),
            " -> HTTP 503"
        );
        assert_eq!(
            describe(&LookupResult::failed(
                "Vapi",
                TransportError::Request("connection refused".into())
            )),
            " -> ERROR connection refused"
        );
    }

    #[test]
    fn test_describe_missing_primary_fields() {
        let sparse = LookupResult::from_primary("Atul", PrimaryMatch::default());
        assert_eq!(describe(&sparse), " -> ? ? - ?");
    }
}
