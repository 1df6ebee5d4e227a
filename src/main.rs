mod config;
mod elements;
mod error;
mod pipeline;
mod predict;
mod report;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

use crate::config::{Config, Strategy};
use crate::elements::{ElementStore, FileStore, HttpSource, RetentionPolicy};
use crate::error::Error;
use crate::predict::{LowPrecisionSun, Twilight};
use crate::report::OutputFormat;

#[derive(Parser)]
#[command(name = "sat-pass")]
#[command(about = "Predict night-time satellite passes over an observer")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict visible passes and print them
    Predict(PredictArgs),
    /// Refresh element sets if the stored ones are stale
    Fetch,
    /// List satellites present in the element store with their newest record
    Satellites,
    /// Print one stored element set by record id
    Show {
        #[arg(value_name = "ID")]
        id: Uuid,
    },
    /// Drop old element sets, keeping the newest per satellite
    Prune {
        /// Overrides retention.keep_latest
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        keep_latest: Option<u32>,
    },
}

#[derive(Args)]
struct PredictArgs {
    /// Observer latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Observer elevation in meters
    #[arg(long, allow_negative_numbers = true)]
    elevation_m: Option<f64>,
    /// Satellite name as listed by the element source
    #[arg(long)]
    satellite: Option<String>,
    /// Days to scan ahead (at most 31)
    #[arg(long)]
    range_days: Option<u32>,
    /// Minimum culmination altitude in degrees
    #[arg(long)]
    min_altitude_deg: Option<f64>,
    #[arg(long, value_enum)]
    twilight: Option<Twilight>,
    /// Display time zone, e.g. Europe/Warsaw
    #[arg(long)]
    timezone: Option<String>,
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Use stored element sets if the source cannot be reached
    #[arg(long)]
    allow_stale: bool,
}

impl PredictArgs {
    fn apply(self, config: &mut Config) {
        if let Some(lat) = self.lat {
            config.observer.latitude_deg = Some(lat);
        }
        if let Some(lon) = self.lon {
            config.observer.longitude_deg = Some(lon);
        }
        if let Some(elevation_m) = self.elevation_m {
            config.observer.elevation_m = elevation_m;
        }
        if let Some(satellite) = self.satellite {
            config.satellite = satellite;
        }
        if let Some(range_days) = self.range_days {
            config.scan.range_days = range_days;
        }
        if let Some(min_altitude_deg) = self.min_altitude_deg {
            config.filter.min_altitude_deg = min_altitude_deg;
        }
        if let Some(twilight) = self.twilight {
            config.filter.twilight = twilight;
        }
        if let Some(timezone) = self.timezone {
            config.display.time_zone = timezone;
        }
        if let Some(strategy) = self.strategy {
            config.scan.strategy = strategy;
        }
        if let Some(format) = self.format {
            config.display.format = format;
        }
        if self.allow_stale {
            config.fetch.allow_stale = true;
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let result = match cli.command {
        Commands::Predict(args) => {
            args.apply(&mut config);
            predict(&config)
        }
        Commands::Fetch => fetch(&config),
        Commands::Satellites => satellites(&config),
        Commands::Show { id } => show(&config, id),
        Commands::Prune { keep_latest } => prune(&config, keep_latest),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn predict(config: &Config) -> Result<(), Error> {
    let store = FileStore::new(config.elements_path());
    let source = HttpSource::new()?;

    log::info!("Calculating passes of {}", config.satellite);
    let report =
        pipeline::generate_report(config, &store, source, LowPrecisionSun, chrono::Utc::now())?;
    println!("{}", report.render(config.display.format)?.trim_end());
    Ok(())
}

fn fetch(config: &Config) -> Result<(), Error> {
    let store = FileStore::new(config.elements_path());
    let status = pipeline::refresh(config, &store, HttpSource::new()?)?;
    println!("{}", status);
    Ok(())
}

fn satellites(config: &Config) -> Result<(), Error> {
    let store = FileStore::new(config.elements_path());
    let names = store.unique_names()?;
    if names.is_empty() {
        println!("No element sets stored in {}", store.path().display());
    }
    for name in names {
        match store.latest_for(&name)? {
            Some(record) => println!("{:<24} {} {}", name, record.created_on, record.id),
            None => println!("{}", name),
        }
    }
    Ok(())
}

fn show(config: &Config, id: Uuid) -> Result<(), Error> {
    let store = FileStore::new(config.elements_path());
    let record = store
        .get(id)?
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    println!("{}\n{}\n{}", record.sat_name, record.line1, record.line2);
    println!("Stored {}", record.created_on);
    Ok(())
}

fn prune(config: &Config, keep_latest: Option<u32>) -> Result<(), Error> {
    let policy = match keep_latest {
        Some(n) => RetentionPolicy::KeepLatest(n as usize),
        None => config.retention_policy(),
    };
    if policy == RetentionPolicy::KeepAll {
        println!("No retention policy configured, nothing to prune");
        return Ok(());
    }

    let store = FileStore::new(config.elements_path());
    let removed = store.prune(policy)?;
    println!("Removed {} element sets", removed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::predict::ObserverLocation;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_flags_override_config() {
        let cli = Cli::parse_from([
            "sat-pass",
            "predict",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
            "--range-days",
            "45",
            "--twilight",
            "astronomical",
            "--strategy",
            "sampling",
            "--timezone",
            "Australia/Sydney",
            "--format",
            "json",
        ]);
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(
            config.observer().unwrap(),
            ObserverLocation::new(-33.87, 151.21, 200.0)
        );
        assert_eq!(config.scan.range_days, 45);
        assert_eq!(config.filter.twilight, Twilight::Astronomical);
        assert_eq!(config.scan.strategy, Strategy::Sampling);
        assert_eq!(config.display.time_zone, "Australia/Sydney");
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.satellite, "ISS (ZARYA)");
        assert!(!config.fetch.allow_stale);
    }

    #[test]
    fn prune_rejects_keeping_zero() {
        assert!(Cli::try_parse_from(["sat-pass", "prune", "--keep-latest", "0"]).is_err());

        let cli = Cli::parse_from(["sat-pass", "prune", "--keep-latest", "3"]);
        assert!(matches!(cli.command, Commands::Prune { keep_latest: Some(3) }));
    }

    #[test]
    fn show_takes_a_record_id() {
        let id = Uuid::new_v4();
        let cli = Cli::parse_from(["sat-pass", "show", &id.to_string()]);
        assert!(matches!(cli.command, Commands::Show { id: parsed } if parsed == id));
        assert!(Cli::try_parse_from(["sat-pass", "show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn predict_without_coordinates_is_rejected() {
        let cli = Cli::parse_from(["sat-pass", "predict", "--lat", "50.06"]);
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };

        let mut config = Config::default();
        args.apply(&mut config);

        assert!(matches!(
            config.observer(),
            Err(ConfigError::MissingObserver("longitude"))
        ));
    }
}
