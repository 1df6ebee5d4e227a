use chrono::{DateTime, Utc};

use crate::config::{Config, Strategy};
use crate::elements::{ElementSource, ElementStore, FetchError, FetchStatus, Fetcher, FreshnessGate};
use crate::error::Error;
use crate::predict::{
    sample_visibility, scan_passes, PassFilter, Satellite, ScanWindow, Sgp4Track, SolarEphemeris,
};
use crate::report::{parse_zone, Report, ReportHeader};

/// Refreshes the store from the configured source when the gate allows it
pub fn refresh<S, F>(config: &Config, store: &S, source: F) -> Result<FetchStatus, Error>
where
    S: ElementStore,
    F: ElementSource,
{
    let gate = FreshnessGate::new(config.min_fetch_interval()?);
    let fetcher = Fetcher::new(store, source, gate, config.artifact_path());

    match fetcher.ensure_fresh(&config.source_url) {
        Ok(status) => Ok(status),
        Err(FetchError::Store(e)) => Err(e.into()),
        Err(e) if config.fetch.allow_stale => {
            log::warn!("Fetch failed, continuing with stored element sets: {}", e);
            Ok(FetchStatus::Stale)
        }
        Err(e) => Err(e.into()),
    }
}

/// Full run: refresh, look up the satellite, scan from `now`, filter, report.
///
/// Any error aborts the run; no partial report is produced.
pub fn generate_report<S, F, Sun>(
    config: &Config,
    store: &S,
    source: F,
    sun: Sun,
    now: DateTime<Utc>,
) -> Result<Report, Error>
where
    S: ElementStore,
    F: ElementSource,
    Sun: SolarEphemeris,
{
    let observer = config.observer()?;
    let zone = parse_zone(&config.display.time_zone)?;
    let resolution = config.resolution()?;

    let status = refresh(config, store, source)?;
    log::info!("{}", status);

    let record = store
        .latest_for(&config.satellite)?
        .ok_or_else(|| Error::NotFound(config.satellite.clone()))?;
    let satellite = Satellite::from_record(&record)?;

    let window = ScanWindow::starting_at(now, config.scan.range_days);
    log::info!(
        "Scanning {} from {} to {} ({} days)",
        satellite.name,
        window.start,
        window.end,
        window.length().num_days()
    );

    log::debug!(
        "Night is {} twilight ({}°), minimum culmination {}°",
        config.filter.twilight,
        config.filter.twilight.threshold_deg(),
        config.filter.min_altitude_deg
    );

    let track = Sgp4Track::new(&satellite, observer, resolution)?;
    let filter = PassFilter::new(
        sun,
        observer,
        config.filter.twilight.threshold_deg(),
        config.filter.min_altitude_deg,
    );

    let header = ReportHeader {
        satellite: satellite.name.clone(),
        observer,
        window,
        elements_created_on: record.created_on,
    };

    let report = match config.scan.strategy {
        Strategy::Events => {
            let candidates = scan_passes(&track, &satellite.name, window, config.scan.horizon_deg)?;
            Report::passes(header, filter.apply(candidates), zone)
        }
        Strategy::Sampling => {
            let samples = sample_visibility(
                &track,
                &filter,
                window,
                resolution,
                config.filter.min_altitude_deg,
            )?;
            Report::samples(header, samples, zone)
        }
    };

    Ok(report)
}
