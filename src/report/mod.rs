mod error;
mod timezone;

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::predict::{ObserverLocation, Pass, ScanWindow, VisibilitySample};

pub use error::ReportError;
pub use timezone::{parse_zone, to_zone};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// What a report is about
#[derive(Debug, Clone, Serialize)]
pub struct ReportHeader {
    pub satellite: String,
    pub observer: ObserverLocation,
    pub window: ScanWindow,
    pub elements_created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportBody {
    Passes(Vec<Pass>),
    Samples(Vec<VisibilitySample>),
}

/// How a report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    header: &'a ReportHeader,
    time_zone: &'a str,
    #[serde(flatten)]
    body: &'a ReportBody,
}

/// Chronological, display-ready list of visible passes or samples
#[derive(Debug, Clone)]
pub struct Report {
    header: ReportHeader,
    body: ReportBody,
    zone: Tz,
}

impl Report {
    pub fn passes(header: ReportHeader, mut passes: Vec<Pass>, zone: Tz) -> Self {
        debug_assert!(passes.iter().all(|p| p.satellite() == header.satellite));
        passes.sort_by_key(|p| p.rise().at);
        Self {
            header,
            body: ReportBody::Passes(passes),
            zone,
        }
    }

    pub fn samples(header: ReportHeader, mut samples: Vec<VisibilitySample>, zone: Tz) -> Self {
        samples.sort_by_key(|s| s.at);
        Self {
            header,
            body: ReportBody::Samples(samples),
            zone,
        }
    }

    #[cfg(test)]
    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    #[cfg(test)]
    pub fn body(&self) -> &ReportBody {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        match &self.body {
            ReportBody::Passes(passes) => passes.is_empty(),
            ReportBody::Samples(samples) => samples.is_empty(),
        }
    }

    /// Machine-readable form; timestamps stay in UTC
    pub fn to_json(&self) -> Result<String, ReportError> {
        let report = JsonReport {
            header: &self.header,
            time_zone: self.zone.name(),
            body: &self.body,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, ReportError> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => self.to_json(),
        }
    }

    fn time(&self, instant: DateTime<Utc>) -> String {
        to_zone(instant, self.zone).format(TIME_FORMAT).to_string()
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = &self.header;
        writeln!(
            f,
            "Passes of satellite '{}' over location ({}, {}, {} m) from {} to {} ({} days).",
            header.satellite,
            header.observer.latitude_deg,
            header.observer.longitude_deg,
            header.observer.elevation_m,
            self.time(header.window.start),
            self.time(header.window.end),
            header.window.length().num_days(),
        )?;
        writeln!(f, "Element set from {}.", self.time(header.elements_created_on))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        if self.is_empty() {
            return Ok(());
        }

        match &self.body {
            ReportBody::Passes(passes) => {
                writeln!(
                    f,
                    "{:<24} | {:<24} | {:<24} | {:>7} | {:>8} | Azimuth rise / max / set",
                    "Rise", "Culmination", "Set", "Max alt", "Duration"
                )?;
                for pass in passes {
                    writeln!(
                        f,
                        "{:<24} | {:<24} | {:<24} | {:>6.1}° | {:>8} | {:.1}° / {:.1}° / {:.1}°",
                        self.time(pass.rise().at),
                        self.time(pass.culmination().at),
                        self.time(pass.set().at),
                        pass.culmination_altitude_deg(),
                        humantime::format_duration(pass.duration().to_std().unwrap_or_default())
                            .to_string(),
                        pass.rise().azimuth_deg,
                        pass.culmination().azimuth_deg,
                        pass.set().azimuth_deg,
                    )?;
                }
            }
            ReportBody::Samples(samples) => {
                for sample in samples {
                    writeln!(
                        f,
                        "{} | altitude: {:.1}°, azimuth: {:.1}°",
                        self.time(sample.at),
                        sample.altitude_deg,
                        sample.azimuth_deg
                    )?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{assemble_passes, EventKind, PassEvent};
    use chrono::{Duration, TimeZone};

    fn header() -> ReportHeader {
        let start = Utc.with_ymd_and_hms(2025, 8, 16, 12, 0, 0).unwrap();
        ReportHeader {
            satellite: "ISS (ZARYA)".to_string(),
            observer: ObserverLocation::new(50.0647, 19.945, 220.0),
            window: ScanWindow::starting_at(start, 2),
            elements_created_on: start - Duration::hours(1),
        }
    }

    fn passes() -> Vec<Pass> {
        let event = |kind, hour, minute, altitude_deg, azimuth_deg| PassEvent {
            kind,
            at: Utc.with_ymd_and_hms(2025, 8, 16, hour, minute, 0).unwrap(),
            altitude_deg,
            azimuth_deg,
        };
        let mut passes = assemble_passes(
            "ISS (ZARYA)",
            vec![
                event(EventKind::Rise, 20, 0, 0.0, 250.04),
                event(EventKind::Culmination, 20, 5, 47.26, 180.0),
                event(EventKind::Set, 20, 10, 0.0, 110.96),
                event(EventKind::Rise, 21, 35, 0.0, 270.0),
                event(EventKind::Culmination, 21, 40, 22.0, 300.0),
                event(EventKind::Set, 21, 45, 0.0, 330.0),
            ],
        )
        .unwrap();
        passes.reverse();
        passes
    }

    #[test]
    fn passes_are_listed_chronologically_in_display_zone() {
        let zone = parse_zone("Europe/Warsaw").unwrap();
        let text = Report::passes(header(), passes(), zone).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Passes of satellite 'ISS (ZARYA)' over location (50.0647, 19.945, 220 m)"));
        assert!(lines[0].contains("from 2025-08-16 14:00:00 CEST to 2025-08-18 14:00:00 CEST (2 days)"));
        assert_eq!(lines[1], "Element set from 2025-08-16 13:00:00 CEST.");
        assert!(lines[3].starts_with("2025-08-16 22:00:00 CEST | 2025-08-16 22:05:00 CEST"));
        assert!(lines[3].contains("47.3°"));
        assert!(lines[3].contains("|      10m |"));
        assert!(lines[3].ends_with("250.0° / 180.0° / 111.0°"));
        assert!(lines[4].starts_with("2025-08-16 23:35:00 CEST"));
    }

    #[test]
    fn empty_result_prints_only_the_header() {
        let report = Report::passes(header(), Vec::new(), Tz::UTC);
        assert!(report.is_empty());

        let text = report.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("from 2025-08-16 12:00:00 UTC"));
    }

    #[test]
    fn json_keeps_utc_timestamps_and_body_kind() {
        let zone = parse_zone("Europe/Warsaw").unwrap();
        let report = Report::passes(header(), passes(), zone);
        let json = report.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["satellite"], "ISS (ZARYA)");
        assert_eq!(value["time_zone"], "Europe/Warsaw");
        assert_eq!(value["observer"]["elevation_m"], 220.0);
        let passes = value["passes"].as_array().unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0]["rise"]["at"], "2025-08-16T20:00:00Z");
        assert_eq!(passes[0]["culmination"]["kind"], "Culmination");
        assert_eq!(report.render(OutputFormat::Text).unwrap(), report.to_string());
    }

    #[test]
    fn samples_use_one_decimal() {
        let sample = VisibilitySample {
            at: Utc.with_ymd_and_hms(2025, 8, 16, 20, 1, 0).unwrap(),
            altitude_deg: 23.456,
            azimuth_deg: 7.04,
        };
        let text = Report::samples(header(), vec![sample], Tz::UTC).to_string();
        assert_eq!(
            text.lines().last().unwrap(),
            "2025-08-16 20:01:00 UTC | altitude: 23.5°, azimuth: 7.0°"
        );
    }
}
