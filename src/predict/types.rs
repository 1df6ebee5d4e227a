use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::predict::error::PredictError;

/// Longest scan range accepted; longer requests are clamped
pub const MAX_SCAN_DAYS: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum EventKind {
    Rise,
    Culmination,
    Set,
}

/// Horizon event as reported by a [`TrackOracle`](super::oracle::TrackOracle)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonEvent {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AltAz {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassEvent {
    pub kind: EventKind,
    pub at: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl PassEvent {
    pub fn new(kind: EventKind, at: DateTime<Utc>, position: AltAz) -> Self {
        Self {
            kind,
            at,
            altitude_deg: position.altitude_deg,
            azimuth_deg: position.azimuth_deg,
        }
    }
}

/// One complete rise → culmination → set sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    satellite: String,
    rise: PassEvent,
    culmination: PassEvent,
    set: PassEvent,
}

impl Pass {
    pub(crate) fn new(
        satellite: &str,
        rise: PassEvent,
        culmination: PassEvent,
        set: PassEvent,
    ) -> Result<Self, PredictError> {
        let expected = [
            (rise, EventKind::Rise, "expecting rise"),
            (culmination, EventKind::Culmination, "expecting culmination"),
            (set, EventKind::Set, "expecting set"),
        ];
        for (event, kind, state) in expected {
            if event.kind != kind {
                return Err(PredictError::MalformedEventStream {
                    state,
                    event: event.kind,
                    at: event.at,
                });
            }
        }
        if culmination.at <= rise.at {
            return Err(PredictError::MalformedEventStream {
                state: "culmination not after rise",
                event: culmination.kind,
                at: culmination.at,
            });
        }
        if set.at <= culmination.at {
            return Err(PredictError::MalformedEventStream {
                state: "set not after culmination",
                event: set.kind,
                at: set.at,
            });
        }

        Ok(Self {
            satellite: satellite.to_string(),
            rise,
            culmination,
            set,
        })
    }

    pub fn satellite(&self) -> &str {
        &self.satellite
    }

    pub fn rise(&self) -> &PassEvent {
        &self.rise
    }

    pub fn culmination(&self) -> &PassEvent {
        &self.culmination
    }

    pub fn set(&self) -> &PassEvent {
        &self.set
    }

    pub fn culmination_altitude_deg(&self) -> f64 {
        self.culmination.altitude_deg
    }

    pub fn duration(&self) -> Duration {
        self.set.at - self.rise.at
    }
}

/// Scan range from `start` to `end`, at most [`MAX_SCAN_DAYS`] days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScanWindow {
    pub fn starting_at(start: DateTime<Utc>, days: u32) -> Self {
        let clamped = days.min(MAX_SCAN_DAYS);
        if clamped != days {
            log::debug!("Scan range of {} days clamped to {}", days, clamped);
        }
        Self {
            start,
            end: start + Duration::days(i64::from(clamped)),
        }
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

/// One step of the fixed-step visibility scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibilitySample {
    pub at: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}
