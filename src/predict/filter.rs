use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::predict::observer::ObserverLocation;
use crate::predict::oracle::SolarEphemeris;
use crate::predict::types::Pass;

pub const DEFAULT_MIN_CULMINATION_ALT_DEG: f64 = 15.0;

/// Sun altitude below which the sky counts as night
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Twilight {
    /// Sun below -6°
    #[default]
    Civil,
    /// Sun below -12°
    Nautical,
    /// Sun below -18°
    Astronomical,
}

impl Twilight {
    pub fn threshold_deg(self) -> f64 {
        match self {
            Twilight::Civil => -6.0,
            Twilight::Nautical => -12.0,
            Twilight::Astronomical => -18.0,
        }
    }
}

/// Keeps passes that culminate high enough while the observer's sky is dark
pub struct PassFilter<S> {
    sun: S,
    observer: ObserverLocation,
    night_threshold_deg: f64,
    min_culmination_alt_deg: f64,
}

impl<S: SolarEphemeris> PassFilter<S> {
    pub fn new(
        sun: S,
        observer: ObserverLocation,
        night_threshold_deg: f64,
        min_culmination_alt_deg: f64,
    ) -> Self {
        Self {
            sun,
            observer,
            night_threshold_deg,
            min_culmination_alt_deg,
        }
    }

    pub fn is_night(&self, at: DateTime<Utc>) -> bool {
        self.sun.solar_altitude_deg(&self.observer, at) < self.night_threshold_deg
    }

    pub fn meets_min_altitude(&self, pass: &Pass) -> bool {
        pass.culmination_altitude_deg() >= self.min_culmination_alt_deg
    }

    pub fn accepts(&self, pass: &Pass) -> bool {
        self.meets_min_altitude(pass) && self.is_night(pass.culmination().at)
    }

    pub fn apply(&self, passes: Vec<Pass>) -> Vec<Pass> {
        let candidates = passes.len();
        let accepted: Vec<Pass> = passes.into_iter().filter(|p| self.accepts(p)).collect();
        log::info!("{} of {} passes are visible", accepted.len(), candidates);
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::types::{EventKind, PassEvent};
    use chrono::{Duration, TimeZone, Timelike};

    /// Sun below the horizon from 18:00 to 06:00 UTC, high otherwise
    struct FixedSun;

    impl SolarEphemeris for FixedSun {
        fn solar_altitude_deg(&self, _observer: &ObserverLocation, at: DateTime<Utc>) -> f64 {
            match at.hour() {
                18..=23 | 0..=5 => -20.0,
                _ => 30.0,
            }
        }
    }

    fn pass_culminating_at(hour: u32, altitude_deg: f64) -> Pass {
        let culmination = Utc.with_ymd_and_hms(2025, 8, 16, hour, 30, 0).unwrap();
        let event = |kind, at| PassEvent {
            kind,
            at,
            altitude_deg: if kind == EventKind::Culmination { altitude_deg } else { 0.0 },
            azimuth_deg: 10.0,
        };
        Pass::new(
            "ISS (ZARYA)",
            event(EventKind::Rise, culmination - Duration::minutes(5)),
            event(EventKind::Culmination, culmination),
            event(EventKind::Set, culmination + Duration::minutes(5)),
        )
        .unwrap()
    }

    fn filter() -> PassFilter<FixedSun> {
        PassFilter::new(
            FixedSun,
            ObserverLocation::new(0.0, 0.0, 0.0),
            Twilight::Civil.threshold_deg(),
            DEFAULT_MIN_CULMINATION_ALT_DEG,
        )
    }

    #[test]
    fn altitude_boundary_is_inclusive() {
        let filter = filter();
        assert!(filter.accepts(&pass_culminating_at(22, 15.0)));
        assert!(!filter.accepts(&pass_culminating_at(22, 14.99)));
    }

    #[test]
    fn daytime_pass_is_rejected() {
        let filter = filter();
        let pass = pass_culminating_at(12, 80.0);
        assert!(filter.meets_min_altitude(&pass));
        assert!(!filter.is_night(pass.culmination().at));
        assert!(!filter.accepts(&pass));
    }

    #[test]
    fn apply_is_idempotent() {
        let filter = filter();
        let passes = vec![
            pass_culminating_at(2, 50.0),
            pass_culminating_at(9, 50.0),
            pass_culminating_at(20, 10.0),
            pass_culminating_at(21, 15.0),
        ];

        let once = filter.apply(passes.clone());
        let twice = filter.apply(once.clone());

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
        assert_eq!(filter.apply(passes), once);
    }

    #[test]
    fn twilight_thresholds() {
        assert_eq!(Twilight::default(), Twilight::Civil);
        assert_eq!(Twilight::Civil.threshold_deg(), -6.0);
        assert_eq!(Twilight::Nautical.threshold_deg(), -12.0);
        assert_eq!(Twilight::Astronomical.to_string(), "astronomical");
    }
}
