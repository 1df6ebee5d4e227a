use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::{look_angles, Satellite};
use crate::predict::types::{AltAz, EventKind, HorizonEvent};

const FINE_STEP_SECONDS: i64 = 1;

/// Position oracle for one satellite seen from one observer
pub trait TrackOracle {
    fn alt_az(&self, at: DateTime<Utc>) -> Result<AltAz, PredictError>;

    /// Time-ordered rise / culmination / set events relative to `threshold_deg`.
    ///
    /// A pass already in progress at `start`, or still in progress at `end`,
    /// yields only the events that fall inside the window.
    fn horizon_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        threshold_deg: f64,
    ) -> Result<Vec<HorizonEvent>, PredictError>;
}

pub trait SolarEphemeris {
    /// Geometric altitude of the Sun's centre, in degrees
    fn solar_altitude_deg(&self, observer: &ObserverLocation, at: DateTime<Utc>) -> f64;
}

/// SGP4-backed [`TrackOracle`].
///
/// Events are found with a coarse scan at `step`, threshold crossings are
/// bisected down to one second and each above-threshold segment's maximum is
/// refined with a ternary search.
pub struct Sgp4Track<'a> {
    satellite: &'a Satellite,
    observer: ObserverLocation,
    step: Duration,
}

impl<'a> Sgp4Track<'a> {
    pub fn new(
        satellite: &'a Satellite,
        observer: ObserverLocation,
        step: Duration,
    ) -> Result<Self, PredictError> {
        if step <= Duration::zero() {
            return Err(PredictError::InvalidStep(step));
        }
        Ok(Self {
            satellite,
            observer,
            step,
        })
    }

    fn altitude_deg(&self, at: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(self.alt_az(at)?.altitude_deg)
    }

    fn coarse_samples(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, f64)>, PredictError> {
        let mut samples = Vec::new();
        let mut cursor = start;
        while cursor < end {
            samples.push((cursor, self.altitude_deg(cursor)?));
            cursor += self.step;
        }
        samples.push((end, self.altitude_deg(end)?));
        Ok(samples)
    }

    /// Binary search for the threshold crossing between `before` and `after`
    fn refine_crossing(
        &self,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        rising: bool,
        threshold_deg: f64,
    ) -> Result<DateTime<Utc>, PredictError> {
        let mut low = before;
        let mut high = after;

        while (high - low).num_seconds() > FINE_STEP_SECONDS {
            let mid = low + (high - low) / 2;
            let above = self.altitude_deg(mid)? >= threshold_deg;
            if above == rising {
                high = mid;
            } else {
                low = mid;
            }
        }

        Ok(high)
    }

    /// Ternary search for the altitude maximum inside `(low, high)`
    fn refine_maximum(
        &self,
        mut low: DateTime<Utc>,
        mut high: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, PredictError> {
        while (high - low).num_seconds() > FINE_STEP_SECONDS {
            let third = (high - low) / 3;
            let left = low + third;
            let right = high - third;
            if self.altitude_deg(left)? < self.altitude_deg(right)? {
                low = left;
            } else {
                high = right;
            }
        }

        Ok(low + (high - low) / 2)
    }

    fn culmination(
        &self,
        samples: &[(DateTime<Utc>, f64)],
        segment: std::ops::Range<usize>,
        rise: Option<DateTime<Utc>>,
        set: Option<DateTime<Utc>>,
    ) -> Result<Option<DateTime<Utc>>, PredictError> {
        let Some(peak) = segment
            .clone()
            .max_by(|a, b| samples[*a].1.total_cmp(&samples[*b].1))
        else {
            return Ok(None);
        };

        // a maximum on the window edge is not a culmination
        if peak == 0 || peak == samples.len() - 1 {
            return Ok(None);
        }

        let mut low = samples[peak - 1].0;
        let mut high = samples[peak + 1].0;
        if let Some(rise) = rise {
            low = low.max(rise);
        }
        if let Some(set) = set {
            high = high.min(set);
        }

        self.refine_maximum(low, high).map(Some)
    }
}

impl TrackOracle for Sgp4Track<'_> {
    fn alt_az(&self, at: DateTime<Utc>) -> Result<AltAz, PredictError> {
        look_angles(&self.observer, self.satellite, at)
    }

    fn horizon_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        threshold_deg: f64,
    ) -> Result<Vec<HorizonEvent>, PredictError> {
        if end <= start {
            return Ok(Vec::new());
        }

        let samples = self.coarse_samples(start, end)?;
        let mut events = Vec::new();

        let mut segment_start = (samples[0].1 >= threshold_deg).then_some(0);
        let mut rise = None;

        for i in 1..samples.len() {
            let was_above = samples[i - 1].1 >= threshold_deg;
            let above = samples[i].1 >= threshold_deg;

            if above && !was_above {
                let at = self.refine_crossing(samples[i - 1].0, samples[i].0, true, threshold_deg)?;
                events.push(HorizonEvent {
                    at,
                    kind: EventKind::Rise,
                });
                rise = Some(at);
                segment_start = Some(i);
            } else if !above && was_above {
                let set = self.refine_crossing(samples[i - 1].0, samples[i].0, false, threshold_deg)?;
                if let Some(first) = segment_start.take() {
                    if let Some(at) = self.culmination(&samples, first..i, rise, Some(set))? {
                        events.push(HorizonEvent {
                            at,
                            kind: EventKind::Culmination,
                        });
                    }
                }
                events.push(HorizonEvent {
                    at: set,
                    kind: EventKind::Set,
                });
                rise = None;
            }
        }

        if let Some(first) = segment_start {
            if let Some(at) = self.culmination(&samples, first..samples.len(), rise, None)? {
                events.push(HorizonEvent {
                    at,
                    kind: EventKind::Culmination,
                });
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ISS_L1: &str = "1 25544U 98067A   25227.50399417  .00010432  00000+0  19089-3 0  9995";
    const ISS_L2: &str = "2 25544  51.6349  13.0597 0003557 220.9474 139.1248 15.49942616524368";

    fn krakow() -> ObserverLocation {
        ObserverLocation::new(50.0647, 19.9450, 220.0)
    }

    #[test]
    fn rejects_non_positive_step() {
        let satellite = Satellite::from_lines("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        assert!(matches!(
            Sgp4Track::new(&satellite, krakow(), Duration::zero()),
            Err(PredictError::InvalidStep(_))
        ));
    }

    #[test]
    fn look_angles_are_in_range() {
        let satellite = Satellite::from_lines("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        let track = Sgp4Track::new(&satellite, krakow(), Duration::minutes(1)).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();

        for hour in 0..24 {
            let position = track.alt_az(start + Duration::hours(hour)).unwrap();
            assert!((-90.0..=90.0).contains(&position.altitude_deg));
            assert!((0.0..360.0).contains(&position.azimuth_deg));
        }
    }

    #[test]
    fn iss_events_are_ordered_and_on_the_horizon() {
        let satellite = Satellite::from_lines("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        let track = Sgp4Track::new(&satellite, krakow(), Duration::minutes(1)).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();
        let end = start + Duration::days(1);

        let events = track.horizon_events(start, end, 0.0).unwrap();

        let rises: Vec<_> = events.iter().filter(|e| e.kind == EventKind::Rise).collect();
        assert!(!rises.is_empty());
        assert!(events.windows(2).all(|w| w[0].at < w[1].at));
        assert!(events.iter().all(|e| e.at >= start && e.at <= end));

        for event in &events {
            let altitude = track.alt_az(event.at).unwrap().altitude_deg;
            match event.kind {
                EventKind::Rise | EventKind::Set => assert!(altitude.abs() < 0.5, "{altitude}"),
                EventKind::Culmination => assert!(altitude > 0.0),
            }
        }

        // every rise that is followed by another event is followed by its culmination
        for pair in events.windows(2) {
            if pair[0].kind == EventKind::Rise {
                assert_eq!(pair[1].kind, EventKind::Culmination);
            }
        }
    }

    #[test]
    fn empty_window_has_no_events() {
        let satellite = Satellite::from_lines("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        let track = Sgp4Track::new(&satellite, krakow(), Duration::minutes(1)).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();
        assert!(track.horizon_events(start, start, 0.0).unwrap().is_empty());
    }
}
