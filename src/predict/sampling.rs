use chrono::Duration;

use crate::predict::error::PredictError;
use crate::predict::filter::PassFilter;
use crate::predict::oracle::{SolarEphemeris, TrackOracle};
use crate::predict::types::{ScanWindow, VisibilitySample};

/// Coarse fallback: every `step` over `window`, keep the instants where the
/// satellite is above `min_altitude_deg` (exclusive) and the sky is dark.
///
/// Samples carry no pass boundaries.
pub fn sample_visibility<T: TrackOracle, S: SolarEphemeris>(
    track: &T,
    filter: &PassFilter<S>,
    window: ScanWindow,
    step: Duration,
    min_altitude_deg: f64,
) -> Result<Vec<VisibilitySample>, PredictError> {
    if step <= Duration::zero() {
        return Err(PredictError::InvalidStep(step));
    }

    let mut samples = Vec::new();
    let mut cursor = window.start;
    while cursor <= window.end {
        let position = track.alt_az(cursor)?;
        if position.altitude_deg > min_altitude_deg && filter.is_night(cursor) {
            samples.push(VisibilitySample {
                at: cursor,
                altitude_deg: position.altitude_deg,
                azimuth_deg: position.azimuth_deg,
            });
        }
        cursor += step;
    }

    log::info!("{} visible samples at {}s resolution", samples.len(), step.num_seconds());
    Ok(samples)
}
