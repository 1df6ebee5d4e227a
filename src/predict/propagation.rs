use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::elements::ElementRecord;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::types::AltAz;

/// Parsed element set ready for SGP4 propagation
pub struct Satellite {
    pub name: String,
    pub elements: Elements,
    pub constants: Constants,
}

impl Satellite {
    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )?;
        let constants = Constants::from_elements(&elements)?;

        Ok(Self {
            name: name.to_string(),
            elements,
            constants,
        })
    }

    pub fn from_record(record: &ElementRecord) -> Result<Self, PredictError> {
        Self::from_lines(&record.sat_name, &record.line1, &record.line2)
    }
}

/// Topocentric altitude and azimuth of `satellite` seen from `observer`
pub fn look_angles(
    observer: &ObserverLocation,
    satellite: &Satellite,
    timestamp: DateTime<Utc>,
) -> Result<AltAz, PredictError> {
    let minutes = satellite
        .elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = satellite
        .constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let [east, north, up] = observer.enu_offset_km(earth_fixed(prediction.position, sidereal));
    let range_km = east.hypot(north).hypot(up);

    let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
    let altitude_deg = if range_km > 0.0 {
        (up / range_km).asin().to_degrees()
    } else {
        90.0
    };

    Ok(AltAz {
        altitude_deg,
        azimuth_deg,
    })
}

/// TEME position rotated into the Earth-fixed frame by sidereal angle `gmst`.
/// Polar motion is ignored.
fn earth_fixed(teme_km: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin, cos) = gmst.sin_cos();
    let [x, y, z] = teme_km;
    [cos * x + sin * y, cos * y - sin * x, z]
}
