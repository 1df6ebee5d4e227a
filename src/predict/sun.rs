use chrono::{DateTime, Utc};

use crate::predict::observer::ObserverLocation;
use crate::predict::oracle::SolarEphemeris;

/// Low-precision solar coordinates (Astronomical Almanac), good to about
/// 0.01° for dates within a few decades of J2000. No refraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionSun;

impl SolarEphemeris for LowPrecisionSun {
    fn solar_altitude_deg(&self, observer: &ObserverLocation, at: DateTime<Utc>) -> f64 {
        let years = sgp4::julian_years_since_j2000(&at.naive_utc());
        let days = years * 365.25;

        let mean_longitude = (280.460 + 0.985_647_4 * days).rem_euclid(360.0);
        let mean_anomaly = (357.528 + 0.985_600_3 * days).rem_euclid(360.0).to_radians();
        let ecliptic_longitude = (mean_longitude
            + 1.915 * mean_anomaly.sin()
            + 0.020 * (2.0 * mean_anomaly).sin())
        .to_radians();
        let obliquity = (23.439 - 0.000_000_4 * days).to_radians();

        let right_ascension = (obliquity.cos() * ecliptic_longitude.sin()).atan2(ecliptic_longitude.cos());
        let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

        let sidereal = sgp4::iau_epoch_to_sidereal_time(years);
        let hour_angle = sidereal + observer.lon_rad() - right_ascension;

        let lat = observer.lat_rad();
        (lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos())
            .asin()
            .to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn greenwich() -> ObserverLocation {
        ObserverLocation::new(51.48, 0.0, 45.0)
    }

    #[test]
    fn summer_solstice_noon_and_midnight() {
        let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();

        // 90 - 51.48 + 23.44
        let high = LowPrecisionSun.solar_altitude_deg(&greenwich(), noon);
        assert!((high - 61.96).abs() < 0.5, "{high}");

        let low = LowPrecisionSun.solar_altitude_deg(&greenwich(), midnight);
        assert!((low + 15.08).abs() < 0.5, "{low}");
    }

    #[test]
    fn equinox_sunrise_near_six_local() {
        let observer = ObserverLocation::new(0.0, 0.0, 0.0);
        let dawn = Utc.with_ymd_and_hms(2024, 3, 20, 6, 7, 0).unwrap();
        let altitude = LowPrecisionSun.solar_altitude_deg(&observer, dawn);
        assert!(altitude.abs() < 1.0, "{altitude}");
    }
}
