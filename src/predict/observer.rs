use serde::Serialize;

/// Fixed observing site on the WGS-84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let elevation_km = self.elevation_m / 1000.0;
        [
            (n + elevation_km) * cos_lat * lon.cos(),
            (n + elevation_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + elevation_km) * sin_lat,
        ]
    }

    /// East, north and up components of an Earth-fixed point relative to the site
    pub fn enu_offset_km(&self, target_ecef_km: [f64; 3]) -> [f64; 3] {
        let site = self.position_ecef_km();
        let [dx, dy, dz] = [
            target_ecef_km[0] - site[0],
            target_ecef_km[1] - site[1],
            target_ecef_km[2] - site[2],
        ];
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();

        // projection onto the site's meridian in the equatorial plane
        let radial = cos_lon * dx + sin_lon * dy;
        [
            cos_lon * dy - sin_lon * dx,
            cos_lat * dz - sin_lat * radial,
            cos_lat * radial + sin_lat * dz,
        ]
    }
}
