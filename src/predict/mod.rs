mod error;
mod filter;
mod observer;
mod oracle;
mod propagation;
mod sampling;
mod scanner;
mod sun;
mod types;

pub use error::PredictError;
pub use filter::{PassFilter, Twilight, DEFAULT_MIN_CULMINATION_ALT_DEG};
pub use observer::ObserverLocation;
pub use oracle::{SolarEphemeris, Sgp4Track};
pub use propagation::Satellite;
pub use sampling::sample_visibility;
pub use scanner::scan_passes;
pub use sun::LowPrecisionSun;
pub use types::{Pass, ScanWindow, VisibilitySample};

#[cfg(test)]
pub use scanner::assemble_passes;
#[cfg(test)]
pub use types::{EventKind, PassEvent};
