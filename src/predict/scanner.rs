use crate::predict::error::PredictError;
use crate::predict::oracle::TrackOracle;
use crate::predict::types::{EventKind, Pass, PassEvent, ScanWindow};

enum ScanState {
    Idle,
    Rising(PassEvent),
    Culminating(PassEvent, PassEvent),
}

impl ScanState {
    fn describe(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Rising(_) => "expecting culmination",
            ScanState::Culminating(..) => "expecting set",
        }
    }
}

/// Folds a time-ordered event stream into complete passes.
///
/// Culmination or set events before the first rise belong to a pass cut by
/// the window start and are skipped; a rise without its set at the end of the
/// stream is cut by the window end and is dropped. Any other out-of-order
/// event is a [`PredictError::MalformedEventStream`].
pub fn assemble_passes<I>(satellite: &str, events: I) -> Result<Vec<Pass>, PredictError>
where
    I: IntoIterator<Item = PassEvent>,
{
    let mut passes = Vec::new();
    let mut state = ScanState::Idle;

    for event in events {
        state = match (state, event.kind) {
            (ScanState::Idle, EventKind::Rise) => ScanState::Rising(event),
            (ScanState::Idle, kind) => {
                log::debug!("Skipping {} at {} with no preceding rise", kind, event.at);
                ScanState::Idle
            }
            (ScanState::Rising(rise), EventKind::Culmination) => {
                ScanState::Culminating(rise, event)
            }
            (ScanState::Culminating(rise, culmination), EventKind::Set) => {
                passes.push(Pass::new(satellite, rise, culmination, event)?);
                ScanState::Idle
            }
            (state, kind) => {
                return Err(PredictError::MalformedEventStream {
                    state: state.describe(),
                    event: kind,
                    at: event.at,
                })
            }
        };
    }

    if !matches!(state, ScanState::Idle) {
        log::debug!("Dropping pass still in progress at window end");
    }

    Ok(passes)
}

/// Runs the oracle over `window` and assembles the resulting passes
pub fn scan_passes<T: TrackOracle>(
    track: &T,
    satellite: &str,
    window: ScanWindow,
    horizon_deg: f64,
) -> Result<Vec<Pass>, PredictError> {
    let events = track
        .horizon_events(window.start, window.end, horizon_deg)?
        .into_iter()
        .map(|event| -> Result<PassEvent, PredictError> {
            Ok(PassEvent::new(event.kind, event.at, track.alt_az(event.at)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let passes = assemble_passes(satellite, events)?;
    log::info!(
        "Found {} complete passes of {} between {} and {}",
        passes.len(),
        satellite,
        window.start,
        window.end
    );
    Ok(passes)
}
