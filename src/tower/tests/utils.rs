use crate::events::{Event, EventSink};
use crate::flight::{Flight, FlightId, FlightKind, Priority};
use crate::minute::Minute;
use crate::runway::{Runway, RunwayId};
use parking_lot::Mutex;
use std::sync::Arc;

pub fn id(s: &str) -> FlightId {
    Arc::from(s)
}

pub fn arrival(name: &str, eta: u64, priority: Priority, fuel: u64) -> Flight {
    Flight::new(
        id(name),
        FlightKind::Arrival,
        Some(Minute(eta)),
        priority,
        Some(fuel),
    )
}

pub fn departure(name: &str, etd: u64, priority: Priority) -> Flight {
    Flight::new(
        id(name),
        FlightKind::Departure,
        Some(Minute(etd)),
        priority,
        None,
    )
}

pub fn runway(name: &str, hold: u64, enabled: bool) -> Runway {
    Runway::new(
        RunwayId::from(name),
        "standard".to_string(),
        hold,
        enabled,
    )
}

/// Captures every event line so tests can assert on the exact trace.
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

pub type Trace = Arc<Mutex<Vec<String>>>;

impl RecordingSink {
    pub fn new() -> (RecordingSink, Trace) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingSink {
                lines: lines.clone(),
            },
            lines,
        )
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, minute: Minute, event: &Event) {
        self.lines.lock().push(format!("[t={}] {}", minute, event));
    }
}
