use crate::flight::{FlightId, FlightKind};
use crate::minute::Minute;
use crate::runway::RunwayId;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A notable transition inside one tick.
pub enum Event {
    InitialLoad {
        flights: usize,
        runways: usize,
    },
    Enqueued {
        flight: FlightId,
        kind: FlightKind,
    },
    Escalated {
        flight: FlightId,
        reason: &'static str,
    },
    Assigned {
        flight: FlightId,
        runway: RunwayId,
        kind: FlightKind,
    },
    Completed {
        flight: FlightId,
        runway: RunwayId,
    },
    Terminated {
        completed: usize,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::InitialLoad { flights, runways } => {
                write!(f, "INITIAL_LOAD flights={} runways={}", flights, runways)
            }
            Event::Enqueued { flight, kind } => {
                write!(f, "ENQUEUED flight={} kind={}", flight, kind)
            }
            Event::Escalated { flight, reason } => {
                write!(f, "ESCALATED flight={} priority=2 reason={}", flight, reason)
            }
            Event::Assigned {
                flight,
                runway,
                kind,
            } => {
                write!(
                    f,
                    "ASSIGNED flight={} runway={} kind={}",
                    flight, runway, kind
                )
            }
            Event::Completed { flight, runway } => {
                write!(f, "COMPLETED flight={} runway={}", flight, runway)
            }
            Event::Terminated { completed } => {
                write!(f, "TERMINATED flights_handled={}", completed)
            }
        }
    }
}

/// Consumes tick events. Sinks are best-effort: a slow or broken sink must
/// never fail the tick that produced the event.
pub trait EventSink {
    fn record(&mut self, minute: Minute, event: &Event);
}

/// Appends `[t=N] EVENT k=v` lines to a log file, truncated at startup.
pub struct FileEventSink {
    writer: BufWriter<File>,
}

impl FileEventSink {
    pub fn create(path: &Path) -> std::io::Result<FileEventSink> {
        Ok(FileEventSink {
            writer: BufWriter::new(File::create(path)?),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&mut self, minute: Minute, event: &Event) {
        // write errors are swallowed; event logging never stops the clock
        let _ = writeln!(self.writer, "[t={}] {}", minute, event);
        let _ = self.writer.flush();
    }
}
