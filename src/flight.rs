use crate::minute::Minute;
use crate::runway::RunwayId;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub type FlightId = Arc<str>;

/// Fuel level at or below which an arrival is considered critical.
pub const CRITICAL_FUEL: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightKind {
    Arrival,
    Departure,
}

impl FromStr for FlightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ARRIVAL" => Ok(FlightKind::Arrival),
            "DEPARTURE" => Ok(FlightKind::Departure),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightKind::Arrival => write!(f, "ARRIVAL"),
            FlightKind::Departure => write!(f, "DEPARTURE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    #[default]
    Waiting,
    Assigned,
    Done,
}

impl FromStr for FlightState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WAITING" => Ok(FlightState::Waiting),
            "ASSIGNED" => Ok(FlightState::Assigned),
            "DONE" => Ok(FlightState::Done),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightState::Waiting => write!(f, "WAITING"),
            FlightState::Assigned => write!(f, "ASSIGNED"),
            FlightState::Done => write!(f, "DONE"),
        }
    }
}

/// Escalation only: a flight's priority never goes back down during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    #[default]
    Normal,
    High,
    Emergency,
}

impl TryFrom<u8> for Priority {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Normal),
            1 => Ok(Priority::High),
            2 => Ok(Priority::Emergency),
            other => Err(other),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> u8 {
        match value {
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Emergency => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

pub struct Flight {
    pub id: FlightId,
    pub kind: FlightKind,
    /// ETA for arrivals, ETD for departures. One field, read through `kind`.
    pub expected: Option<Minute>,
    pub priority: Priority,
    /// Minutes of autonomy left. Arrivals only.
    pub fuel: Option<u64>,
    pub state: FlightState,
    /// Kept after completion as history.
    pub runway: Option<RunwayId>,
    pub started_at: Option<Minute>,
    pub finished_at: Option<Minute>,
}

impl Flight {
    pub fn new(
        id: FlightId,
        kind: FlightKind,
        expected: Option<Minute>,
        priority: Priority,
        fuel: Option<u64>,
    ) -> Flight {
        Flight {
            id,
            kind,
            expected,
            priority,
            // fuel has no meaning for departures
            fuel: match kind {
                FlightKind::Arrival => fuel,
                FlightKind::Departure => None,
            },
            state: FlightState::Waiting,
            runway: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn expected_minute(&self) -> Option<Minute> {
        self.expected
    }

    pub fn is_fuel_critical(&self) -> bool {
        self.kind == FlightKind::Arrival && self.fuel.is_some_and(|fuel| fuel <= CRITICAL_FUEL)
    }

    /// Minutes past the expected time, 0 when still early or no time is set.
    pub fn lateness(&self, now: Minute) -> u64 {
        self.expected
            .map(|expected| now.saturating_since(expected))
            .unwrap_or(0)
    }

    pub fn is_emergency(&self) -> bool {
        self.priority == Priority::Emergency
    }
}
