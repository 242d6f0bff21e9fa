use crate::flight::{Flight, FlightId, FlightKind, FlightState, Priority};
use crate::minute::Minute;
use crate::runway::RunwayId;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use tabled::Tabled;

/// How equal candidates are ordered by id. Ties resolve
/// reverse-alphabetically unless a board is built with the override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    ReverseAlphabetical,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCounts {
    pub waiting: usize,
    pub assigned: usize,
    pub completed: usize,
    pub total: usize,
}

/// One row of the console flight table.
#[derive(Tabled)]
pub struct FlightStatus {
    pub id: String,
    pub kind: String,
    pub state: String,
    pub priority: String,
    pub expected: String,
    pub fuel: String,
    pub runway: String,
}

/// All flights known to the tower, with the two waiting queues.
///
/// Queues hold ids, never flight values; removal is id-keyed so a flight
/// can leave a queue without a scan for value equality.
pub struct FlightBoard {
    flights: HashMap<FlightId, Flight>,
    arrivals: VecDeque<FlightId>,
    departures: VecDeque<FlightId>,
    completed: Vec<FlightId>,
    tie_break: TieBreak,
}

impl Default for FlightBoard {
    fn default() -> Self {
        FlightBoard::new()
    }
}

impl FlightBoard {
    pub fn new() -> FlightBoard {
        FlightBoard::with_tie_break(TieBreak::default())
    }

    pub fn with_tie_break(tie_break: TieBreak) -> FlightBoard {
        FlightBoard {
            flights: HashMap::new(),
            arrivals: VecDeque::new(),
            departures: VecDeque::new(),
            completed: Vec::new(),
            tie_break,
        }
    }

    /// Registers a flight and queues it by kind. A duplicate id overwrites
    /// the previous entry in the index.
    pub fn add(&mut self, flight: Flight) {
        let id = flight.id.clone();
        match flight.kind {
            FlightKind::Arrival => self.arrivals.push_back(id.clone()),
            FlightKind::Departure => self.departures.push_back(id.clone()),
        }
        self.flights.insert(id, flight);
    }

    pub fn get(&self, id: &FlightId) -> Option<&Flight> {
        self.flights.get(id)
    }

    fn cmp_candidates(&self, a: &Flight, b: &Flight, now: Minute) -> Ordering {
        a.priority
            .cmp(&b.priority)
            .then(a.is_fuel_critical().cmp(&b.is_fuel_critical()))
            .then(a.lateness(now).cmp(&b.lateness(now)))
            .then(match self.tie_break {
                TieBreak::ReverseAlphabetical => a.id.cmp(&b.id),
                TieBreak::Alphabetical => b.id.cmp(&a.id),
            })
    }

    fn best_in_queue(&self, queue: &VecDeque<FlightId>, now: Minute) -> Option<FlightId> {
        queue
            .iter()
            .filter_map(|id| self.flights.get(id))
            .max_by(|a, b| self.cmp_candidates(a, b, now))
            .map(|flight| flight.id.clone())
    }

    /// The next flight for a free runway. Arrivals are always tried before
    /// departures; the two queues are never weighed against each other.
    pub fn select_for_runway(&self, now: Minute) -> Option<FlightId> {
        self.best_in_queue(&self.arrivals, now)
            .or_else(|| self.best_in_queue(&self.departures, now))
    }

    /// WAITING -> ASSIGNED. Removes the id from both queues; a flight only
    /// ever sits in one, but the removal is cheap either way.
    pub fn mark_assigned(&mut self, id: &FlightId, runway: RunwayId, now: Minute) {
        let Some(flight) = self.flights.get_mut(id) else {
            return;
        };
        flight.state = FlightState::Assigned;
        flight.started_at = Some(now);
        flight.runway = Some(runway);

        self.arrivals.retain(|queued| queued != id);
        self.departures.retain(|queued| queued != id);
    }

    /// ASSIGNED -> DONE. Calling it again for the same id changes nothing.
    pub fn mark_completed(&mut self, id: &FlightId, now: Minute) {
        let Some(flight) = self.flights.get_mut(id) else {
            return;
        };
        if flight.state != FlightState::Assigned {
            return;
        }
        flight.state = FlightState::Done;
        flight.finished_at = Some(now);
        if !self.completed.contains(id) {
            self.completed.push(id.clone());
        }
    }

    /// Raises every fuel-critical waiting arrival to emergency priority.
    /// Returns the escalated ids in queue order.
    pub fn escalate_fuel_critical(&mut self) -> Vec<FlightId> {
        let mut escalated = Vec::new();
        for id in &self.arrivals {
            if let Some(flight) = self.flights.get_mut(id) {
                if flight.priority < Priority::Emergency && flight.is_fuel_critical() {
                    flight.priority = Priority::Emergency;
                    escalated.push(id.clone());
                }
            }
        }
        escalated
    }

    /// Burns one minute of fuel on every arrival still waiting, never below 0.
    pub fn decay_waiting_fuel(&mut self) {
        for flight in self.flights.values_mut() {
            if flight.kind == FlightKind::Arrival && flight.state == FlightState::Waiting {
                if let Some(fuel) = flight.fuel {
                    if fuel > 0 {
                        flight.fuel = Some(fuel - 1);
                    }
                }
            }
        }
    }

    pub fn counts(&self) -> StateCounts {
        StateCounts {
            waiting: self.arrivals.len() + self.departures.len(),
            assigned: self
                .flights
                .values()
                .filter(|flight| flight.state == FlightState::Assigned)
                .count(),
            completed: self.completed.len(),
            total: self.flights.len(),
        }
    }

    pub fn completed_flights(&self) -> impl Iterator<Item = &Flight> {
        self.completed.iter().filter_map(|id| self.flights.get(id))
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    /// Per-flight status rows in id order, ready for the console table.
    pub fn rows(&self) -> Vec<FlightStatus> {
        let mut sorted_ids = self.flights.keys().collect::<Vec<&FlightId>>();
        sorted_ids.sort();
        sorted_ids
            .into_iter()
            .filter_map(|id| self.flights.get(id))
            .map(|flight| FlightStatus {
                id: flight.id.to_string(),
                kind: flight.kind.to_string(),
                state: flight.state.to_string(),
                priority: flight.priority.to_string(),
                expected: flight
                    .expected
                    .map(|minute| minute.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                fuel: flight
                    .fuel
                    .map(|fuel| fuel.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                runway: flight
                    .runway
                    .as_ref()
                    .map(|runway| runway.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect()
    }
}
