use crate::board::{FlightBoard, StateCounts};
use crate::error::TowerError;
use crate::events::{Event, EventSink};
use crate::flight::Flight;
use crate::minute::Minute;
use crate::pool::RunwayPool;
use crate::report::TowerReport;
use crate::runway::Runway;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "RUNNING"),
            RunState::Stopped => write!(f, "STOPPED"),
        }
    }
}

pub struct TowerSummary {
    pub minute: Minute,
    pub state: RunState,
    pub enabled_runways: usize,
    pub counts: StateCounts,
}

/// The simulation controller. Owns the clock and drives the per-minute
/// cycle: release held runways, escalate low-fuel arrivals, hand free
/// runways to the best waiting flights, burn queued fuel, advance.
pub struct Tower {
    minute: Minute,
    state: RunState,
    board: FlightBoard,
    pool: RunwayPool,
    sink: Box<dyn EventSink + Send>,
}

impl Tower {
    /// Builds a running tower at minute 0 from the loaded scenario.
    /// Flights enqueue in the order given, within their kind.
    pub fn initialize(
        flights: Vec<Flight>,
        runways: Vec<Runway>,
        sink: Box<dyn EventSink + Send>,
    ) -> Tower {
        let mut tower = Tower {
            minute: Minute(0),
            state: RunState::Running,
            board: FlightBoard::new(),
            pool: RunwayPool::new(),
            sink,
        };

        for runway in runways {
            tower.pool.add(runway);
        }
        tower.sink.record(
            tower.minute,
            &Event::InitialLoad {
                flights: flights.len(),
                runways: tower.pool.len(),
            },
        );
        for flight in flights {
            tower.add_flight(flight);
        }
        tower
    }

    /// Registers one more flight mid-run (manual insertion).
    pub fn add_flight(&mut self, flight: Flight) {
        self.sink.record(
            self.minute,
            &Event::Enqueued {
                flight: flight.id.clone(),
                kind: flight.kind,
            },
        );
        self.board.add(flight);
    }

    /// One simulated minute. Fails only when the tower has been finalized;
    /// an idle airport ticks successfully with nothing to do.
    pub fn tick(&mut self) -> Result<(), TowerError> {
        if self.state != RunState::Running {
            return Err(TowerError::Stopped);
        }

        // 1) free runways whose hold elapsed; their occupants are done
        for (runway_id, flight_id) in self.pool.release_due(self.minute) {
            self.board.mark_completed(&flight_id, self.minute);
            self.sink.record(
                self.minute,
                &Event::Completed {
                    flight: flight_id,
                    runway: runway_id,
                },
            );
        }

        // 2) arrivals running on fumes become emergencies
        for flight_id in self.board.escalate_fuel_critical() {
            self.sink.record(
                self.minute,
                &Event::Escalated {
                    flight: flight_id,
                    reason: "fuel<=5",
                },
            );
        }

        // 3) hand each runway free at this minute to the best candidate
        for runway_id in self.pool.available_now(self.minute) {
            let Some(flight_id) = self.board.select_for_runway(self.minute) else {
                break;
            };
            let Some(kind) = self.board.get(&flight_id).map(|flight| flight.kind) else {
                break;
            };
            self.pool.assign(&runway_id, flight_id.clone(), self.minute);
            self.board
                .mark_assigned(&flight_id, runway_id.clone(), self.minute);
            self.sink.record(
                self.minute,
                &Event::Assigned {
                    flight: flight_id,
                    runway: runway_id,
                    kind,
                },
            );
        }

        // 4) whoever is still queued burns a minute of fuel
        self.board.decay_waiting_fuel();

        // 5) advance the clock
        self.minute += 1;

        self.assert_invariants();
        Ok(())
    }

    /// Up to `n` ticks, stopping at the first failure.
    pub fn advance(&mut self, n: u64) -> Result<(), TowerError> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Ends the run. Later calls change nothing and emit nothing.
    pub fn finalize(&mut self) {
        if self.state == RunState::Stopped {
            return;
        }
        self.state = RunState::Stopped;
        self.sink.record(
            self.minute,
            &Event::Terminated {
                completed: self.board.counts().completed,
            },
        );
    }

    pub fn summary(&self) -> TowerSummary {
        TowerSummary {
            minute: self.minute,
            state: self.state,
            enabled_runways: self.pool.enabled_count(),
            counts: self.board.counts(),
        }
    }

    pub fn report(&self) -> TowerReport {
        TowerReport::capture(self.minute, &self.board, &self.pool)
    }

    pub fn minute(&self) -> Minute {
        self.minute
    }

    pub fn board(&self) -> &FlightBoard {
        &self.board
    }

    pub fn pool(&self) -> &RunwayPool {
        &self.pool
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use crate::flight::FlightState;

        debug_assert!(
            self.pool.runways().all(|runway| {
                runway.occupant().is_none_or(|flight_id| {
                    self.board
                        .get(flight_id)
                        .is_some_and(|flight| flight.state == FlightState::Assigned)
                })
            }),
            "Occupied runway <-> assigned flight invariant violated"
        );

        let counts = self.board.counts();
        debug_assert!(
            counts.completed <= counts.total,
            "Completed count exceeds known flights"
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}
