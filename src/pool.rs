use crate::flight::FlightId;
use crate::minute::Minute;
use crate::runway::{Runway, RunwayId};
use std::collections::HashMap;
use tabled::Tabled;

/// One row of the console runway table.
#[derive(Tabled)]
pub struct RunwayStatus {
    pub id: String,
    pub category: String,
    pub state: String,
    pub enabled: String,
    pub flight: String,
    pub frees_at: String,
    pub operations: u64,
}

/// All runways of the airport, keyed by id. Queries iterate in sorted id
/// order so logs and tests see one ordering.
#[derive(Default)]
pub struct RunwayPool {
    runways: HashMap<RunwayId, Runway>,
}

impl RunwayPool {
    pub fn new() -> RunwayPool {
        RunwayPool::default()
    }

    pub fn add(&mut self, runway: Runway) {
        self.runways.insert(runway.id.clone(), runway);
    }

    pub fn get(&self, id: &RunwayId) -> Option<&Runway> {
        self.runways.get(id)
    }

    fn sorted_ids(&self) -> Vec<RunwayId> {
        let mut ids = self.runways.keys().cloned().collect::<Vec<RunwayId>>();
        ids.sort();
        ids
    }

    /// Every enabled runway that is free, or due to free, at `now`.
    pub fn available_now(&self, now: Minute) -> Vec<RunwayId> {
        self.sorted_ids()
            .into_iter()
            .filter(|id| self.runways[id].is_available(now))
            .collect()
    }

    /// Books a flight onto a runway. The caller has already checked
    /// availability; an unknown runway id is ignored.
    pub fn assign(&mut self, id: &RunwayId, flight: FlightId, now: Minute) {
        if let Some(runway) = self.runways.get_mut(id) {
            runway.assign(flight, now);
        }
    }

    /// Frees every runway whose hold has elapsed by `now` and returns the
    /// (runway, occupant) pairs in runway id order.
    pub fn release_due(&mut self, now: Minute) -> Vec<(RunwayId, FlightId)> {
        let mut freed = Vec::new();
        for id in self.sorted_ids() {
            if let Some(runway) = self.runways.get_mut(&id) {
                if runway.release_at().is_some_and(|at| at <= now) {
                    if let Some(flight) = runway.release() {
                        freed.push((id, flight));
                    }
                }
            }
        }
        freed
    }

    pub fn enabled_count(&self) -> usize {
        self.runways.values().filter(|runway| runway.enabled).count()
    }

    pub fn len(&self) -> usize {
        self.runways.len()
    }

    /// Lifetime operations per runway, in id order.
    pub fn usage(&self) -> Vec<(RunwayId, u64)> {
        self.sorted_ids()
            .into_iter()
            .map(|id| {
                let operations = self.runways[&id].operations;
                (id, operations)
            })
            .collect()
    }

    pub fn runways(&self) -> impl Iterator<Item = &Runway> {
        self.runways.values()
    }

    /// Per-runway status rows in id order, ready for the console table.
    pub fn rows(&self) -> Vec<RunwayStatus> {
        self.sorted_ids()
            .into_iter()
            .map(|id| {
                let runway = &self.runways[&id];
                RunwayStatus {
                    id: runway.id.to_string(),
                    category: runway.category.clone(),
                    state: if runway.is_free() { "FREE" } else { "HELD" }.to_string(),
                    enabled: if runway.enabled { "yes" } else { "no" }.to_string(),
                    flight: runway
                        .occupant()
                        .map(|flight| flight.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    frees_at: runway
                        .release_at()
                        .map(|minute| minute.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    operations: runway.operations,
                }
            })
            .collect()
    }
}
