use crate::flight::FlightId;
use crate::minute::Minute;
use std::sync::Arc;

pub type RunwayId = Arc<str>;

/// A runway held by exactly one flight until `release_at`.
#[derive(Debug, Clone)]
pub struct Occupancy {
    pub flight: FlightId,
    pub release_at: Minute,
}

pub struct Runway {
    pub id: RunwayId,
    pub category: String,
    /// Minutes the runway stays held per operation.
    pub hold: u64,
    /// Out-of-service runways are never selected.
    pub enabled: bool,
    occupancy: Option<Occupancy>,
    /// Lifetime count of assignments.
    pub operations: u64,
}

impl Runway {
    pub fn new(id: RunwayId, category: String, hold: u64, enabled: bool) -> Runway {
        Runway {
            id,
            category,
            hold,
            enabled,
            occupancy: None,
            operations: 0,
        }
    }

    /// Free, or held but due for release by `now`. Disabled runways never qualify.
    pub fn is_available(&self, now: Minute) -> bool {
        self.enabled
            && self
                .occupancy
                .as_ref()
                .is_none_or(|held| held.release_at <= now)
    }

    pub fn assign(&mut self, flight: FlightId, now: Minute) {
        self.occupancy = Some(Occupancy {
            flight,
            release_at: now + self.hold,
        });
        self.operations += 1;
    }

    pub fn release(&mut self) -> Option<FlightId> {
        self.occupancy.take().map(|held| held.flight)
    }

    pub fn occupant(&self) -> Option<&FlightId> {
        self.occupancy.as_ref().map(|held| &held.flight)
    }

    pub fn release_at(&self) -> Option<Minute> {
        self.occupancy.as_ref().map(|held| held.release_at)
    }

    pub fn is_free(&self) -> bool {
        self.occupancy.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runway(hold: u64, enabled: bool) -> Runway {
        Runway::new(Arc::from("R1"), "standard".to_string(), hold, enabled)
    }

    #[test]
    fn test_assign_and_release() {
        let mut rw = runway(2, true);
        assert!(rw.is_free());
        assert!(rw.is_available(Minute(0)));

        rw.assign(Arc::from("IB123"), Minute(0));
        assert!(!rw.is_free());
        assert_eq!(rw.occupant().map(|f| f.as_ref()), Some("IB123"));
        assert_eq!(rw.release_at(), Some(Minute(2)));
        assert_eq!(rw.operations, 1);

        assert!(!rw.is_available(Minute(1)));
        assert!(rw.is_available(Minute(2)));

        assert_eq!(rw.release().as_deref(), Some("IB123"));
        assert!(rw.is_free());
        assert_eq!(rw.release_at(), None);
    }

    #[test]
    fn test_disabled_is_never_available() {
        let rw = runway(2, false);
        assert!(rw.is_free());
        assert!(!rw.is_available(Minute(0)));
        assert!(!rw.is_available(Minute(100)));
    }

    #[test]
    fn test_occupant_and_release_minute_travel_together() {
        let mut rw = runway(3, true);
        assert!(rw.occupant().is_none() && rw.release_at().is_none());
        rw.assign(Arc::from("AF001"), Minute(5));
        assert!(rw.occupant().is_some() && rw.release_at().is_some());
        rw.release();
        assert!(rw.occupant().is_none() && rw.release_at().is_none());
    }
}
