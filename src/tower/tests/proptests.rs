use crate::flight::{Flight, FlightId, FlightKind, Priority};
use crate::minute::Minute;
use crate::runway::Runway;
use crate::tower::tests::utils::RecordingSink;
use crate::tower::tower::Tower;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn arb_flight_inputs() -> impl Strategy<Value = (bool, u64, u8, Option<u64>)> {
    (
        any::<bool>(),
        0..60u64,
        0..3u8,
        prop::option::of(0..40u64),
    )
}

fn arb_runway_inputs() -> impl Strategy<Value = (u64, bool)> {
    (1..6u64, any::<bool>())
}

proptest! {
    #[test]
    fn test_universal_tick_properties(
        flight_inputs in prop::collection::vec(arb_flight_inputs(), 1..25),
        runway_inputs in prop::collection::vec(arb_runway_inputs(), 1..5),
    ) {
        let flights = flight_inputs
            .iter()
            .enumerate()
            .map(|(i, (is_arrival, expected, priority, fuel))| {
                let kind = if *is_arrival { FlightKind::Arrival } else { FlightKind::Departure };
                Flight::new(
                    Arc::from(format!("FL{:03}", i).as_str()),
                    kind,
                    Some(Minute(*expected)),
                    Priority::try_from(*priority).unwrap(),
                    *fuel,
                )
            })
            .collect::<Vec<Flight>>();
        let total = flights.len();

        let runways = runway_inputs
            .iter()
            .enumerate()
            .map(|(i, (hold, enabled))| {
                Runway::new(
                    Arc::from(format!("RW{:02}", i).as_str()),
                    "standard".to_string(),
                    *hold,
                    *enabled,
                )
            })
            .collect::<Vec<Runway>>();

        let (sink, _) = RecordingSink::new();
        let mut tower = Tower::initialize(flights, runways, Box::new(sink));

        for step in 0..30u64 {
            let before: HashMap<FlightId, (Priority, Option<u64>)> = tower
                .board()
                .flights()
                .map(|flight| (flight.id.clone(), (flight.priority, flight.fuel)))
                .collect();

            prop_assert!(tower.tick().is_ok());
            prop_assert_eq!(tower.minute(), Minute(step + 1));

            for flight in tower.board().flights() {
                let (old_priority, old_fuel) = before[&flight.id];
                prop_assert!(
                    flight.priority >= old_priority,
                    "priority dropped for {}", flight.id
                );
                if let (Some(new_fuel), Some(old_fuel)) = (flight.fuel, old_fuel) {
                    prop_assert!(
                        new_fuel <= old_fuel,
                        "fuel grew for {}", flight.id
                    );
                }
            }

            let counts = tower.board().counts();
            prop_assert_eq!(counts.total, total);
            prop_assert_eq!(counts.waiting + counts.assigned + counts.completed, total);

            for runway in tower.pool().runways() {
                prop_assert_eq!(runway.occupant().is_some(), !runway.is_free());
                if !runway.enabled {
                    prop_assert_eq!(runway.operations, 0);
                }
            }
        }
    }
}
