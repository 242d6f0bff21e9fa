use crate::flight::{FlightState, Priority};
use crate::minute::Minute;
use crate::tower::tests::utils::{arrival, departure, id, runway, RecordingSink};
use crate::tower::tower::Tower;

#[test]
fn test_low_fuel_arrival_jumps_the_queue() {
    // ZZ110 was enqueued first and the tie-break would favor it, but AA300
    // is fuel-critical from the start and escalates ahead of it
    let (sink, trace) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![
            arrival("ZZ110", 0, Priority::Normal, 10),
            arrival("AA300", 0, Priority::Normal, 3),
        ],
        vec![runway("R1", 5, true)],
        Box::new(sink),
    );

    tower.tick().unwrap();

    let critical = tower.board().get(&id("AA300")).unwrap();
    assert_eq!(critical.state, FlightState::Assigned);
    assert_eq!(critical.priority, Priority::Emergency);
    assert_eq!(
        tower.board().get(&id("ZZ110")).unwrap().state,
        FlightState::Waiting
    );
    assert!(trace
        .lock()
        .contains(&"[t=0] ESCALATED flight=AA300 priority=2 reason=fuel<=5".to_string()));

    // the other arrival keeps burning fuel while it waits
    tower.advance(3).unwrap();
    assert_eq!(tower.board().get(&id("ZZ110")).unwrap().fuel, Some(6));
}

#[test]
fn test_emergency_added_later_is_served_first() {
    let (sink, _) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![arrival("FILLER", 0, Priority::Normal, 50)],
        vec![runway("R1", 3, true)],
        Box::new(sink),
    );
    // occupy the runway until minute 3
    tower.tick().unwrap();

    tower.add_flight(arrival("NN500", 0, Priority::Normal, 50));
    tower.add_flight(arrival("EE900", 0, Priority::Emergency, 50));

    // minutes 1 and 2: runway still held, both wait
    tower.advance(2).unwrap();
    assert_eq!(
        tower.board().get(&id("EE900")).unwrap().state,
        FlightState::Waiting
    );

    // minute 3: FILLER completes and the emergency takes the slot
    tower.tick().unwrap();
    assert_eq!(
        tower.board().get(&id("FILLER")).unwrap().state,
        FlightState::Done
    );
    assert_eq!(
        tower.board().get(&id("EE900")).unwrap().state,
        FlightState::Assigned
    );
    assert_eq!(
        tower.board().get(&id("NN500")).unwrap().state,
        FlightState::Waiting
    );
}

#[test]
fn test_arrivals_fill_runways_before_departures() {
    let (sink, _) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![
            departure("DD900", 0, Priority::Emergency),
            arrival("AA100", 0, Priority::Normal, 50),
        ],
        vec![runway("R1", 2, true), runway("R2", 2, true)],
        Box::new(sink),
    );
    tower.tick().unwrap();

    // two free runways, one candidate per queue: arrival lands on R1,
    // the departure rolls from R2
    let aa = tower.board().get(&id("AA100")).unwrap();
    let dd = tower.board().get(&id("DD900")).unwrap();
    assert_eq!(aa.runway.as_deref(), Some("R1"));
    assert_eq!(dd.runway.as_deref(), Some("R2"));
}

#[test]
fn test_assignment_stops_when_queues_empty() {
    let (sink, _) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![arrival("AA100", 0, Priority::Normal, 50)],
        vec![runway("R1", 2, true), runway("R2", 2, true), runway("R3", 2, true)],
        Box::new(sink),
    );
    tower.tick().unwrap();

    let held = tower
        .pool()
        .runways()
        .filter(|runway| !runway.is_free())
        .count();
    assert_eq!(held, 1);
}

#[test]
fn test_escalation_never_touches_departures() {
    let (sink, trace) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![departure("DD900", 0, Priority::Normal)],
        vec![],
        Box::new(sink),
    );
    tower.advance(10).unwrap();

    assert_eq!(
        tower.board().get(&id("DD900")).unwrap().priority,
        Priority::Normal
    );
    assert!(!trace.lock().iter().any(|line| line.contains("ESCALATED")));
}

#[test]
fn test_escalation_fires_once_per_flight() {
    let (sink, trace) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![arrival("AA100", 0, Priority::Normal, 4)],
        vec![],
        Box::new(sink),
    );
    tower.advance(5).unwrap();

    let escalations = trace
        .lock()
        .iter()
        .filter(|line| line.contains("ESCALATED"))
        .count();
    assert_eq!(escalations, 1);
}

#[test]
fn test_runway_freed_this_minute_is_reused_this_minute() {
    let (sink, _) = RecordingSink::new();
    let mut tower = Tower::initialize(
        vec![
            arrival("AA100", 0, Priority::Normal, 50),
            arrival("BB200", 0, Priority::Normal, 50),
        ],
        vec![runway("R1", 2, true)],
        Box::new(sink),
    );
    // minute 0: BB200 wins the tie-break and takes the runway
    tower.tick().unwrap();
    assert_eq!(
        tower.board().get(&id("BB200")).unwrap().state,
        FlightState::Assigned
    );

    tower.tick().unwrap();

    // minute 2: the release in step 1 makes the runway available to AA100
    // within the same tick
    tower.tick().unwrap();
    let aa = tower.board().get(&id("AA100")).unwrap();
    assert_eq!(aa.state, FlightState::Assigned);
    assert_eq!(aa.started_at, Some(Minute(2)));
    assert_eq!(
        tower.board().get(&id("BB200")).unwrap().state,
        FlightState::Done
    );
}
