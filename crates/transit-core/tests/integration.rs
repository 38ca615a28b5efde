//! Integration tests for the transit simulation engine.
//!
//! These tests exercise end-to-end behavior across the full step pipeline:
//! topology edits, train movement, loading, delivery, loss, and determinism.

use std::cell::RefCell;
use std::rc::Rc;
use transit_core::cargo::CargoOwner;
use transit_core::config::SimConfig;
use transit_core::event::{Event, EventKind};
use transit_core::fixed::Fixed64;
use transit_core::sim::GameStatus;
use transit_core::test_utils::*;
use transit_core::train::Direction;
use transit_core::validation::validate;

// ===========================================================================
// Test 1: Cargo rides to its destination
// ===========================================================================
//
// A (coal) -- B (wood) -- C (gold). Gold waiting at A must reach C; wood at C
// must come back to B.

#[test]
fn cargo_rides_to_its_destination() {
    let mut net = network(rich());
    let [a, b, c] = row(&mut net);
    let line = line_through(&mut net, &[a, b, c]);
    let gold_cargo = net.spawn_cargo(a, gold()).unwrap();
    let wood_cargo = net.spawn_cargo(c, wood()).unwrap();
    net.buy_train(line, a).unwrap();

    let delivered = Rc::new(RefCell::new(Vec::new()));
    let log = delivered.clone();
    net.on_event(
        EventKind::CargoDelivered,
        Box::new(move |e| {
            if let Event::CargoDelivered { cargo, station, .. } = e {
                log.borrow_mut().push((*cargo, *station));
            }
        }),
    );

    assert!(run_until(&mut net, 2000, |n| n.score() == 2));
    assert_eq!(*delivered.borrow(), vec![(gold_cargo, c), (wood_cargo, b)]);
    assert_eq!(net.cargo_count(), 0);
    assert!(validate(&net).is_empty());
}

// ===========================================================================
// Test 2: Reversal at the end of an open line
// ===========================================================================

#[test]
fn train_ping_pongs_between_ends() {
    let mut net = network(rich());
    let [a, b, c] = row(&mut net);
    let line = line_through(&mut net, &[a, b, c]);
    net.buy_train(line, a).unwrap();

    let mut arrivals = Vec::new();
    for _ in 0..1500 {
        for event in net.step().events {
            if let Event::TrainArrived { station, .. } = event {
                arrivals.push(station);
            }
        }
    }
    assert!(arrivals.len() >= 6);
    let expected = [b, c, b, a, b, c];
    assert_eq!(&arrivals[..6], &expected);
}

// ===========================================================================
// Test 3: Loss is terminal
// ===========================================================================

#[test]
fn game_lost_fires_once_and_freezes_the_network() {
    let mut net = network(SimConfig {
        elimination_timer: 50,
        ..rich()
    });
    let [a, _b] = row(&mut net);
    net.spawn_cargo(a, crystal()).unwrap();

    let mut lost_events = 0;
    for _ in 0..200 {
        lost_events += net
            .step()
            .events
            .iter()
            .filter(|e| e.kind() == EventKind::GameLost)
            .count();
    }
    assert_eq!(lost_events, 1);
    assert_eq!(net.status(), GameStatus::Lost { tick: 49 });
    assert_eq!(net.tick(), 50);
}

// ===========================================================================
// Test 4: Suppressed events still book the score
// ===========================================================================

#[test]
fn suppressing_deliveries_keeps_score() {
    let mut net = network(rich());
    net.suppress_event(EventKind::CargoDelivered);
    let [a, b] = row(&mut net);
    let line = line_through(&mut net, &[a, b]);
    net.spawn_cargo(a, wood()).unwrap();
    net.buy_train(line, a).unwrap();

    let mut saw_delivery = false;
    for _ in 0..300 {
        saw_delivery |= net
            .step()
            .events
            .iter()
            .any(|e| e.kind() == EventKind::CargoDelivered);
    }
    assert!(!saw_delivery);
    assert_eq!(net.score(), 1);
}

// ===========================================================================
// Test 5: Editing under a running train
// ===========================================================================

#[test]
fn extending_the_line_behind_a_train_keeps_it_on_course() {
    let mut net = network(rich());
    let [a, b, c, d] = row(&mut net);
    let line = line_through(&mut net, &[b, c]);
    let train = net.buy_train(line, b).unwrap();
    net.step();
    let progress = net.train(train).unwrap().progress();
    assert!(progress > Fixed64::ZERO);

    // Prepend A and append D while the train travels B -> C.
    net.connect_stations(line, b, a).unwrap();
    net.connect_stations(line, c, d).unwrap();
    let t = net.train(train).unwrap();
    assert_eq!(t.current_index(), 1);
    assert_eq!(t.progress(), progress);
    assert_eq!(t.direction(), Direction::Forward);
    assert!(validate(&net).is_empty());
}

#[test]
fn removing_the_next_station_resets_progress() {
    let mut net = network(rich());
    let [a, b, c] = row(&mut net);
    let line = line_through(&mut net, &[a, b, c]);
    let train = net.buy_train(line, a).unwrap();
    net.step();

    net.remove_station(line, b).unwrap();
    let t = net.train(train).unwrap();
    assert_eq!(t.current_index(), 0);
    assert_eq!(t.progress(), Fixed64::ZERO);
    assert_eq!(net.next_stop(train), Some((c, Direction::Forward)));
    assert!(validate(&net).is_empty());
}

#[test]
fn opening_a_loop_keeps_trains() {
    let mut net = network(rich());
    let [a, b, c, d] = row(&mut net);
    let line = line_through(&mut net, &[a, b, c, d, a]);
    let train = net.buy_train(line, c).unwrap();

    net.demolish_track(line, 3).unwrap();
    let l = net.line(line).unwrap();
    assert!(!l.is_loop());
    assert_eq!(l.stations(), &[a, b, c, d]);
    assert_eq!(net.train(train).unwrap().current_index(), 2);
    for (_, station) in net.stations() {
        assert_eq!(station.lines(), &[line]);
    }
    assert!(validate(&net).is_empty());
}

#[test]
fn collapsing_a_line_returns_cargo() {
    let mut net = network(rich());
    let [a, b] = row(&mut net);
    let line = line_through(&mut net, &[a, b]);
    let cargo = net.spawn_cargo(a, wood()).unwrap();
    let train = net.buy_train(line, a).unwrap();
    assert_eq!(net.cargo_owner(cargo), Some(CargoOwner::Train(train)));

    net.remove_station(line, b).unwrap();
    // A single station line is still a line; the train stays but is stuck.
    assert_eq!(net.line(line).unwrap().stations(), &[a]);
    net.remove_station(line, a).unwrap();
    assert_eq!(net.cargo_owner(cargo), Some(CargoOwner::Station(a)));
    assert_eq!(net.train_count(), 0);
    assert!(validate(&net).is_empty());
}

// ===========================================================================
// Test 6: Determinism
// ===========================================================================

#[test]
fn same_inputs_same_hashes() {
    let build = || {
        let mut net = network(rich());
        net.enable_spawner(1234);
        let [a, b, c] = row(&mut net);
        let line = line_through(&mut net, &[a, b, c]);
        net.spawn_cargo(a, gold()).unwrap();
        net.buy_train(line, a).unwrap();
        net.buy_train(line, c).unwrap();
        net
    };
    let mut x = build();
    let mut y = build();
    assert_eq!(run_and_hash(&mut x, 3000), run_and_hash(&mut y, 3000));
}
