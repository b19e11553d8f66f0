//! Integration tests for the ambient light hysteresis gate

mod common;
use common::*;

use ember_flicker::{
    BLACK, ConfigStore, DaylightConfig, DaylightGate, FlickerScheduler, FramePacing, GateEvent,
    LampConfig,
};

const SEED: u64 = 7;

fn gate_config(threshold: i16) -> DaylightConfig {
    DaylightConfig {
        on_lux: 15.0,
        off_lux: 60.0,
        threshold,
    }
}

#[test]
fn starts_on_with_the_counter_at_the_on_extreme() {
    let gate = DaylightGate::new(gate_config(10));
    assert!(gate.is_on());
    assert_eq!(gate.counter(), -10);
}

#[test]
fn bright_samples_turn_off_exactly_once() {
    let mut gate = DaylightGate::new(gate_config(3));

    // Counter runs from -3 up; the OFF transition lands on the tick it
    // first reaches +3, and only on that tick.
    let mut events = Vec::new();
    for _ in 0..10 {
        events.push(gate.sample(100.0));
    }
    let off_ticks: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| **e == GateEvent::TurnedOff)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(off_ticks, [5]);
    assert!(!gate.is_on());
    assert_eq!(gate.counter(), 3);
}

#[test]
fn dark_samples_turn_back_on_exactly_once() {
    let mut gate = DaylightGate::new(gate_config(3));
    while gate.is_on() {
        gate.sample(100.0);
    }

    let mut on_events = 0;
    for _ in 0..20 {
        if gate.sample(1.0) == GateEvent::TurnedOn {
            on_events += 1;
        }
    }
    assert_eq!(on_events, 1);
    assert!(gate.is_on());
    assert_eq!(gate.counter(), -3);
}

#[test]
fn counter_never_leaves_its_bounds() {
    let mut gate = DaylightGate::new(gate_config(5));
    for _ in 0..50 {
        gate.sample(500.0);
        assert!((-5..=5).contains(&gate.counter()));
    }
    for _ in 0..100 {
        gate.sample(0.0);
        assert!((-5..=5).contains(&gate.counter()));
    }
}

#[test]
fn dead_band_holds_the_counter_still() {
    let mut gate = DaylightGate::new(gate_config(5));
    for _ in 0..50 {
        assert_eq!(gate.sample(30.0), GateEvent::Unchanged);
    }
    assert_eq!(gate.counter(), -5);
    assert!(gate.is_on());
}

#[test]
fn alternating_samples_cannot_flip_the_state() {
    let mut gate = DaylightGate::new(gate_config(5));
    for i in 0..100 {
        gate.sample(if i % 2 == 0 { 100.0 } else { 1.0 });
    }
    assert!(gate.is_on());
}

#[test]
fn off_transition_blanks_the_strip_immediately() {
    let store = ConfigStore::new(LampConfig::halloween(10, 8));
    let mut scheduler: FlickerScheduler<'_, MockStrip, 32> =
        FlickerScheduler::new(&store, MockStrip::new(), FramePacing::default(), SEED);
    let mut gate = DaylightGate::new(gate_config(4));
    let mut sensor = ConstLux(200.0);

    // From the on extreme (-4) it takes 8 bright ticks to reach +4.
    for _ in 0..7 {
        assert_eq!(scheduler.service_gate(&mut sensor, &mut gate), GateEvent::Unchanged);
        assert_eq!(scheduler.output().frame_count(), 0);
    }
    assert_eq!(scheduler.service_gate(&mut sensor, &mut gate), GateEvent::TurnedOff);

    // The blank frame went out on the transition tick itself.
    assert_eq!(scheduler.output().frame_count(), 1);
    let frame = scheduler.output().last_frame().unwrap();
    assert_eq!(frame.len(), 18);
    assert!(frame.iter().all(|&pixel| pixel == BLACK));
    assert!(!store.snapshot().lamp_on);

    // Subsequent render ticks stay dark and push no frames.
    scheduler.tick();
    assert_eq!(scheduler.output().frame_count(), 1);
}

#[test]
fn dark_room_turns_the_lamp_back_on() {
    let store = ConfigStore::new(LampConfig::halloween(10, 8));
    let mut scheduler: FlickerScheduler<'_, MockStrip, 32> =
        FlickerScheduler::new(&store, MockStrip::new(), FramePacing::default(), SEED);
    let mut gate = DaylightGate::new(gate_config(2));

    let mut bright = ConstLux(200.0);
    while scheduler.service_gate(&mut bright, &mut gate) != GateEvent::TurnedOff {}

    let mut dark = ConstLux(1.0);
    let mut event = GateEvent::Unchanged;
    for _ in 0..10 {
        event = scheduler.service_gate(&mut dark, &mut gate);
        if event == GateEvent::TurnedOn {
            break;
        }
    }
    assert_eq!(event, GateEvent::TurnedOn);
    assert!(store.snapshot().lamp_on);

    // Rendering resumes on the next tick.
    scheduler.tick();
    assert!(scheduler.output().frame_count() > 1);
}

#[test]
fn failed_sensor_reads_retain_the_previous_state() {
    let store = ConfigStore::new(LampConfig::halloween(10, 8));
    let mut scheduler: FlickerScheduler<'_, MockStrip, 32> =
        FlickerScheduler::new(&store, MockStrip::new(), FramePacing::default(), SEED);
    let mut gate = DaylightGate::new(gate_config(3));

    let mut bright = ConstLux(200.0);
    scheduler.service_gate(&mut bright, &mut gate);
    scheduler.service_gate(&mut bright, &mut gate);
    let counter = gate.counter();

    let mut broken = FailingLux;
    for _ in 0..20 {
        assert_eq!(
            scheduler.service_gate(&mut broken, &mut gate),
            GateEvent::Unchanged
        );
    }
    assert_eq!(gate.counter(), counter);
    assert!(gate.is_on());
}
