use super::*;
use crate::model::measurement::{MeasurementPair, MeasurementSet};

fn ord(v: i32) -> Ordinal {
    Ordinal::from(v)
}

fn candidate(low: i32, high: i32) -> DiaBreakpoints {
    DiaBreakpoints::new(ord(low), ord(high))
}

fn scenario_set() -> MeasurementSet {
    MeasurementSet::from_counts(vec![
        (MeasurementPair::new(ord(1), ord(34)), 3),
        (MeasurementPair::new(ord(1), ord(39)), 2),
        (MeasurementPair::new(ord(-2), ord(30)), 5),
    ])
}

#[test]
fn mic_boundaries_go_to_outer_zones() {
    let cfg = BreakpointConfig::default();
    assert_eq!(classify_mic(-1.0, &cfg).0, Call::Resistant);
    assert_eq!(classify_mic(1.0, &cfg).0, Call::Susceptible);
    assert_eq!(classify_mic(0.0, &cfg).0, Call::Intermediate);
    assert_eq!(classify_mic(-0.5, &cfg).0, Call::Intermediate);
}

#[test]
fn dia_boundaries_go_to_outer_zones() {
    let c = candidate(34, 39);
    assert_eq!(classify_dia(34.0, c), Call::Susceptible);
    assert_eq!(classify_dia(35.0, c), Call::Intermediate);
    assert_eq!(classify_dia(38.9, c), Call::Intermediate);
    assert_eq!(classify_dia(39.0, c), Call::Resistant);
    assert_eq!(classify_dia(30.0, c), Call::Susceptible);
}

#[test]
fn far_tier_uses_closed_cutoff() {
    let cfg = BreakpointConfig {
        mic_low: -2.0,
        mic_high: 2.0,
        ..BreakpointConfig::default()
    };
    // mic_range = 3
    assert_eq!(classify_mic(4.0, &cfg), (Call::Susceptible, Tier::Near));
    assert_eq!(classify_mic(5.0, &cfg), (Call::Susceptible, Tier::Far));
    assert_eq!(classify_mic(-4.0, &cfg), (Call::Resistant, Tier::Near));
    assert_eq!(classify_mic(-5.0, &cfg), (Call::Resistant, Tier::Far));
    assert_eq!(classify_mic(0.0, &cfg), (Call::Intermediate, Tier::Near));
}

#[test]
fn nan_is_unclassifiable() {
    let cfg = BreakpointConfig::default();
    assert_eq!(classify_mic(f64::NAN, &cfg).0, Call::Unclassifiable);
    assert_eq!(classify_dia(f64::NAN, candidate(30, 35)), Call::Unclassifiable);
}

#[test]
fn worked_scenario() {
    let cfg = BreakpointConfig::default();
    let set = scenario_set();
    let counts = classify_candidate(set.pair_counts(), &cfg, candidate(34, 39));

    assert_eq!(counts.get(Category::new(Call::Susceptible, Call::Susceptible, Tier::Near)), 3);
    assert_eq!(counts.get(Category::new(Call::Susceptible, Call::Resistant, Tier::Near)), 2);
    assert_eq!(counts.get(Category::new(Call::Resistant, Call::Susceptible, Tier::Far)), 5);
    assert_eq!(counts.len(), 3);
    assert_eq!(counts.total(), set.total());
}

#[test]
fn classification_partitions_the_table() {
    let cfg = BreakpointConfig::default();
    let mut raw = Vec::new();
    for mic in -4..=4 {
        for dia in 20..=40 {
            raw.push((MeasurementPair::new(ord(mic), ord(dia)), ((mic + dia) % 3 + 1) as u64));
        }
    }
    let set = MeasurementSet::from_counts(raw);
    for (low, high) in [(20, 21), (25, 33), (39, 40), (22, 38)] {
        let counts = classify_candidate(set.pair_counts(), &cfg, candidate(low, high));
        assert_eq!(counts.total(), set.total());
    }
}

#[test]
fn synthetic_counts_without_measurement_set() {
    let cfg = BreakpointConfig::default();
    let mut pairs = PairCounts::new();
    pairs.insert(MeasurementPair::new(ord(0), ord(36)), 4);
    let counts = classify_candidate(&pairs, &cfg, candidate(34, 39));
    assert_eq!(
        counts.get(Category::new(Call::Intermediate, Call::Intermediate, Tier::Near)),
        4
    );
}

#[test]
fn ordered_pair_requires_low_below_high() {
    assert!(DiaBreakpoints::ordered(30.0, 35.0).is_some());
    assert!(DiaBreakpoints::ordered(35.0, 35.0).is_none());
    assert!(DiaBreakpoints::ordered(36.0, 35.0).is_none());
    assert!(DiaBreakpoints::ordered(f64::NAN, 35.0).is_none());
}
