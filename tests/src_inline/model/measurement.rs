use super::*;

fn pair(mic: i32, dia: i32) -> MeasurementPair {
    MeasurementPair::new(Ordinal::from(mic), Ordinal::from(dia))
}

#[test]
fn aggregates_repeated_pairs() {
    let set = MeasurementSet::from_pairs(vec![pair(1, 34), pair(1, 34), pair(-2, 30)]);
    assert_eq!(set.count(Ordinal::from(1), Ordinal::from(34)), 2);
    assert_eq!(set.count(Ordinal::from(-2), Ordinal::from(30)), 1);
    assert_eq!(set.count(Ordinal::from(0), Ordinal::from(30)), 0);
    assert_eq!(set.total(), 3);
    assert_eq!(set.distinct_pairs(), 2);
}

#[test]
fn axes_cover_every_key() {
    let set = MeasurementSet::from_counts(vec![
        (pair(1, 34), 3),
        (pair(1, 39), 2),
        (pair(-2, 30), 5),
    ]);
    for key in set.pair_counts().keys() {
        assert!(set.mic_axis().contains(&key.mic));
        assert!(set.dia_axis().contains(&key.dia));
    }
    assert!(set.pair_counts().values().all(|c| *c >= 1));
    assert_eq!(set.total(), 10);
}

#[test]
fn zero_counts_are_dropped() {
    let set = MeasurementSet::from_counts(vec![(pair(1, 34), 0), (pair(2, 35), 1)]);
    assert_eq!(set.distinct_pairs(), 1);
    assert!(!set.dia_axis().contains(&Ordinal::from(34)));
}

#[test]
fn bounds_of_empty_set_are_none() {
    let set = MeasurementSet::default();
    assert!(set.is_empty());
    assert!(set.bounds().is_none());
    let span = set.axis_values(Axis::Dia, CandidateMode::IntegerRange);
    assert_eq!(span, Ok(Vec::new()));
    assert_eq!(set.integer_span_len(Axis::Dia), None);
}

#[test]
fn axis_values_by_mode() {
    let set = MeasurementSet::from_pairs(vec![pair(-2, 30), pair(1, 34), pair(1, 33)]);
    let observed: Vec<f64> = set
        .axis_values(Axis::Dia, CandidateMode::Observed)
        .expect("observed")
        .iter()
        .map(|v| v.get())
        .collect();
    assert_eq!(observed, vec![30.0, 33.0, 34.0]);

    let span: Vec<f64> = set
        .axis_values(Axis::Dia, CandidateMode::IntegerRange)
        .expect("span")
        .iter()
        .map(|v| v.get())
        .collect();
    assert_eq!(span, vec![30.0, 31.0, 32.0, 33.0, 34.0]);

    let bounds = set.bounds().expect("bounds");
    assert_eq!(bounds.mic_min, Ordinal::from(-2));
    assert_eq!(bounds.mic_max, Ordinal::from(1));
}

#[test]
fn integer_span_rounds_inward_for_fractional_bounds() {
    let a = MeasurementPair::new(Ordinal::from(0), Ordinal::new(29.5).expect("ordinal"));
    let b = MeasurementPair::new(Ordinal::from(0), Ordinal::new(32.2).expect("ordinal"));
    let set = MeasurementSet::from_pairs(vec![a, b]);
    let span: Vec<f64> = set
        .axis_values(Axis::Dia, CandidateMode::IntegerRange)
        .expect("span")
        .iter()
        .map(|v| v.get())
        .collect();
    assert_eq!(span, vec![30.0, 31.0, 32.0]);
}

#[test]
fn span_at_the_limit_is_enumerated() {
    let top = MAX_INTEGER_SPAN as i32 - 1;
    let set = MeasurementSet::from_pairs(vec![pair(0, 0), pair(0, top)]);
    assert_eq!(set.integer_span_len(Axis::Dia), Some(MAX_INTEGER_SPAN));
    let span = set
        .axis_values(Axis::Dia, CandidateMode::IntegerRange)
        .expect("span");
    assert_eq!(span.len() as u64, MAX_INTEGER_SPAN);
    assert_eq!(span.last().copied(), Some(Ordinal::from(top)));
}

#[test]
fn wide_span_is_refused() {
    let set = MeasurementSet::from_pairs(vec![pair(0, 0), pair(0, 1_000_000_000)]);
    assert_eq!(set.integer_span_len(Axis::Dia), Some(1_000_000_001));
    let err = set
        .axis_values(Axis::Dia, CandidateMode::IntegerRange)
        .expect_err("too wide");
    assert_eq!(err.axis, Axis::Dia);
    assert_eq!(err.len, Some(1_000_000_001));
    assert_eq!(err.limit, MAX_INTEGER_SPAN);
    assert_eq!(
        set.axis_values(Axis::Dia, CandidateMode::Observed)
            .expect("observed")
            .len(),
        2
    );
}

#[test]
fn span_length_of_extreme_values_does_not_overflow() {
    let set = MeasurementSet::from_pairs(vec![
        MeasurementPair::new(Ordinal::from_int(i64::MIN), Ordinal::from(30)),
        MeasurementPair::new(Ordinal::from_int(i64::MAX), Ordinal::from(30)),
    ]);
    // i64::MAX rounds up to 2^63, outside any span
    assert_eq!(set.integer_span_len(Axis::Mic), None);
    let err = set
        .axis_values(Axis::Mic, CandidateMode::IntegerRange)
        .expect_err("too wide");
    assert_eq!(err.len, None);

    let far = MeasurementSet::from_pairs(vec![
        MeasurementPair::new(Ordinal::from(1), Ordinal::from(30)),
        MeasurementPair::new(Ordinal::from(-2), Ordinal::from_int(4_611_686_018_427_387_904)),
    ]);
    assert_eq!(far.integer_span_len(Axis::Dia), Some(4_611_686_018_427_387_875));
    assert!(far.axis_values(Axis::Dia, CandidateMode::IntegerRange).is_err());
}
