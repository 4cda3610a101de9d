//! Property tests for the detectors and the status state machine

mod common;

use proptest::prelude::*;
use vitalguard_core::{
    PresenceFilter, PulseDetector, PulseEvent, StatusAggregator, StatusInputs, StatusLevel,
    StressClassifier, StressLabel,
};

use common::{pulse_train, run_detector};

fn stress_label() -> impl Strategy<Value = Option<StressLabel>> {
    prop_oneof![
        Just(None),
        Just(Some(StressLabel::Relaxed)),
        Just(Some(StressLabel::Normal)),
        Just(Some(StressLabel::Elevated)),
        Just(Some(StressLabel::High)),
        Just(Some(StressLabel::NoContact)),
    ]
}

proptest! {
    #[test]
    fn periodic_signal_yields_sixty_over_period(period_ms in 400u64..=2000) {
        // Period a multiple of the poll interval so edges land exactly
        let period_ms = period_ms / 100 * 100;
        let mut detector = PulseDetector::default();
        let samples = pulse_train(period_ms, 200, period_ms * 12);
        run_detector(&mut detector, &samples);

        let bpm = detector.bpm().unwrap();
        let expected = 60_000.0 / period_ms as f64;
        prop_assert!((bpm - expected).abs() < 1e-9, "bpm {} expected {}", bpm, expected);
    }

    #[test]
    fn plateau_yields_one_beat(
        volts in prop::collection::vec(2.51f64..5.0, 1..200),
    ) {
        let mut detector = PulseDetector::default();
        let events = volts
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| detector.step(v, i as u64 * 100))
            .count();
        prop_assert_eq!(events, 1);
    }

    #[test]
    fn close_edges_are_coalesced(gap_ms in 1u64..400) {
        let mut detector = PulseDetector::default();
        detector.step(3.0, 0);
        detector.step(0.5, 0);
        detector.step(3.0, 1000);
        detector.step(0.5, 1000);

        prop_assert_eq!(detector.step(3.0, 1000 + gap_ms), None);
        prop_assert_eq!(detector.state().last_beat_time, Some(1000));
    }

    #[test]
    fn constant_conductance_converges(value in 0.0f64..12_999.0, ticks in 10usize..40) {
        let mut classifier = StressClassifier::default();
        let mut last = None;
        for _ in 0..ticks {
            last = Some(classifier.step(value));
        }
        let reading = last.unwrap();
        prop_assert!(reading.contact);
        prop_assert!((reading.smoothed.unwrap() - value).abs() < 1e-6);
    }

    #[test]
    fn open_circuit_is_always_no_contact(
        history in prop::collection::vec(0.0f64..30_000.0, 0..30),
        value in 13_000.0f64..100_000.0,
    ) {
        let mut classifier = StressClassifier::default();
        for v in history {
            classifier.step(v);
        }
        let reading = classifier.step(value);
        prop_assert_eq!(reading.label, StressLabel::NoContact);
        prop_assert!(!reading.contact);
    }

    #[test]
    fn offset_widens_once_per_max_attempts(misses in 0u32..30) {
        let mut filter = PresenceFilter::default();
        let start = filter.state().ambient_offset;
        for _ in 0..misses {
            filter.step(25.0, 20.0);
        }
        let widenings = (misses / 3) as f64;
        prop_assert!((filter.state().ambient_offset - (start + 0.1 * widenings)).abs() < 1e-9);
        prop_assert_eq!(filter.state().consecutive_misses, misses % 3);
    }

    #[test]
    fn offset_never_shrinks(temps in prop::collection::vec((15.0f64..45.0, 10.0f64..35.0), 1..60)) {
        let mut filter = PresenceFilter::default();
        let mut previous = filter.state().ambient_offset;
        for (object, ambient) in temps {
            filter.step(object, ambient);
            prop_assert!(filter.state().ambient_offset >= previous);
            previous = filter.state().ambient_offset;
        }
    }

    #[test]
    fn absent_subject_is_always_normal(
        bpm in prop::option::of(0.0f64..250.0),
        temperature in 0.0f64..45.0,
        stress in stress_label(),
        ticks in 1usize..20,
    ) {
        let mut aggregator = StatusAggregator::default();
        let inputs = StatusInputs { bpm, stress, temperature, human_present: false };
        for _ in 0..ticks {
            let update = aggregator.evaluate(&inputs);
            prop_assert_eq!(update.level, StatusLevel::Normal);
            prop_assert!(update.alert.is_none());
        }
    }

    #[test]
    fn episode_never_exceeds_alert_cap(
        bpms in prop::collection::vec(prop_oneof![30.0f64..49.0, 55.0f64..59.0, 105.0f64..119.0, 125.0f64..200.0], 1..200),
    ) {
        // Every tick is non-Normal: one uninterrupted episode
        let mut aggregator = StatusAggregator::default();
        let mut alerts = 0;
        for bpm in bpms {
            let inputs = StatusInputs {
                bpm: Some(bpm),
                stress: Some(StressLabel::Normal),
                temperature: 36.6,
                human_present: true,
            };
            if aggregator.evaluate(&inputs).alert.is_some() {
                alerts += 1;
            }
        }
        prop_assert!(alerts <= 5);
    }
}

#[test]
fn first_alert_exactly_on_fifth_tick() {
    let mut aggregator = StatusAggregator::default();
    let inputs = StatusInputs {
        bpm: Some(115.0),
        stress: None,
        temperature: 36.6,
        human_present: true,
    };

    let first_alert = (1..=20).find(|_| aggregator.evaluate(&inputs).alert.is_some());
    assert_eq!(first_alert, Some(5));
}

#[test]
fn first_edge_never_reports_rate() {
    let mut detector = PulseDetector::default();
    let samples = pulse_train(1000, 200, 1000);
    let events = run_detector(&mut detector, &samples);

    assert!(matches!(events.as_slice(), [PulseEvent::FirstBeat { at: 0 }]));
    assert_eq!(detector.bpm(), None);
}
