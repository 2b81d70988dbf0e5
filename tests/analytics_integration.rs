//! End-to-end checks over a synthetic disturbance record
//!
//! The reference scenario: 10 cycles of a 60 Hz, 120 samples/cycle sine of
//! amplitude 100 on phase AN, with the other phases shifted ±120°.

use std::f64::consts::PI;

use faultscope::core::analysis::{
    clipping, derivative, drift, filtering, frequency, harmonics, power, rectifier, sequence,
};
use faultscope::core::dsp::Filter;
use faultscope::core::types::{
    CycleSeries, CycleSet, DataPoint, MeasurementKind, Phase, Waveform, WaveformSet,
};

const SAMPLE_RATE: f64 = 7200.0;
const SYSTEM_FREQUENCY: f64 = 60.0;
const AMPLITUDE: f64 = 100.0;
const CYCLES: usize = 10;

// =============================================================================
// Test Utilities
// =============================================================================

/// 10 cycles of a clean sine on one channel
fn sine_channel(kind: MeasurementKind, phase: Phase, shift: f64) -> Waveform {
    let samples = (SAMPLE_RATE / SYSTEM_FREQUENCY) as usize * CYCLES;
    let points = (0..samples)
        .map(|i| {
            let t_ms = i as f64 * 1000.0 / SAMPLE_RATE;
            DataPoint {
                time: t_ms,
                value: AMPLITUDE * (2.0 * PI * SYSTEM_FREQUENCY * t_ms / 1000.0 + shift).sin(),
            }
        })
        .collect();

    Waveform {
        measurement: kind,
        phase,
        asset: "Bus 1".into(),
        sample_rate: SAMPLE_RATE,
        points,
    }
}

fn three_phase_record() -> WaveformSet {
    let third = 2.0 * PI / 3.0;
    WaveformSet {
        waveforms: vec![
            sine_channel(MeasurementKind::Voltage, Phase::AN, 0.0),
            sine_channel(MeasurementKind::Voltage, Phase::BN, -third),
            sine_channel(MeasurementKind::Voltage, Phase::CN, third),
            sine_channel(MeasurementKind::Current, Phase::AN, -0.2),
            sine_channel(MeasurementKind::Current, Phase::BN, -third - 0.2),
            sine_channel(MeasurementKind::Current, Phase::CN, third - 0.2),
        ],
    }
}

fn balanced_cycle_set() -> CycleSet {
    let third = 2.0 * PI / 3.0;
    let series = |rms: f64, angle: f64| CycleSeries {
        rms: (0..CYCLES)
            .map(|i| DataPoint {
                time: i as f64 * 1000.0 / SYSTEM_FREQUENCY,
                value: rms,
            })
            .collect(),
        phase: (0..CYCLES)
            .map(|i| DataPoint {
                time: i as f64 * 1000.0 / SYSTEM_FREQUENCY,
                value: angle,
            })
            .collect(),
    };

    CycleSet {
        va: Some(series(7200.0, 0.0)),
        vb: Some(series(7200.0, -third)),
        vc: Some(series(7200.0, third)),
        ia: Some(series(100.0, -0.2)),
        ib: Some(series(100.0, -third - 0.2)),
        ic: Some(series(100.0, third - 0.2)),
    }
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn thd_of_the_clean_record_stays_below_one_percent() {
    let record = three_phase_record();
    let series = harmonics::thd(&record, SYSTEM_FREQUENCY);

    assert_eq!(series.len(), 6);
    for channel in &series {
        assert_eq!(channel.points.len(), 1200 - 120);
        for point in &channel.points {
            assert!(
                point[1] < 1.0,
                "{}: THD {} at {}",
                channel.label,
                point[1],
                point[0]
            );
        }
    }
}

#[test]
fn derivative_peak_matches_amplitude_times_omega() {
    let record = three_phase_record();
    let cycles = CycleSet::default();
    let series = derivative::first_derivative(&record, &cycles);

    let van = series
        .iter()
        .find(|s| s.label == "VAN First Derivative")
        .expect("VAN derivative series");

    let peak = van.points.iter().map(|p| p[1].abs()).fold(0.0f64, f64::max);
    let expected = AMPLITUDE * 2.0 * PI * SYSTEM_FREQUENCY / 1000.0;
    assert!(
        (peak - expected).abs() < 0.05,
        "peak {peak} vs expected {expected}"
    );
    assert_eq!(van.unit, "V/ms");
}

#[test]
fn frequency_average_of_the_record_is_the_system_frequency() {
    let record = three_phase_record();
    let series = frequency::frequency(&record);

    // Va, Vb, Vc plus the system average
    assert_eq!(series.len(), 4);
    let average = series.last().unwrap();
    assert!(!average.points.is_empty());
    for point in &average.points {
        assert!((point[1] - SYSTEM_FREQUENCY).abs() < 1e-6);
    }
}

// =============================================================================
// Filtering boundaries
// =============================================================================

#[test]
fn order_four_design_yields_degenerate_filtering() {
    // the design itself must not fail
    let mut filter = Filter::low_pass_butterworth(120.0, 4);

    let record = three_phase_record();
    let values = record.waveforms[0].values();
    let output = filter.filt(&values, SAMPLE_RATE);

    assert_eq!(output.len(), values.len());
    assert!(output.iter().all(|y| *y == 0.0));
}

#[test]
fn zero_phase_filtering_keeps_the_record_length() {
    let record = three_phase_record();
    let series = filtering::low_pass(&record, SYSTEM_FREQUENCY, 1);

    assert_eq!(series.len(), 6);
    for channel in &series {
        assert_eq!(channel.points.len(), 1200);
        assert!(channel.points.iter().all(|p| p[1].is_finite()));
    }
}

// =============================================================================
// Clipping repair
// =============================================================================

#[test]
fn clipped_record_is_repaired_toward_the_original() {
    let mut record = three_phase_record();
    for waveform in &mut record.waveforms {
        for point in &mut waveform.points {
            point.value = point.value.clamp(-75.0, 75.0);
        }
    }

    let series = clipping::clipped_waveforms(&record, SYSTEM_FREQUENCY);
    assert_eq!(series.len(), 6);

    for channel in &series {
        let peak = channel.points.iter().map(|p| p[1].abs()).fold(0.0f64, f64::max);
        assert!(
            peak > 90.0,
            "{}: peak after repair only {peak}",
            channel.label
        );
    }
}

// =============================================================================
// Phasor analytics over the balanced set
// =============================================================================

#[test]
fn balanced_record_has_no_negative_sequence() {
    let cycles = balanced_cycle_set();
    let series = sequence::symmetrical_components(&cycles);

    assert_eq!(series.len(), 6);
    let v1 = series.iter().find(|s| s.label == "Voltage S1").unwrap();
    let v2 = series.iter().find(|s| s.label == "Voltage S2").unwrap();

    for (p1, p2) in v1.points.iter().zip(&v2.points) {
        assert!((p1[1] - 7200.0).abs() < 1e-6);
        assert!(p2[1] < 1e-6);
    }
}

#[test]
fn total_power_is_three_times_the_phase_power() {
    let cycles = balanced_cycle_set();
    let series = power::power(&cycles);

    let phase_active = series.iter().find(|s| s.label == "AN Active Power").unwrap();
    let total_active = series
        .iter()
        .find(|s| s.label == "Total Active Power")
        .unwrap();

    for (phase, total) in phase_active.points.iter().zip(&total_active.points) {
        assert!((total[1] - 3.0 * phase[1]).abs() < 1e-6);
    }

    let expected_phase = 7200.0 * 100.0 * 0.2f64.cos();
    assert!((phase_active.points[0][1] - expected_phase).abs() < 1e-6);
}

// =============================================================================
// Drift removal and envelopes
// =============================================================================

#[test]
fn steady_record_cancels_under_both_references() {
    let record = three_phase_record();
    let series = drift::remove_current(&record, SYSTEM_FREQUENCY);

    // pre and post per current phase
    assert_eq!(series.len(), 6);
    for channel in &series {
        for point in &channel.points {
            assert!(point[1].abs() < 1e-9, "{} at {}", channel.label, point[0]);
        }
    }
}

#[test]
fn rectified_envelope_tracks_the_amplitude() {
    let record = three_phase_record();
    let series = rectifier::rectifier(&record, SYSTEM_FREQUENCY, 0.0);

    assert_eq!(series.len(), 2);
    for channel in &series {
        for point in &channel.points {
            assert!(point[1] <= AMPLITUDE + 1e-9);
            assert!(point[1] >= AMPLITUDE * (PI / 6.0).cos() - 1e-9);
        }
    }
}

// =============================================================================
// Harmonic extraction across a distorted record
// =============================================================================

#[test]
fn injected_fifth_harmonic_is_recovered() {
    let mut record = three_phase_record();
    for point in &mut record.waveforms[0].points {
        let w = 2.0 * PI * SYSTEM_FREQUENCY * point.time / 1000.0;
        point.value += 8.0 * (5.0 * w).sin();
    }

    let series = harmonics::specified_harmonic(&record, SYSTEM_FREQUENCY, 5);
    let van_mag = series
        .iter()
        .find(|s| s.label == "VAN Harmonic [5] Mag")
        .unwrap();

    let expected = 8.0 / 2.0f64.sqrt();
    for point in &van_mag.points {
        assert!(
            (point[1] - expected).abs() < 1e-6,
            "magnitude {} at {}",
            point[1],
            point[0]
        );
    }

    // the other channels stay clean
    let vbn_mag = series
        .iter()
        .find(|s| s.label == "VBN Harmonic [5] Mag")
        .unwrap();
    for point in &vbn_mag.points {
        assert!(point[1] < 1e-6);
    }
}
