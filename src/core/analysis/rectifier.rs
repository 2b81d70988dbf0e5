//! Three-phase rectified envelope
//!
//! Per-sample maximum of the absolute phase values. The voltage envelope
//! can be smoothed once, forward-only, through a first-order stage whose
//! corner comes from an RC time constant in milliseconds; the current
//! envelope is reported raw.

use num_complex::Complex64;

use crate::core::analysis::samples_per_cycle;
use crate::core::dsp::Filter;
use crate::core::types::{NamedSeries, Phase, Waveform, WaveformSet};

/// Voltage and current rectifier envelopes; each needs all three phases.
pub fn rectifier(set: &WaveformSet, system_frequency: f64, rc_ms: f64) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    let Some(va) = set.voltage(Phase::AN) else {
        return out;
    };
    let spc = samples_per_cycle(va.sample_rate, system_frequency);

    if let (Some(va), Some(vb), Some(vc)) = (
        set.voltage(Phase::AN),
        set.voltage(Phase::BN),
        set.voltage(Phase::CN),
    ) {
        let mut envelope = phase_maxes(va, vb, vc);

        if rc_ms > 0.0 {
            let wc = 2.0 * std::f64::consts::PI / (rc_ms / 1000.0);
            let mut smoothing =
                Filter::new(vec![Complex64::new(-wc, 0.0)], Vec::new(), wc);

            let values: Vec<f64> = envelope.iter().map(|p| p[1]).collect();
            let smoothed = smoothing.filt(&values, spc as f64 * system_frequency);
            for (point, value) in envelope.iter_mut().zip(smoothed) {
                point[1] = value;
            }
        }

        out.push(
            NamedSeries::new("Voltage Rectifier", "V", "", "V").with_points(envelope),
        );
    }

    if let (Some(ia), Some(ib), Some(ic)) = (
        set.current(Phase::AN),
        set.current(Phase::BN),
        set.current(Phase::CN),
    ) {
        out.push(
            NamedSeries::new("Current Rectifier", "A", "", "I")
                .with_points(phase_maxes(ia, ib, ic)),
        );
    }

    out
}

fn phase_maxes(a: &Waveform, b: &Waveform, c: &Waveform) -> Vec<[f64; 2]> {
    a.points
        .iter()
        .zip(&b.points)
        .zip(&c.points)
        .map(|((pa, pb), pc)| {
            [
                pa.time,
                pa.value.abs().max(pb.value.abs()).max(pc.value.abs()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataPoint, MeasurementKind, Waveform};
    use std::f64::consts::PI;

    fn phase_waveform(kind: MeasurementKind, phase: Phase, shift: f64) -> Waveform {
        let points = (0..1200)
            .map(|i| {
                let t_ms = i as f64 / 7.2;
                DataPoint {
                    time: t_ms,
                    value: 100.0 * (2.0 * PI * 60.0 * t_ms / 1000.0 + shift).sin(),
                }
            })
            .collect();

        Waveform {
            measurement: kind,
            phase,
            asset: "Bus 1".into(),
            sample_rate: 7200.0,
            points,
        }
    }

    fn three_phase(kind: MeasurementKind) -> Vec<Waveform> {
        let third = 2.0 * PI / 3.0;
        vec![
            phase_waveform(kind, Phase::AN, 0.0),
            phase_waveform(kind, Phase::BN, -third),
            phase_waveform(kind, Phase::CN, third),
        ]
    }

    #[test]
    fn raw_envelope_stays_near_the_amplitude() {
        let set = WaveformSet {
            waveforms: three_phase(MeasurementKind::Voltage),
        };
        let series = rectifier(&set, 60.0, 0.0);

        assert_eq!(series.len(), 1);
        // a three-phase rectified envelope ripples between cos(30°)·A and A
        for point in &series[0].points {
            assert!(point[1] <= 100.0 + 1e-9);
            assert!(point[1] >= 100.0 * (PI / 6.0).cos() - 1e-9);
        }
    }

    #[test]
    fn smoothing_reduces_the_ripple() {
        let set = WaveformSet {
            waveforms: three_phase(MeasurementKind::Voltage),
        };
        let raw = rectifier(&set, 60.0, 0.0);
        let smoothed = rectifier(&set, 60.0, 10.0);

        let spread = |series: &NamedSeries| {
            let tail = &series.points[600..];
            let max = tail.iter().map(|p| p[1]).fold(f64::MIN, f64::max);
            let min = tail.iter().map(|p| p[1]).fold(f64::MAX, f64::min);
            max - min
        };

        assert!(spread(&smoothed[0]) < spread(&raw[0]) * 0.5);
    }

    #[test]
    fn missing_phase_b_current_skips_the_current_envelope() {
        let mut waveforms = three_phase(MeasurementKind::Voltage);
        waveforms.push(phase_waveform(MeasurementKind::Current, Phase::AN, 0.0));
        waveforms.push(phase_waveform(MeasurementKind::Current, Phase::CN, 0.0));
        let set = WaveformSet { waveforms };

        let series = rectifier(&set, 60.0, 0.0);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Voltage Rectifier");
    }

    #[test]
    fn no_phase_a_voltage_returns_nothing() {
        let set = WaveformSet {
            waveforms: vec![phase_waveform(MeasurementKind::Current, Phase::AN, 0.0)],
        };
        assert!(rectifier(&set, 60.0, 0.0).is_empty());
    }
}
