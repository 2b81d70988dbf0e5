//! Clipped-waveform detection and sine-fit reconstruction
//!
//! A sample counts as clipped when its first derivative is nearly flat and
//! it sits against the observed extremes of the record. Each contiguous
//! clipped run is rebuilt from a fixed-frequency sine fitted to the intact
//! samples in a recovery window around the run.

use crate::core::analysis::derivative::derivative_points;
use crate::core::types::{MeasurementKind, NamedSeries, Waveform, WaveformSet};
use crate::core::dsp::sine_fit;

const CLIP_THRESHOLD: f64 = 1e-3;

/// Repaired waveforms for every line-to-neutral V/I channel present.
pub fn clipped_waveforms(set: &WaveformSet, system_frequency: f64) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.push(repair_waveform(system_frequency, waveform));
        }
    }

    out
}

/// Detect and repair clipped sections of one channel.
pub fn repair_waveform(system_frequency: f64, waveform: &Waveform) -> NamedSeries {
    let name = waveform.name();
    let series = NamedSeries::new(
        format!("{name} Fixed Clipping"),
        waveform.unit(),
        &waveform.asset,
        waveform.measurement.short_label(),
    );

    let n = waveform.len();
    if n == 0 {
        return series;
    }

    let max = waveform.points.iter().map(|p| p.value).fold(f64::MIN, f64::max);
    let min = waveform.points.iter().map(|p| p.value).fold(f64::MAX, f64::min);
    let relative_threshold = CLIP_THRESHOLD * (max - min);

    let derivative = derivative_points(&waveform.points);
    let mut clipped: Vec<bool> = waveform
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let dist_to_top = (point.value - max).abs();
            let dist_to_bottom = (point.value - min).abs();
            derivative[i][1].abs() < CLIP_THRESHOLD
                && dist_to_top.min(dist_to_bottom) < relative_threshold
        })
        .collect();

    let mut points: Vec<[f64; 2]> = waveform
        .points
        .iter()
        .map(|p| [p.time, p.value])
        .collect();

    // every pass clears at least the run it found, so this ends after at
    // most one iteration per clipped sample
    while let Some(start) = clipped.iter().position(|&c| c) {
        let end = clipped[start..]
            .iter()
            .position(|&c| !c)
            .map(|offset| start + offset)
            .unwrap_or(n - 1);

        for flag in &mut clipped[start..=end] {
            *flag = false;
        }

        let length = end - start;
        let recovery_start = start.saturating_sub(length / 2);
        let recovery_end = (end + length / 2).min(n - 1);

        let mut fit_values = Vec::new();
        let mut fit_times = Vec::new();
        for (i, point) in points
            .iter()
            .enumerate()
            .take(recovery_end + 1)
            .skip(recovery_start)
        {
            if i < start || i > end {
                fit_values.push(point[1]);
                fit_times.push(point[0] / 1000.0);
            }
        }

        let wave = sine_fit(&fit_values, &fit_times, system_frequency);

        for point in &mut points[start..=end] {
            point[1] = wave.evaluate(point[0] / 1000.0);
        }
    }

    series.with_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataPoint, Phase};
    use std::f64::consts::PI;

    fn sine_waveform(amplitude: f64, clip_at: Option<f64>) -> Waveform {
        let points = (0..1200)
            .map(|i| {
                let t_ms = i as f64 / 7.2;
                let mut value = amplitude * (2.0 * PI * 60.0 * t_ms / 1000.0).sin();
                if let Some(limit) = clip_at {
                    value = value.clamp(-limit, limit);
                }
                DataPoint { time: t_ms, value }
            })
            .collect();

        Waveform {
            measurement: MeasurementKind::Voltage,
            phase: Phase::AN,
            asset: "Bus 1".into(),
            sample_rate: 7200.0,
            points,
        }
    }

    #[test]
    fn clean_waveform_passes_through_unchanged() {
        let waveform = sine_waveform(100.0, None);
        let repaired = repair_waveform(60.0, &waveform);

        for (point, original) in repaired.points.iter().zip(&waveform.points) {
            assert_eq!(point[1], original.value);
        }
    }

    #[test]
    fn hard_clipped_sine_is_reconstructed() {
        let waveform = sine_waveform(100.0, Some(80.0));
        let repaired = repair_waveform(60.0, &waveform);

        let peak = repaired
            .points
            .iter()
            .map(|p| p[1].abs())
            .fold(0.0f64, f64::max);
        assert!(peak > 95.0, "repair did not restore the peak: {peak}");

        // repaired samples track the ideal sine closely
        for point in &repaired.points {
            let ideal = 100.0 * (2.0 * PI * 60.0 * point[0] / 1000.0).sin();
            assert!(
                (point[1] - ideal).abs() < 5.0,
                "at t={} repaired {} vs ideal {ideal}",
                point[0],
                point[1]
            );
        }
    }

    #[test]
    fn repair_terminates_with_no_flags_left() {
        // a run that extends to the very last sample still terminates
        let mut waveform = sine_waveform(100.0, Some(80.0));
        let n = waveform.points.len();
        for point in &mut waveform.points[n - 30..] {
            point.value = 100.0;
        }

        let repaired = repair_waveform(60.0, &waveform);
        assert_eq!(repaired.points.len(), n);
        assert!(repaired.points.iter().all(|p| p[1].is_finite()));
    }

    #[test]
    fn empty_waveform_yields_empty_series() {
        let mut waveform = sine_waveform(1.0, None);
        waveform.points.clear();
        let repaired = repair_waveform(60.0, &waveform);
        assert!(repaired.points.is_empty());
    }
}
