//! Per-cycle waveform overlay
//!
//! Every cycle of a channel replotted against its sample-in-cycle index,
//! with a NaN point separating consecutive cycles so chart consumers break
//! the line between them.

use crate::core::analysis::samples_per_cycle;
use crate::core::types::{MeasurementKind, NamedSeries, Waveform, WaveformSet};

/// Overlaid cycles for every line-to-neutral V/I channel present.
pub fn overlapping_cycles(set: &WaveformSet, system_frequency: f64) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.push(generate_overlay(system_frequency, waveform));
        }
    }

    out
}

fn generate_overlay(system_frequency: f64, waveform: &Waveform) -> NamedSeries {
    let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
    let mut series = NamedSeries::new(
        format!("{} Overlapping", waveform.name()),
        waveform.unit(),
        &waveform.asset,
        waveform.measurement.short_label(),
    );

    if spc == 0 {
        return series;
    }

    for cycle in waveform.points.chunks(spc) {
        for (sample_index, point) in cycle.iter().enumerate() {
            series.points.push([sample_index as f64, point.value]);
        }
        series.points.push([f64::NAN, f64::NAN]);
    }

    series
}
