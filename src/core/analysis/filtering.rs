//! Zero-phase Butterworth filtering of the instantaneous channels
//!
//! Both lookups run a 120 Hz corner across every line-to-neutral V/I
//! channel. One filter instance is shared across the channels of an event,
//! so the discretization from the first channel's running rate is reused;
//! records mixing sample rates should be filtered per channel instead.

use crate::core::analysis::samples_per_cycle;
use crate::core::dsp::Filter;
use crate::core::types::{MeasurementKind, NamedSeries, WaveformSet};

const CORNER_HZ: f64 = 120.0;

/// Zero-phase Butterworth low-pass of every V/I channel.
pub fn low_pass(set: &WaveformSet, system_frequency: f64, order: usize) -> Vec<NamedSeries> {
    let filter = Filter::low_pass_butterworth(CORNER_HZ, order);
    filtered_lookup(set, system_frequency, filter, "Low Pass Filter")
}

/// Zero-phase Butterworth high-pass of every V/I channel.
pub fn high_pass(set: &WaveformSet, system_frequency: f64, order: usize) -> Vec<NamedSeries> {
    let filter = Filter::high_pass_butterworth(CORNER_HZ, order);
    filtered_lookup(set, system_frequency, filter, "High Pass Filter")
}

fn filtered_lookup(
    set: &WaveformSet,
    system_frequency: f64,
    mut filter: Filter,
    suffix: &str,
) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
            let running_rate = spc as f64 * system_frequency;

            let values = waveform.values();
            let filtered = filter.filtfilt(&values, running_rate);

            out.push(
                NamedSeries::new(
                    format!("{} {suffix}", waveform.name()),
                    waveform.unit(),
                    &waveform.asset,
                    kind.short_label(),
                )
                .with_points(
                    filtered
                        .iter()
                        .zip(&waveform.points)
                        .map(|(value, point)| [point.time, *value])
                        .collect(),
                ),
            );
        }
    }

    out
}
