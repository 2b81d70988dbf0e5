//! Pre/post-fault reference removal
//!
//! The pre-fault series subtracts the first recorded cycle from every
//! sample, aligned by sample-in-cycle index and wrapping; the post-fault
//! series does the same against the last cycle, aligned from the end of
//! the record. Current channels report sample minus reference, voltage
//! channels ("missing voltage") the reference minus sample.

use crate::core::analysis::samples_per_cycle;
use crate::core::types::{MeasurementKind, NamedSeries, Waveform, WaveformSet};

/// Pre/post-fault referenced series for every line-to-neutral current.
pub fn remove_current(set: &WaveformSet, system_frequency: f64) -> Vec<NamedSeries> {
    referenced_lookup(set, system_frequency, MeasurementKind::Current, false)
}

/// Pre/post-fault missing-voltage series for every line-to-neutral voltage.
pub fn missing_voltage(set: &WaveformSet, system_frequency: f64) -> Vec<NamedSeries> {
    referenced_lookup(set, system_frequency, MeasurementKind::Voltage, true)
}

fn referenced_lookup(
    set: &WaveformSet,
    system_frequency: f64,
    kind: MeasurementKind,
    invert: bool,
) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for waveform in set.line_to_neutral(kind) {
        let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
        if spc == 0 || waveform.len() < spc {
            continue;
        }

        let name = waveform.name();
        out.push(
            NamedSeries::new(
                format!("{name} Pre Fault"),
                waveform.unit(),
                &waveform.asset,
                "Pre",
            )
            .with_points(pre_fault_points(waveform, spc, invert)),
        );
        out.push(
            NamedSeries::new(
                format!("{name} Post Fault"),
                waveform.unit(),
                &waveform.asset,
                "Post",
            )
            .with_points(post_fault_points(waveform, spc, invert)),
        );
    }

    out
}

fn pre_fault_points(waveform: &Waveform, spc: usize, invert: bool) -> Vec<[f64; 2]> {
    let first_cycle = &waveform.points[..spc];

    waveform
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let reference = first_cycle[index % spc].value;
            [point.time, signed(point.value, reference, invert)]
        })
        .collect()
}

fn post_fault_points(waveform: &Waveform, spc: usize, invert: bool) -> Vec<[f64; 2]> {
    let n = waveform.len();

    // walk the record backwards so the reference cycle aligns to the end,
    // then restore ascending time order
    let mut points: Vec<[f64; 2]> = waveform
        .points
        .iter()
        .rev()
        .enumerate()
        .map(|(reverse_index, point)| {
            let reference = waveform.points[n - 1 - (reverse_index % spc)].value;
            [point.time, signed(point.value, reference, invert)]
        })
        .collect();

    points.reverse();
    points
}

fn signed(value: f64, reference: f64, invert: bool) -> f64 {
    if invert {
        reference - value
    } else {
        value - reference
    }
}
