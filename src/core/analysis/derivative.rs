//! First-derivative series for instantaneous and cycle-RMS channels

use crate::core::types::{
    CycleSet, DataPoint, MeasurementKind, NamedSeries, Phase, WaveformSet,
};

/// Finite-difference derivative of a point series, in value units per
/// millisecond.
///
/// The first point differences against itself, which makes its derivative
/// the 0/0 non-finite marker consumers already tolerate.
pub(crate) fn derivative_points(points: &[DataPoint]) -> Vec<[f64; 2]> {
    let mut last_time = 0.0;
    let mut last_value = 0.0;

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            if index == 0 {
                last_time = point.time;
                last_value = point.value;
            }

            let slope = (point.value - last_value) / (point.time - last_time);
            last_time = point.time;
            last_value = point.value;

            [point.time, slope]
        })
        .collect()
}

/// Derivative of one series, wrapped as output.
pub fn first_derivative_series(
    points: &[DataPoint],
    label: &str,
    unit: &str,
    group: &str,
    legend: &str,
) -> NamedSeries {
    NamedSeries::new(
        format!("{label} First Derivative"),
        format!("{unit}/ms"),
        group,
        legend,
    )
    .with_points(derivative_points(points))
}

/// Derivatives of every line-to-neutral instantaneous channel plus the
/// cycle-RMS series that came with the event.
pub fn first_derivative(set: &WaveformSet, cycles: &CycleSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.push(first_derivative_series(
                &waveform.points,
                &waveform.name(),
                waveform.unit(),
                &waveform.asset,
                kind.short_label(),
            ));
        }
    }

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for phase in Phase::line_to_neutral() {
            let series = match kind {
                MeasurementKind::Voltage => cycles.voltage(phase),
                MeasurementKind::Current => cycles.current(phase),
            };
            if let Some(series) = series {
                out.push(first_derivative_series(
                    &series.rms,
                    &format!("{}{} RMS", kind.short_label(), phase.label()),
                    kind.unit(),
                    "",
                    "RMS",
                ));
            }
        }
    }

    out
}
