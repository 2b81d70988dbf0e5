//! Rapid voltage change
//!
//! Per-cycle step of the voltage RMS series, expressed as a percentage of
//! the nominal voltage supplied by the caller.

use crate::core::types::{CycleSet, DataPoint, NamedSeries, Phase};

/// RVC series for every voltage phase with a cycle-RMS series present.
pub fn rapid_voltage_change(cycles: &CycleSet, nominal_voltage: f64) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for phase in Phase::line_to_neutral() {
        if let Some(series) = cycles.voltage(phase) {
            out.push(rvc_series(
                &series.rms,
                &format!("V{}", phase.label()),
                phase.legend(),
                nominal_voltage,
            ));
        }
    }

    out
}

fn rvc_series(
    rms: &[DataPoint],
    label: &str,
    legend: &str,
    nominal_voltage: f64,
) -> NamedSeries {
    let mut last_value = 0.0;

    let points = rms
        .iter()
        .enumerate()
        .map(|(index, point)| {
            if index == 0 {
                last_value = point.value;
            }
            let step = [point.time, (point.value - last_value) * 100.0 / nominal_voltage];
            last_value = point.value;
            step
        })
        .collect();

    NamedSeries::new(format!("{label} Rapid Voltage Change"), "%", "", legend)
        .with_points(points)
}
