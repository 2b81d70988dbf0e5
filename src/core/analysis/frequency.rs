//! Zero-crossing frequency tracking
//!
//! Instantaneous frequency comes from the spacing of interpolated zero
//! crossings two apart (one full cycle). The system average sums whatever
//! phase series are available and smooths the result with a 3-point median
//! filter, edges held.

use crate::core::types::{NamedSeries, Phase, Waveform, WaveformSet};

/// Per-phase voltage frequency series plus the system average.
pub fn frequency(set: &WaveformSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();
    let mut phase_series = Vec::new();

    for (phase, label) in [
        (Phase::AN, "Va"),
        (Phase::BN, "Vb"),
        (Phase::CN, "Vc"),
    ] {
        match set.voltage(phase) {
            Some(waveform) => {
                let series = track_frequency(waveform, label);
                out.push(series.clone());
                phase_series.push(series);
            }
            None => continue,
        }
    }

    if let Some(average) = system_average(&phase_series) {
        out.push(average);
    }

    out
}

/// Frequency of one channel from its zero crossings.
pub fn track_frequency(waveform: &Waveform, label: &str) -> NamedSeries {
    let mut series = NamedSeries::new(
        format!("{label} Frequency"),
        "Hz",
        &waveform.asset,
        waveform.phase.legend(),
    );

    // interpolated crossing instants, in ms
    let mut crossings = Vec::new();
    for pair in waveform.points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if p1.value * p2.value < 0.0 || p1.value == 0.0 {
            let slope = (p2.value - p1.value) / (p2.time - p1.time);
            crossings.push(p1.time + (0.0 - p1.value) / slope);
        }
    }

    // a full cycle spans crossings two apart
    series.points = crossings
        .windows(3)
        .map(|w| [w[0], 1.0 / ((w[2] - w[0]) / 1000.0)])
        .collect();

    series
}

/// Pointwise mean of the available phase series, median-filtered.
fn system_average(phase_series: &[NamedSeries]) -> Option<NamedSeries> {
    let first = phase_series.first()?;

    let mut points: Vec<[f64; 2]> = first.points.clone();
    for series in &phase_series[1..] {
        points = points
            .iter()
            .zip(&series.points)
            .map(|(a, b)| [a[0], a[1] + b[1]])
            .collect();
    }

    let count = phase_series.len() as f64;
    for point in &mut points {
        point[1] /= count;
    }

    Some(
        NamedSeries::new("Frequency", "Hz", "System Average", "Avg")
            .with_points(median_filter(points)),
    )
}

/// 3-point median filter: edges held constant, every midpoint replaced by
/// the median of itself and its neighbors.
fn median_filter(points: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if points.len() < 3 {
        return points;
    }

    let mut filtered = Vec::with_capacity(points.len());
    filtered.push(points[0]);

    for window in points.windows(3) {
        filtered.push([window[1][0], median3(window[0][1], window[1][1], window[2][1])]);
    }

    filtered.push(points[points.len() - 1]);
    filtered
}

fn median3(a: f64, b: f64, c: f64) -> f64 {
    f64::max(f64::min(a, b), f64::min(f64::max(a, b), c))
}
