//! Per-cycle power from voltage/current phasor pairs
//!
//! `S = V·conj(I)` per cycle and phase; the three-phase totals are only
//! emitted when every phase produced a non-empty series.

use log::warn;
use num_complex::Complex64;

use crate::core::types::{CycleSet, NamedSeries, Phase};

/// Reactive/active/apparent power and power factor per phase, plus totals.
pub fn power(cycles: &CycleSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();
    let mut per_phase: Vec<Vec<(f64, Complex64)>> = Vec::new();

    for phase in Phase::line_to_neutral() {
        let (Some(voltage), Some(current)) = (cycles.voltage(phase), cycles.current(phase))
        else {
            continue;
        };

        let points: Vec<(f64, Complex64)> = voltage
            .phasors()
            .zip(current.phasors())
            .map(|((time, v), (_, i))| (time, v * i.conj()))
            .collect();

        out.extend(power_series(&points, &format!("{} ", phase.label()), phase.legend()));
        per_phase.push(points);
    }

    if per_phase.len() == 3 && per_phase.iter().all(|p| !p.is_empty()) {
        let totals: Vec<(f64, Complex64)> = per_phase[0]
            .iter()
            .zip(&per_phase[1])
            .zip(&per_phase[2])
            .map(|((a, b), c)| (a.0, a.1 + b.1 + c.1))
            .collect();

        out.extend(power_series(&totals, "Total ", "Sum"));
    } else if !per_phase.is_empty() {
        warn!("three-phase power totals skipped: not all phases present");
    }

    out
}

fn power_series(points: &[(f64, Complex64)], prefix: &str, legend: &str) -> Vec<NamedSeries> {
    vec![
        NamedSeries::new(
            format!("{prefix}Reactive Power"),
            "VAR",
            "Reactive Power",
            legend,
        )
        .with_points(points.iter().map(|(t, s)| [*t, s.im]).collect()),
        NamedSeries::new(
            format!("{prefix}Active Power"),
            "W",
            "Active Power",
            legend,
        )
        .with_points(points.iter().map(|(t, s)| [*t, s.re]).collect()),
        NamedSeries::new(
            format!("{prefix}Apparent Power"),
            "VA",
            "Apparent Power",
            legend,
        )
        .with_points(points.iter().map(|(t, s)| [*t, s.norm()]).collect()),
        NamedSeries::new(
            format!("{prefix}Power Factor"),
            "pf",
            "Power Factor",
            legend,
        )
        .with_points(points.iter().map(|(t, s)| [*t, s.re / s.norm()]).collect()),
    ]
}
