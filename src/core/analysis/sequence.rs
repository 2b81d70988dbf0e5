//! Symmetrical components and unbalance ratios

use num_complex::Complex64;

use crate::core::types::{CycleSeries, CycleSet, NamedSeries};

/// Zero/positive/negative sequence phasors for one instant
#[derive(Debug, Clone, Copy)]
pub struct SequenceComponents {
    pub s0: Complex64,
    pub s1: Complex64,
    pub s2: Complex64,
}

/// Decompose one aligned (A, B, C) phasor triple.
pub fn sequence_components(an: Complex64, bn: Complex64, cn: Complex64) -> SequenceComponents {
    let rad120 = 2.0 * std::f64::consts::PI / 3.0;
    let a = Complex64::new(rad120.cos(), rad120.sin());
    let a_sq = a * a;

    SequenceComponents {
        s0: (an + bn + cn) / 3.0,
        s1: (an + a * bn + a_sq * cn) / 3.0,
        s2: (an + a_sq * bn + a * cn) / 3.0,
    }
}

/// S0/S1/S2 magnitude series for voltage and current, each emitted only
/// when all three phases of that quantity are present.
pub fn symmetrical_components(cycles: &CycleSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    if let Some(components) = quantity_components(&cycles.va, &cycles.vb, &cycles.vc) {
        for (index, suffix) in ["S0", "S1", "S2"].iter().enumerate() {
            out.push(
                NamedSeries::new(format!("Voltage {suffix}"), "V", "", "V").with_points(
                    components
                        .iter()
                        .map(|(t, c)| [*t, magnitude_of(c, index)])
                        .collect(),
                ),
            );
        }
    }

    if let Some(components) = quantity_components(&cycles.ia, &cycles.ib, &cycles.ic) {
        for (index, suffix) in ["S0", "S1", "S2"].iter().enumerate() {
            out.push(
                NamedSeries::new(format!("Current {suffix}"), "A", "", "I").with_points(
                    components
                        .iter()
                        .map(|(t, c)| [*t, magnitude_of(c, index)])
                        .collect(),
                ),
            );
        }
    }

    out
}

/// `|S0|/|S1|` and `|S2|/|S1|` as percentages, for voltage and current.
pub fn unbalance(cycles: &CycleSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    if let Some(components) = quantity_components(&cycles.va, &cycles.vb, &cycles.vc) {
        out.extend(unbalance_series(&components, "Voltage", "V"));
    }
    if let Some(components) = quantity_components(&cycles.ia, &cycles.ib, &cycles.ic) {
        out.extend(unbalance_series(&components, "Current", "I"));
    }

    out
}

fn unbalance_series(
    components: &[(f64, SequenceComponents)],
    quantity: &str,
    legend: &str,
) -> Vec<NamedSeries> {
    vec![
        NamedSeries::new(format!("S0/S1 {quantity}"), "%", "", legend).with_points(
            components
                .iter()
                .map(|(t, c)| [*t, c.s0.norm() / c.s1.norm() * 100.0])
                .collect(),
        ),
        NamedSeries::new(format!("S2/S1 {quantity}"), "%", "", legend).with_points(
            components
                .iter()
                .map(|(t, c)| [*t, c.s2.norm() / c.s1.norm() * 100.0])
                .collect(),
        ),
    ]
}

fn magnitude_of(components: &SequenceComponents, index: usize) -> f64 {
    match index {
        0 => components.s0.norm(),
        1 => components.s1.norm(),
        _ => components.s2.norm(),
    }
}

/// Aligned per-cycle components across a full A/B/C triple, or `None`
/// when any phase is missing.
fn quantity_components(
    a: &Option<CycleSeries>,
    b: &Option<CycleSeries>,
    c: &Option<CycleSeries>,
) -> Option<Vec<(f64, SequenceComponents)>> {
    let (a, b, c) = (a.as_ref()?, b.as_ref()?, c.as_ref()?);

    Some(
        a.phasors()
            .zip(b.phasors())
            .zip(c.phasors())
            .map(|(((time, an), (_, bn)), (_, cn))| {
                (time, sequence_components(an, bn, cn))
            })
            .collect(),
    )
}
