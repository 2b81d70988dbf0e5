//! Per-cycle impedance from voltage/current phasor pairs

use num_complex::Complex64;

use crate::core::types::{CycleSeries, CycleSet, NamedSeries, Phase};

/// Resistance, reactance, and impedance magnitude series for every phase
/// with both a voltage and a current phasor series present.
pub fn impedance(cycles: &CycleSet) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for phase in Phase::line_to_neutral() {
        let (Some(voltage), Some(current)) = (cycles.voltage(phase), cycles.current(phase))
        else {
            continue;
        };

        let points = calculate_impedance(voltage, current);
        let legend = phase.legend();
        let label = phase.label();

        out.push(
            NamedSeries::new(format!("Reactance {label}"), "Ohm", "Reactance", legend)
                .with_points(points.iter().map(|(t, z)| [*t, z.im]).collect()),
        );
        out.push(
            NamedSeries::new(format!("Resistance {label}"), "Ohm", "Resistance", legend)
                .with_points(points.iter().map(|(t, z)| [*t, z.re]).collect()),
        );
        out.push(
            NamedSeries::new(format!("Impedance {label}"), "Ohm", "Impedance", legend)
                .with_points(points.iter().map(|(t, z)| [*t, z.norm()]).collect()),
        );
    }

    out
}

/// `Z = V / I` per cycle; a zero current phasor propagates as non-finite.
fn calculate_impedance(voltage: &CycleSeries, current: &CycleSeries) -> Vec<(f64, Complex64)> {
    voltage
        .phasors()
        .zip(current.phasors())
        .map(|((time, v), (_, i))| (time, v / i))
        .collect()
}
