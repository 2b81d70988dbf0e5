//! Sliding-window THD, harmonic extraction, and spectral snapshots
//!
//! All of these segment the record into one-cycle windows, scale each
//! window by 1/samples-per-cycle so bin magnitudes land at signal
//! amplitude, and run the single-sided spectrum over it. The per-window
//! harmonic extraction fans out over rayon since every window is
//! independent; the order-preserving collect gives each window its slot.

use rayon::prelude::*;

use crate::core::analysis::samples_per_cycle;
use crate::core::dsp::Spectrum;
use crate::core::types::{MeasurementKind, NamedSeries, Waveform, WaveformSet};

/// Sliding-window THD for every line-to-neutral V/I channel present.
pub fn thd(set: &WaveformSet, system_frequency: f64) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.push(generate_thd(system_frequency, waveform));
        }
    }

    out
}

fn generate_thd(system_frequency: f64, waveform: &Waveform) -> NamedSeries {
    let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
    let mut series = NamedSeries::new(
        format!("{} THD", waveform.name()),
        waveform.unit(),
        &waveform.asset,
        waveform.measurement.short_label(),
    );

    let n = waveform.len();
    series.points = (0..n.saturating_sub(spc))
        .map(|i| {
            let window: Vec<f64> = waveform.points[i..i + spc]
                .iter()
                .map(|p| p.value / spc as f64)
                .collect();
            let spectrum = Spectrum::transform(system_frequency * spc as f64, &window);

            let harmonic_sum: f64 = spectrum
                .magnitude
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != 1)
                .map(|(_, magnitude)| magnitude * magnitude)
                .sum();
            let fundamental = spectrum.magnitude[1];

            [
                waveform.points[i].time,
                100.0 * harmonic_sum.sqrt() / fundamental,
            ]
        })
        .collect();

    series
}

/// RMS magnitude and phase angle of one harmonic, per sliding window, for
/// every line-to-neutral V/I channel present.
pub fn specified_harmonic(
    set: &WaveformSet,
    system_frequency: f64,
    harmonic: u32,
) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.extend(generate_specified_harmonic(
                system_frequency,
                waveform,
                harmonic,
            ));
        }
    }

    out
}

fn generate_specified_harmonic(
    system_frequency: f64,
    waveform: &Waveform,
    harmonic: u32,
) -> Vec<NamedSeries> {
    let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
    let target_frequency = system_frequency * harmonic as f64;
    let n = waveform.len();

    // windows are independent: fan out and let the ordered collect give
    // each one its own output slot
    let windows: Vec<([f64; 2], [f64; 2])> = (0..n.saturating_sub(spc))
        .into_par_iter()
        .map(|i| {
            let window: Vec<f64> = waveform.points[i..i + spc]
                .iter()
                .map(|p| p.value / spc as f64)
                .collect();
            let spectrum = Spectrum::transform(system_frequency * spc as f64, &window);

            let time = waveform.points[i].time;
            match spectrum
                .frequency
                .iter()
                .position(|f| f.round() == target_frequency)
            {
                Some(bin) => (
                    [time, spectrum.magnitude[bin] / 2.0f64.sqrt()],
                    [time, spectrum.phase[bin].to_degrees()],
                ),
                None => ([time, f64::NAN], [time, f64::NAN]),
            }
        })
        .collect();

    let name = waveform.name();
    let magnitude = NamedSeries::new(
        format!("{name} Harmonic [{harmonic}] Mag"),
        waveform.unit(),
        &waveform.asset,
        "Mag",
    )
    .with_points(windows.iter().map(|w| w.0).collect());

    let angle = NamedSeries::new(
        format!("{name} Harmonic [{harmonic}] Ang"),
        "deg",
        &waveform.asset,
        "Ang",
    )
    .with_points(windows.iter().map(|w| w.1).collect());

    vec![magnitude, angle]
}

/// Magnitude/angle spectrum of a fixed window of `cycles` cycles starting
/// at `start_time`, plotted against bin index. Empty when fewer than
/// `cycles` full cycles remain past the start.
pub fn fft_snapshot(
    set: &WaveformSet,
    system_frequency: f64,
    start_time: f64,
    cycles: usize,
) -> Vec<NamedSeries> {
    snapshot_lookup(set, |waveform| {
        generate_fft(system_frequency, waveform, start_time, cycles)
    })
}

/// Like [`fft_snapshot`] but plotted against bin frequency, with the
/// magnitude additionally divided by the cycle count.
pub fn harmonic_spectrum(
    set: &WaveformSet,
    system_frequency: f64,
    start_time: f64,
    cycles: usize,
) -> Vec<NamedSeries> {
    snapshot_lookup(set, |waveform| {
        generate_harmonic_spectrum(system_frequency, waveform, start_time, cycles)
    })
}

fn snapshot_lookup(
    set: &WaveformSet,
    generate: impl Fn(&Waveform) -> Vec<NamedSeries>,
) -> Vec<NamedSeries> {
    let mut out = Vec::new();

    for kind in [MeasurementKind::Voltage, MeasurementKind::Current] {
        for waveform in set.line_to_neutral(kind) {
            out.extend(generate(waveform));
        }
    }

    out
}

fn generate_fft(
    system_frequency: f64,
    waveform: &Waveform,
    start_time: f64,
    cycles: usize,
) -> Vec<NamedSeries> {
    let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
    let length = spc * cycles;

    let window: Vec<f64> = waveform
        .points
        .iter()
        .skip_while(|p| p.time < start_time)
        .take(length)
        .map(|p| p.value / length as f64)
        .collect();

    if window.len() != length {
        return Vec::new();
    }

    let spectrum = Spectrum::transform(system_frequency * spc as f64, &window);
    let name = waveform.name();

    vec![
        NamedSeries::new(
            format!("{name} FFT Mag"),
            waveform.unit(),
            &waveform.asset,
            "Mag",
        )
        .with_points(
            spectrum
                .magnitude
                .iter()
                .enumerate()
                .map(|(index, value)| [index as f64, value / 2.0f64.sqrt()])
                .collect(),
        ),
        NamedSeries::new(format!("{name} FFT Ang"), "deg", &waveform.asset, "Ang").with_points(
            spectrum
                .phase
                .iter()
                .enumerate()
                .map(|(index, value)| [index as f64, value.to_degrees()])
                .collect(),
        ),
    ]
}

fn generate_harmonic_spectrum(
    system_frequency: f64,
    waveform: &Waveform,
    start_time: f64,
    cycles: usize,
) -> Vec<NamedSeries> {
    let spc = samples_per_cycle(waveform.sample_rate, system_frequency);
    let length = spc * cycles;

    let window: Vec<f64> = waveform
        .points
        .iter()
        .skip_while(|p| p.time < start_time)
        .take(length)
        .map(|p| p.value / spc as f64)
        .collect();

    if window.len() != length {
        return Vec::new();
    }

    let spectrum = Spectrum::transform(system_frequency * spc as f64, &window);
    let name = waveform.name();

    vec![
        NamedSeries::new(
            format!("{name} DFT Mag"),
            waveform.unit(),
            &waveform.asset,
            "Mag",
        )
        .with_points(
            spectrum
                .magnitude
                .iter()
                .zip(&spectrum.frequency)
                .map(|(value, freq)| [*freq, (value / cycles as f64) / 2.0f64.sqrt()])
                .collect(),
        ),
        NamedSeries::new(format!("{name} DFT Ang"), "deg", &waveform.asset, "Ang").with_points(
            spectrum
                .phase
                .iter()
                .zip(&spectrum.frequency)
                .map(|(value, freq)| [*freq, value.to_degrees()])
                .collect(),
        ),
    ]
}
