// src/main.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use faultscope::cache::AnalyticCache;
use faultscope::config::SystemSettings;
use faultscope::core::analysis::{
    clipping, derivative, drift, filtering, frequency, harmonics, impedance, overlap, power,
    rectifier, rvc, sequence,
};
use faultscope::core::types::NamedSeries;
use faultscope::loader::{load_event, EventRecord};

#[derive(Parser, Debug)]
#[command(name = "faultscope")]
#[command(about = "Run waveform analytics over a recorded disturbance event")]
struct Args {
    /// Event file (JSON) holding the waveforms and optional cycle phasors
    #[arg(short, long)]
    event: PathBuf,

    /// Analytics to run
    #[arg(short, long, value_enum, num_args = 1.., default_value = "thd")]
    analytics: Vec<Analytic>,

    /// Settings file; defaults apply when absent
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Harmonic order for the specified-harmonic analytic
    #[arg(long, default_value = "3")]
    harmonic: u32,

    /// Filter order for the low/high-pass analytics
    #[arg(long, default_value = "1")]
    order: usize,

    /// RC time constant in ms for rectifier smoothing (0 disables)
    #[arg(long, default_value = "0")]
    rc: f64,

    /// Window start time (epoch ms) for the FFT snapshot analytics
    #[arg(long, default_value = "0")]
    start_time: f64,

    /// Window length in cycles for the FFT snapshot analytics
    #[arg(long, default_value = "1")]
    cycles: usize,

    /// Nominal voltage for rapid voltage change, in volts
    #[arg(long, default_value = "7200")]
    nominal_voltage: f64,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Analytic {
    FirstDerivative,
    ClippedWaveforms,
    Frequency,
    Impedance,
    Power,
    RemoveCurrent,
    MissingVoltage,
    LowPass,
    HighPass,
    SymmetricalComponents,
    Unbalance,
    Rectifier,
    Thd,
    SpecifiedHarmonic,
    Fft,
    HarmonicSpectrum,
    RapidVoltageChange,
    Overlap,
}

impl Analytic {
    fn name(&self) -> &'static str {
        match self {
            Analytic::FirstDerivative => "first-derivative",
            Analytic::ClippedWaveforms => "clipped-waveforms",
            Analytic::Frequency => "frequency",
            Analytic::Impedance => "impedance",
            Analytic::Power => "power",
            Analytic::RemoveCurrent => "remove-current",
            Analytic::MissingVoltage => "missing-voltage",
            Analytic::LowPass => "low-pass",
            Analytic::HighPass => "high-pass",
            Analytic::SymmetricalComponents => "symmetrical-components",
            Analytic::Unbalance => "unbalance",
            Analytic::Rectifier => "rectifier",
            Analytic::Thd => "thd",
            Analytic::SpecifiedHarmonic => "specified-harmonic",
            Analytic::Fft => "fft",
            Analytic::HarmonicSpectrum => "harmonic-spectrum",
            Analytic::RapidVoltageChange => "rapid-voltage-change",
            Analytic::Overlap => "overlap",
        }
    }
}

#[derive(Serialize)]
struct OutputEnvelope {
    generated_at: DateTime<Utc>,
    system_frequency: f64,
    results: Vec<AnalyticResult>,
}

#[derive(Serialize)]
struct AnalyticResult {
    analytic: &'static str,
    series: Vec<NamedSeries>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let record = load_event(&args.event)
        .with_context(|| format!("loading event file {}", args.event.display()))?;
    let settings = SystemSettings::load_or_default(args.settings.as_deref());

    info!(
        "loaded {} channel(s), system frequency {} Hz",
        record.waveforms.waveforms.len(),
        settings.system_frequency
    );

    let mut cache: AnalyticCache<Vec<NamedSeries>> =
        AnalyticCache::new(Duration::from_secs(300));

    let mut results = Vec::new();
    for analytic in &args.analytics {
        let series = cache.get_or_insert_with(analytic.name(), || {
            run_analytic(*analytic, &record, &settings, &args)
        });
        info!("{}: {} series", analytic.name(), series.len());
        results.push(AnalyticResult {
            analytic: analytic.name(),
            series,
        });
    }

    let envelope = OutputEnvelope {
        generated_at: Utc::now(),
        system_frequency: settings.system_frequency,
        results,
    };

    let rendered = serde_json::to_string_pretty(&envelope)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn run_analytic(
    analytic: Analytic,
    record: &EventRecord,
    settings: &SystemSettings,
    args: &Args,
) -> Vec<NamedSeries> {
    let waveforms = &record.waveforms;
    let cycles = &record.cycles;
    let f0 = settings.system_frequency;

    match analytic {
        Analytic::FirstDerivative => derivative::first_derivative(waveforms, cycles),
        Analytic::ClippedWaveforms => clipping::clipped_waveforms(waveforms, f0),
        Analytic::Frequency => frequency::frequency(waveforms),
        Analytic::Impedance => impedance::impedance(cycles),
        Analytic::Power => power::power(cycles),
        Analytic::RemoveCurrent => drift::remove_current(waveforms, f0),
        Analytic::MissingVoltage => drift::missing_voltage(waveforms, f0),
        Analytic::LowPass => filtering::low_pass(waveforms, f0, args.order),
        Analytic::HighPass => filtering::high_pass(waveforms, f0, args.order),
        Analytic::SymmetricalComponents => sequence::symmetrical_components(cycles),
        Analytic::Unbalance => sequence::unbalance(cycles),
        Analytic::Rectifier => rectifier::rectifier(waveforms, f0, args.rc),
        Analytic::Thd => harmonics::thd(waveforms, f0),
        Analytic::SpecifiedHarmonic => {
            harmonics::specified_harmonic(waveforms, f0, args.harmonic)
        }
        Analytic::Fft => harmonics::fft_snapshot(waveforms, f0, args.start_time, args.cycles),
        Analytic::HarmonicSpectrum => {
            harmonics::harmonic_spectrum(waveforms, f0, args.start_time, args.cycles)
        }
        Analytic::RapidVoltageChange => {
            rvc::rapid_voltage_change(cycles, args.nominal_voltage)
        }
        Analytic::Overlap => overlap::overlapping_cycles(waveforms, f0),
    }
}
