//! Core analytics engine: data model, DSP primitives, analytic lookups

pub mod analysis;
pub mod dsp;
pub mod types;

pub use dsp::{Filter, SineWave, Spectrum};
pub use types::{
    CycleSeries, CycleSet, DataPoint, MeasurementKind, NamedSeries, Phase, Waveform,
    WaveformSet,
};
