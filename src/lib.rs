//! FaultScope - waveform analytics for power-system disturbance records
//!
//! A library of numerical transforms over uniformly sampled three-phase
//! voltage/current channels, the kind a fault recorder captures around a
//! disturbance. The chart layer, storage, and query plumbing live
//! elsewhere; everything here takes plain waveform data in and hands named
//! series back.
//!
//! ## What it computes
//!
//! - **Spectra**: single-sided DFT magnitude/phase/frequency per window
//! - **Filtering**: Butterworth low/high-pass synthesis, bilinear
//!   discretization, forward and zero-phase recursive application
//! - **Harmonics**: sliding-window THD, specific-harmonic extraction,
//!   fixed-window FFT and harmonic-spectrum snapshots
//! - **Phasor analytics**: symmetrical components, unbalance, impedance,
//!   per-phase and total power
//! - **Waveform repair**: clipping detection with sine-fit reconstruction,
//!   pre/post-fault reference removal
//! - **Tracking**: zero-crossing frequency, first derivative, rectified
//!   envelope, rapid voltage change, per-cycle overlay
//!
//! ## Module structure
//!
//! - `core` - the engine: data model, DSP primitives, analytic lookups
//! - `config` - system frequency / MVA base settings
//! - `loader` - JSON event-file decode
//! - `cache` - caller-side memoization of analytic results
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use faultscope::core::analysis::harmonics;
//! use faultscope::SystemSettings;
//!
//! let record = faultscope::loader::load_event(path)?;
//! let settings = SystemSettings::default();
//!
//! let thd = harmonics::thd(&record.waveforms, settings.system_frequency);
//! for series in &thd {
//!     println!("{}: {} points", series.label, series.points.len());
//! }
//! ```
//!
//! Missing channels are skipped silently, empty inputs yield empty
//! outputs, and division artifacts propagate as non-finite values; see the
//! individual modules for the exact contracts.

pub mod cache;
pub mod config;
pub mod core;
pub mod loader;

pub use cache::AnalyticCache;
pub use config::SystemSettings;
pub use core::{
    CycleSeries, CycleSet, DataPoint, Filter, MeasurementKind, NamedSeries, Phase, SineWave,
    Spectrum, Waveform, WaveformSet,
};
pub use loader::{load_event, EventRecord, LoaderError};
