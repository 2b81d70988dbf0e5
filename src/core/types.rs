//! Shared data model for the analytics engine
//!
//! Everything here is transient: waveforms and cycle phasors are loaded per
//! event, handed to the analytics read-only, and the resulting named series
//! are passed on to whatever consumes them (chart layer, exporter, tests).

use serde::{Deserialize, Serialize};

/// Physical quantity recorded on a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    Voltage,
    Current,
}

impl MeasurementKind {
    /// One-letter prefix used in channel names ("VAN", "IBN", ...)
    pub fn short_label(&self) -> &'static str {
        match self {
            MeasurementKind::Voltage => "V",
            MeasurementKind::Current => "I",
        }
    }

    /// Base unit of the quantity
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementKind::Voltage => "V",
            MeasurementKind::Current => "A",
        }
    }
}

/// Phase connection of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    AN,
    BN,
    CN,
    AB,
    BC,
    CA,
    RES,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::AN => "AN",
            Phase::BN => "BN",
            Phase::CN => "CN",
            Phase::AB => "AB",
            Phase::BC => "BC",
            Phase::CA => "CA",
            Phase::RES => "RES",
        }
    }

    /// Single-letter legend key ("A", "B", "C") for the line-to-neutral phases
    pub fn legend(&self) -> &'static str {
        match self {
            Phase::AN => "A",
            Phase::BN => "B",
            Phase::CN => "C",
            other => other.label(),
        }
    }

    /// The three line-to-neutral phases every per-phase analytic walks
    pub fn line_to_neutral() -> [Phase; 3] {
        [Phase::AN, Phase::BN, Phase::CN]
    }
}

/// One recorded sample: time in milliseconds since the Unix epoch, value in
/// the channel's physical unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: f64,
    pub value: f64,
}

/// A single channel of uniformly sampled data plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    pub measurement: MeasurementKind,
    pub phase: Phase,
    pub asset: String,
    /// Nominal sampling frequency in Hz
    pub sample_rate: f64,
    /// Samples in ascending time order
    pub points: Vec<DataPoint>,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw sample values, stripped of timestamps
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Channel name, e.g. "VAN" or "ICN"
    pub fn name(&self) -> String {
        format!("{}{}", self.measurement.short_label(), self.phase.label())
    }

    pub fn unit(&self) -> &'static str {
        self.measurement.unit()
    }
}

/// All channels recorded for one event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveformSet {
    pub waveforms: Vec<Waveform>,
}

impl WaveformSet {
    /// Instantaneous voltage channel for a phase, if recorded
    pub fn voltage(&self, phase: Phase) -> Option<&Waveform> {
        self.channel(MeasurementKind::Voltage, phase)
    }

    /// Instantaneous current channel for a phase, if recorded
    pub fn current(&self, phase: Phase) -> Option<&Waveform> {
        self.channel(MeasurementKind::Current, phase)
    }

    pub fn channel(&self, measurement: MeasurementKind, phase: Phase) -> Option<&Waveform> {
        self.waveforms
            .iter()
            .find(|w| w.measurement == measurement && w.phase == phase)
    }

    /// Line-to-neutral channels of one quantity, in A/B/C order, present only
    pub fn line_to_neutral(&self, measurement: MeasurementKind) -> Vec<&Waveform> {
        Phase::line_to_neutral()
            .iter()
            .filter_map(|&p| self.channel(measurement, p))
            .collect()
    }
}

/// Per-cycle RMS magnitude and phase angle series for one channel, produced
/// upstream by the cycle-phasor transform and consumed read-only here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSeries {
    /// (time, RMS magnitude) per cycle
    pub rms: Vec<DataPoint>,
    /// (time, phase angle in radians) per cycle, parallel to `rms`
    pub phase: Vec<DataPoint>,
}

impl CycleSeries {
    /// Complex phasor at cycle index `i`, if both series reach that far
    pub fn phasor(&self, i: usize) -> Option<num_complex::Complex64> {
        let rms = self.rms.get(i)?;
        let ang = self.phase.get(i)?;
        Some(num_complex::Complex64::from_polar(rms.value, ang.value))
    }

    /// Parallel iteration over (time, phasor) pairs
    pub fn phasors(&self) -> impl Iterator<Item = (f64, num_complex::Complex64)> + '_ {
        self.rms
            .iter()
            .zip(self.phase.iter())
            .map(|(m, a)| (m.time, num_complex::Complex64::from_polar(m.value, a.value)))
    }
}

/// Per-phase cycle phasor series for the V/I channels of one event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSet {
    pub va: Option<CycleSeries>,
    pub vb: Option<CycleSeries>,
    pub vc: Option<CycleSeries>,
    pub ia: Option<CycleSeries>,
    pub ib: Option<CycleSeries>,
    pub ic: Option<CycleSeries>,
}

impl CycleSet {
    pub fn voltage(&self, phase: Phase) -> Option<&CycleSeries> {
        match phase {
            Phase::AN => self.va.as_ref(),
            Phase::BN => self.vb.as_ref(),
            Phase::CN => self.vc.as_ref(),
            _ => None,
        }
    }

    pub fn current(&self, phase: Phase) -> Option<&CycleSeries> {
        match phase {
            Phase::AN => self.ia.as_ref(),
            Phase::BN => self.ib.as_ref(),
            Phase::CN => self.ic.as_ref(),
            _ => None,
        }
    }
}

/// Universal output shape of every analytic: a labeled, unit-tagged series
/// of (time, value) pairs. Consumers treat this structurally and must
/// tolerate non-finite values (NaN separators, divide-by-zero artifacts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedSeries {
    /// Chart label, e.g. "VAN Low Pass Filter"
    pub label: String,
    /// Physical unit of the values, e.g. "Ohm", "%", "Hz"
    pub unit: String,
    /// Display grouping key (asset name or quantity group)
    pub group: String,
    /// Secondary legend key ("A"/"B"/"C", "V"/"I", "Pre"/"Post", ...)
    pub legend: String,
    pub points: Vec<[f64; 2]>,
}

impl NamedSeries {
    pub fn new(
        label: impl Into<String>,
        unit: impl Into<String>,
        group: impl Into<String>,
        legend: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            group: group.into(),
            legend: legend.into(),
            points: Vec::new(),
        }
    }

    pub fn with_points(mut self, points: Vec<[f64; 2]>) -> Self {
        self.points = points;
        self
    }
}
