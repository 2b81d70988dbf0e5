//! Event-file decoding
//!
//! The engine is agnostic to how waveforms are located and stored; this
//! loader covers the one format the CLI speaks, a JSON document holding the
//! instantaneous channels and (optionally) the upstream cycle-phasor series
//! for one event.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{CycleSet, WaveformSet};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read event file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse event file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event file contains no waveforms")]
    Empty,
}

/// One event's worth of input data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub waveforms: WaveformSet,
    /// Pre-computed cycle phasors, when the producer supplied them
    #[serde(default)]
    pub cycles: CycleSet,
}

/// Parse an event record from JSON text.
///
/// Waveform samples are re-sorted into ascending time order; everything
/// downstream assumes that invariant.
pub fn parse_event(raw: &str) -> Result<EventRecord, LoaderError> {
    let mut record: EventRecord = serde_json::from_str(raw)?;

    if record.waveforms.waveforms.is_empty() {
        return Err(LoaderError::Empty);
    }

    for waveform in &mut record.waveforms.waveforms {
        waveform
            .points
            .sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    Ok(record)
}

/// Load an event record from a file on disk.
pub fn load_event(path: &Path) -> Result<EventRecord, LoaderError> {
    let raw = std::fs::read_to_string(path)?;
    parse_event(&raw)
}
