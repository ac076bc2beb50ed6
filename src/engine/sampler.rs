//! Location sampler contract and implementations.
//!
//! The engine never talks to GPS hardware directly. Anything that can
//! report "meters advanced since the last tick" implements
//! [`LocationSampler`]; a hardware-backed source writes into a
//! [`SamplerBuffer`] that the tick handler drains synchronously.

use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Supplies the cumulative distance advanced since the previous call.
///
/// Returned deltas are path length, never displacement: a sampler must not
/// report movement back toward the start as negative distance. Returning 0
/// when no motion is detected is normal.
pub trait LocationSampler {
    /// Distance in meters covered since the last call, `>= 0`.
    fn sample_delta_meters(&mut self) -> Result<f64, SamplerError>;
}

/// Errors from a location sampler.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The underlying source produced no usable delta
    #[error("Sampler unavailable: {0}")]
    Unavailable(String),
}

/// Shared buffer a hardware source writes position deltas into.
///
/// The writing side (an async BLE/GPS task) calls [`SamplerBuffer::push_delta`]
/// whenever a fix arrives; the tick handler drains the accumulated value
/// without blocking. Negative pushes are dropped at the door.
#[derive(Debug, Clone, Default)]
pub struct SamplerBuffer {
    pending_meters: Arc<Mutex<f64>>,
}

impl SamplerBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record meters advanced since the previous fix.
    pub fn push_delta(&self, meters: f64) {
        if meters < 0.0 {
            tracing::warn!("Dropping negative sampler delta: {meters}");
            return;
        }
        if let Ok(mut pending) = self.pending_meters.lock() {
            *pending += meters;
        }
    }

    fn take(&self) -> Result<f64, SamplerError> {
        let mut pending = self
            .pending_meters
            .lock()
            .map_err(|e| SamplerError::Unavailable(e.to_string()))?;
        Ok(std::mem::take(&mut *pending))
    }
}

/// Sampler backed by a [`SamplerBuffer`].
pub struct BufferedSampler {
    buffer: SamplerBuffer,
}

impl BufferedSampler {
    /// Create a sampler reading from the given buffer.
    pub fn new(buffer: SamplerBuffer) -> Self {
        Self { buffer }
    }
}

impl LocationSampler for BufferedSampler {
    fn sample_delta_meters(&mut self) -> Result<f64, SamplerError> {
        self.buffer.take()
    }
}

/// Sampler producing a fixed delta per tick, for demos and tests.
pub struct SimulatedSampler {
    meters_per_tick: f64,
}

impl SimulatedSampler {
    /// Create a sampler advancing a constant distance every tick.
    pub fn new(meters_per_tick: f64) -> Self {
        Self { meters_per_tick }
    }
}

impl LocationSampler for SimulatedSampler {
    fn sample_delta_meters(&mut self) -> Result<f64, SamplerError> {
        Ok(self.meters_per_tick)
    }
}
