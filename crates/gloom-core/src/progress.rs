//! Generation progress reporting and cancellation
//!
//! A [`GenerationStatus`] is the shared handle a UI polls while a worker
//! thread builds the map. A [`Progress`] is the sink the pipeline itself
//! writes into, it forwards to an optional observer callback and to the
//! shared status when one is attached.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::errors::GenerateError;

/// Lifecycle of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenerationPhase {
    Running = 0,
    Complete = 1,
    Failed = 2,
    Cancelled = 3,
}

impl GenerationPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => GenerationPhase::Running,
            1 => GenerationPhase::Complete,
            2 => GenerationPhase::Failed,
            _ => GenerationPhase::Cancelled,
        }
    }
}

/// Shared, lock-free view of a generation run
///
/// Single writer (the generating thread), any number of readers.
#[derive(Debug)]
pub struct GenerationStatus {
    /// Overall completion as f32 bits
    fraction: AtomicU32,
    phase: AtomicU8,
    cancel: AtomicBool,
}

impl Default for GenerationStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationStatus {
    pub fn new() -> Self {
        Self {
            fraction: AtomicU32::new(0.0f32.to_bits()),
            phase: AtomicU8::new(GenerationPhase::Running as u8),
            cancel: AtomicBool::new(false),
        }
    }

    /// Overall completion in 0.0..=1.0
    pub fn fraction(&self) -> f32 {
        f32::from_bits(self.fraction.load(Ordering::Relaxed))
    }

    pub(crate) fn set_fraction(&self, fraction: f32) {
        let clamped = fraction.clamp(0.0, 1.0);
        self.fraction.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> GenerationPhase {
        GenerationPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub(crate) fn set_phase(&self, phase: GenerationPhase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    /// Ask the run to stop at its next checkpoint
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Has the run left the `Running` phase?
    pub fn is_finished(&self) -> bool {
        self.phase() != GenerationPhase::Running
    }
}

/// Progress sink threaded through the generation pipeline
pub struct Progress<'a> {
    observer: Option<Box<dyn FnMut(&str, f64) + 'a>>,
    status: Option<Arc<GenerationStatus>>,
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("has_observer", &self.observer.is_some())
            .field("status", &self.status)
            .finish()
    }
}

impl<'a> Progress<'a> {
    /// Sink that swallows everything
    pub fn none() -> Self {
        Self {
            observer: None,
            status: None,
        }
    }

    /// Sink that calls `observer` at every step boundary
    pub fn observe(observer: impl FnMut(&str, f64) + 'a) -> Self {
        Self {
            observer: Some(Box::new(observer)),
            status: None,
        }
    }

    /// Sink that writes into a shared status handle
    pub fn for_status(status: Arc<GenerationStatus>) -> Self {
        Self {
            observer: None,
            status: Some(status),
        }
    }

    /// Step boundary: log it, notify the observer, update the status
    pub(crate) fn report(&mut self, label: &str, fraction: f64) {
        log::debug!("{label} ({:.0}%)", fraction * 100.0);
        if let Some(observer) = &mut self.observer {
            observer(label, fraction);
        }
        if let Some(status) = &self.status {
            status.set_fraction(fraction as f32);
        }
    }

    /// Cheap intra-step update, status only
    pub(crate) fn advance(&mut self, fraction: f64) {
        if let Some(status) = &self.status {
            status.set_fraction(fraction as f32);
        }
    }

    /// Bail out with `GenerateError::Cancelled` when cancellation was requested
    pub(crate) fn interrupted(&self) -> Result<(), GenerateError> {
        match &self.status {
            Some(status) if status.is_cancelled() => Err(GenerateError::Cancelled),
            _ => Ok(()),
        }
    }
}
