//! Background generation worker
//!
//! Runs the pipeline on a plain OS thread and publishes progress through a
//! shared [`GenerationStatus`]. The finished grid crosses back exactly
//! once, on join, so there is never more than one writer.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::CaveConfig;
use crate::errors::GenerateError;
use crate::generation::generate;
use crate::grid::Grid;
use crate::item::ItemCatalog;
use crate::progress::{GenerationPhase, GenerationStatus, Progress};

/// Handle to a generation run on a background thread
#[derive(Debug)]
pub struct GenerationHandle {
    status: Arc<GenerationStatus>,
    join: JoinHandle<Result<Grid, GenerateError>>,
}

/// Start generating on a background thread
pub fn spawn_generation(
    config: CaveConfig,
    seed: Option<u64>,
    catalog: ItemCatalog,
) -> GenerationHandle {
    let status = Arc::new(GenerationStatus::new());
    let thread_status = Arc::clone(&status);

    let join = thread::spawn(move || {
        // A panic below must still flip the status, or pollers would sit
        // on a loading screen forever.
        let guard = scopeguard::guard(Arc::clone(&thread_status), |status| {
            if !status.is_finished() {
                status.set_phase(GenerationPhase::Failed);
            }
        });

        let mut progress = Progress::for_status(Arc::clone(&thread_status));
        let result = generate(&config, seed, &catalog, &mut progress);

        match &result {
            Ok(_) => thread_status.set_phase(GenerationPhase::Complete),
            Err(GenerateError::Cancelled) => {
                thread_status.set_phase(GenerationPhase::Cancelled);
            }
            Err(err) => {
                log::warn!("generation failed: {err}");
                thread_status.set_phase(GenerationPhase::Failed);
            }
        }
        drop(guard);
        result
    });

    GenerationHandle { status, join }
}

impl GenerationHandle {
    /// Shared status handle for polling
    pub fn status(&self) -> Arc<GenerationStatus> {
        Arc::clone(&self.status)
    }

    /// Ask the run to stop at its next checkpoint
    pub fn request_cancel(&self) {
        self.status.request_cancel();
    }

    /// Has the worker thread exited?
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run and take the result
    ///
    /// A panicked worker comes back as [`GenerateError::Worker`], with the
    /// status already flipped to `Failed` so pollers were not stranded.
    pub fn finish(self) -> Result<Grid, GenerateError> {
        match self.join.join() {
            Ok(result) => result,
            Err(_) => Err(GenerateError::Worker(
                "generation thread panicked".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_completes() {
        let config = CaveConfig::sized(40, 40);
        let handle = spawn_generation(config, Some(42), ItemCatalog::builtin());
        let status = handle.status();

        let grid = handle.finish().unwrap();
        assert_eq!(grid.width(), 40);
        assert!(grid.count_walkable() > 0);
        assert_eq!(status.phase(), GenerationPhase::Complete);
        assert_eq!(status.fraction(), 1.0);
    }

    #[test]
    fn test_worker_matches_foreground_run() {
        let config = CaveConfig::sized(40, 40);
        let handle = spawn_generation(config.clone(), Some(7), ItemCatalog::builtin());
        let background = handle.finish().unwrap();

        let foreground = generate(
            &config,
            Some(7),
            &ItemCatalog::builtin(),
            &mut Progress::none(),
        )
        .unwrap();

        for (a, b) in background.tiles().zip(foreground.tiles()) {
            assert_eq!(a.kind, b.kind);
        }
    }

    #[test]
    fn test_worker_cancellation() {
        // Big enough that the run is still inside the pipeline when the
        // cancel lands.
        let config = CaveConfig::sized(400, 400);
        let handle = spawn_generation(config, Some(1), ItemCatalog::builtin());
        handle.request_cancel();
        let status = handle.status();

        let err = handle.finish().unwrap_err();
        assert_eq!(err, GenerateError::Cancelled);
        assert_eq!(status.phase(), GenerationPhase::Cancelled);
    }

    #[test]
    fn test_worker_rejects_bad_config() {
        let mut config = CaveConfig::sized(40, 40);
        config.item_density = 0;
        let handle = spawn_generation(config, Some(1), ItemCatalog::builtin());
        let status = handle.status();

        let err = handle.finish().unwrap_err();
        assert!(matches!(err, GenerateError::InvalidConfig(_)));
        assert_eq!(status.phase(), GenerationPhase::Failed);
    }
}
