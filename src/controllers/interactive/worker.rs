use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, warn};

use crate::controllers::interactive::data::job::{Command, Job, JobOutput, JobResult, TileRequest};
use crate::controllers::interactive::data::pending_input::SettingsChange;
use crate::core::actions::cancellation::{CancelToken, ShutdownToken};
use crate::core::data::pixel_rect::PixelRect;
use crate::core::engine::{ComputeBackend, EngineError};

struct SharedState {
    generation: AtomicU64,
    pending_job: Mutex<Option<Job>>,
    completed: Mutex<Option<JobResult>>,
    wake: Condvar,
    shutdown: ShutdownToken,
}

/// Runs backend jobs one at a time on a dedicated thread.
///
/// Submission never waits for the backend; results are collected with
/// [`BackendWorker::try_take_result`].
pub struct BackendWorker {
    shared: Arc<SharedState>,
    worker: Option<JoinHandle<()>>,
}

impl BackendWorker {
    pub fn spawn(backend: Box<dyn ComputeBackend>) -> Self {
        let shared = Arc::new(SharedState {
            generation: AtomicU64::new(0),
            pending_job: Mutex::new(None),
            completed: Mutex::new(None),
            wake: Condvar::new(),
            shutdown: ShutdownToken::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || {
            Self::worker_loop(&worker_shared, backend);
        });

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Hands a job to the worker and returns its generation.
    pub fn submit(&self, command: Command, tiles: TileRequest) -> Result<u64, EngineError> {
        if !self.is_alive() {
            return Err(EngineError::BackendUnavailable);
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        *lock(&self.shared.pending_job) = Some(Job {
            generation,
            command,
            tiles,
        });
        self.shared.wake.notify_one();

        Ok(generation)
    }

    pub fn try_take_result(&self) -> Option<JobResult> {
        lock(&self.shared.completed).take()
    }

    /// False once the worker thread has exited, whether by shutdown or panic.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.shared.shutdown.is_cancelled()
            && self.worker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn shutdown(&mut self) {
        {
            // Raised under the job lock so the worker cannot miss the wakeup
            // between its flag check and its wait.
            let _guard = lock(&self.shared.pending_job);
            self.shared.shutdown.raise();
            self.shared.wake.notify_one();
        }

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("backend worker panicked");
            }
        }
    }

    fn worker_loop(shared: &Arc<SharedState>, mut backend: Box<dyn ComputeBackend>) {
        loop {
            let job = {
                let mut guard = lock(&shared.pending_job);
                loop {
                    if shared.shutdown.is_cancelled() {
                        return;
                    }

                    if let Some(job) = guard.take() {
                        break job;
                    }

                    guard = shared
                        .wake
                        .wait(guard)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            let generation = job.generation;
            let outcome = run_job(backend.as_mut(), job, &shared.shutdown);

            if let Err(err) = &outcome {
                warn!(generation, error = %err, "backend job failed");
            }

            *lock(&shared.completed) = Some(JobResult {
                generation,
                outcome,
            });
        }
    }
}

impl Drop for BackendWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_job(
    backend: &mut dyn ComputeBackend,
    job: Job,
    cancel: &ShutdownToken,
) -> Result<JobOutput, EngineError> {
    let start = Instant::now();
    let mut diagnostics = Vec::new();

    match job.command {
        Command::Settings(change) => apply_settings(backend, change, &mut diagnostics)?,
        Command::Zoom { request, carry } => {
            if carry != (0.0, 0.0) {
                backend.move_view(carry.0, carry.1)?;
            }
            backend.zoom_view(request.direction, request.pivot_x, request.pivot_y)?;
        }
        Command::Move { dx, dy } => backend.move_view(dx, dy)?,
    }

    let size = backend.size();
    let rects = match job.tiles {
        TileRequest::FullRaster => {
            vec![PixelRect::square(size).map_err(|_| EngineError::BackendUnavailable)?]
        }
        TileRequest::Rects(rects) => rects,
    };

    let tiles = rects
        .into_iter()
        .map(|rect| backend.render_tile(rect, cancel))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        generation = job.generation,
        tiles = tiles.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "backend job complete"
    );

    Ok(JobOutput {
        size,
        tiles,
        center: backend.center_str(),
        scale: backend.scale_str(),
        diagnostics,
        render_duration: start.elapsed(),
    })
}

/// Applies each setting on its own. Formula and range failures become
/// diagnostics; anything else fails the job.
fn apply_settings(
    backend: &mut dyn ComputeBackend,
    change: SettingsChange,
    diagnostics: &mut Vec<String>,
) -> Result<(), EngineError> {
    if change.reset {
        backend.initialize()?;
    }

    let mut recover = |result: Result<(), EngineError>| match result {
        Ok(()) => Ok(()),
        Err(err @ (EngineError::Formula(_) | EngineError::Range(_))) => {
            diagnostics.push(err.to_string());
            Ok(())
        }
        Err(err) => Err(err),
    };

    if let Some(formula) = change.formula {
        recover(backend.set_formula(&formula))?;
    }
    if let Some(max_iter) = change.max_iter {
        recover(backend.set_max_iter(max_iter))?;
    }
    if let Some(size) = change.size {
        recover(backend.set_size(size))?;
    }

    Ok(())
}
