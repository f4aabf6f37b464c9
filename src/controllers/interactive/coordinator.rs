use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::controllers::interactive::data::frame_data::FrameData;
use crate::controllers::interactive::data::job::{Command, JobOutput, JobResult, TileRequest};
use crate::controllers::interactive::data::pending_input::{NextInput, PendingInput};
use crate::controllers::interactive::errors::coordinator_error::CoordinatorError;
use crate::controllers::interactive::errors::render_error::RenderError;
use crate::controllers::interactive::events::render_event::RenderEvent;
use crate::controllers::interactive::ports::presenter_port::PresenterPort;
use crate::controllers::interactive::worker::BackendWorker;
use crate::core::data::raster::Raster;
use crate::core::engine::{ComputeBackend, EngineError};
use crate::core::tiles::{FillPlan, TileCache, TileCacheError};

/// What one [`InputCoordinator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A job was handed to the backend.
    Dispatched { generation: u64 },
    /// A move smaller than a pixel was folded into the cache remainder.
    Absorbed,
    /// A job is still in flight; input stays queued.
    Busy,
    /// Nothing pending.
    Idle,
    /// Dispatch was impossible; the raster is unchanged.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlightKind {
    /// Settings or zoom: the whole raster comes back in one tile.
    Full,
    /// A pan whose shift is already applied to the cache.
    Shift,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: u64,
    kind: FlightKind,
}

/// Turns bursts of pointer and wheel input into at most one backend job at a
/// time, and keeps the tile cache in step with what the backend rendered.
///
/// Recording input never blocks. [`tick`](Self::tick) is meant to be called
/// once per display frame.
pub struct InputCoordinator {
    worker: BackendWorker,
    cache: TileCache,
    pending: PendingInput,
    in_flight: Option<InFlight>,
    /// A dispatched job failed after the backend may have applied its
    /// command, so the raster no longer matches the backend view.
    out_of_sync: bool,
    presenter_port: Arc<dyn PresenterPort>,
    center: String,
    scale: String,
}

impl InputCoordinator {
    /// Takes ownership of the backend and dispatches the first full render.
    pub fn new(
        backend: Box<dyn ComputeBackend>,
        presenter_port: Arc<dyn PresenterPort>,
    ) -> Result<Self, CoordinatorError> {
        let cache = TileCache::new(backend.size())?;
        let center = backend.center_str();
        let scale = backend.scale_str();

        let mut coordinator = Self {
            worker: BackendWorker::spawn(backend),
            cache,
            pending: PendingInput::default(),
            in_flight: None,
            out_of_sync: false,
            presenter_port,
            center,
            scale,
        };

        coordinator.pending.request_refresh();
        coordinator.tick();

        Ok(coordinator)
    }

    pub fn record_move(&mut self, dx: f64, dy: f64) {
        self.pending.record_move(dx, dy);
    }

    pub fn record_zoom(&mut self, direction: i32, pivot_x: f64, pivot_y: f64) {
        self.pending.record_zoom(direction, pivot_x, pivot_y);
    }

    pub fn request_formula(&mut self, text: impl Into<String>) {
        self.pending.request_formula(text);
    }

    pub fn request_max_iter(&mut self, max_iter: u32) {
        self.pending.request_max_iter(max_iter);
    }

    pub fn request_size(&mut self, size: u32) {
        self.pending.request_size(size);
    }

    pub fn request_reset(&mut self) {
        self.pending.request_reset();
    }

    #[must_use]
    pub fn raster(&self) -> &Raster {
        self.cache.raster()
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.cache.size()
    }

    #[must_use]
    pub fn center_str(&self) -> &str {
        &self.center
    }

    #[must_use]
    pub fn scale_str(&self) -> &str {
        &self.scale
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Collects a finished job, then dispatches the next input if the backend
    /// is free. Never waits on the backend.
    pub fn tick(&mut self) -> TickOutcome {
        if let Some(flight) = self.in_flight {
            match self.worker.try_take_result() {
                Some(result) => self.complete(flight, result),
                None if !self.worker.is_alive() => {
                    self.fail(flight, &EngineError::BackendUnavailable);
                }
                None => return TickOutcome::Busy,
            }
        }

        self.dispatch_next()
    }

    pub fn shutdown(&mut self) {
        self.worker.shutdown();
    }

    fn dispatch_next(&mut self) -> TickOutcome {
        if self.out_of_sync && !self.pending.is_empty() {
            // a full render goes out first so later shifts start from the
            // backend's actual view
            self.out_of_sync = false;
            self.pending.request_refresh();
        }

        let Some(input) = self.pending.take_next() else {
            return TickOutcome::Idle;
        };

        match input {
            NextInput::Settings(change) => {
                self.submit(Command::Settings(change), TileRequest::FullRaster, FlightKind::Full)
            }
            NextInput::Zoom(request) => {
                let carry = self.cache.take_remainder();
                self.submit(
                    Command::Zoom { request, carry },
                    TileRequest::FullRaster,
                    FlightKind::Full,
                )
            }
            NextInput::Move { dx, dy } => self.dispatch_move(dx, dy),
        }
    }

    fn dispatch_move(&mut self, dx: f64, dy: f64) -> TickOutcome {
        let plan = match self.cache.begin_move(dx, dy) {
            Ok(plan) => plan,
            Err(TileCacheError::SequenceInFlight) => {
                self.pending.restore_move(dx, dy);
                return TickOutcome::Busy;
            }
            Err(err) => {
                warn!(error = %err, "move rejected by tile cache");
                self.presenter_port.present(RenderEvent::Error(RenderError {
                    generation: 0,
                    message: err.to_string(),
                }));
                return TickOutcome::Failed;
            }
        };

        if plan.fill == FillPlan::Nothing {
            return TickOutcome::Absorbed;
        }

        let n = f64::from(self.cache.size());
        let command = Command::Move {
            dx: plan.dx as f64 / n,
            dy: plan.dy as f64 / n,
        };

        self.submit(command, TileRequest::Rects(plan.fill.rects()), FlightKind::Shift)
    }

    fn submit(&mut self, command: Command, tiles: TileRequest, kind: FlightKind) -> TickOutcome {
        debug!(?command, "dispatching backend job");

        match self.worker.submit(command, tiles) {
            Ok(generation) => {
                self.in_flight = Some(InFlight { generation, kind });
                TickOutcome::Dispatched { generation }
            }
            Err(err) => {
                self.fail(InFlight { generation: 0, kind }, &err);
                TickOutcome::Failed
            }
        }
    }

    fn complete(&mut self, flight: InFlight, result: JobResult) {
        if result.generation != flight.generation {
            let mismatch = format!(
                "expected result for generation {}, received {}",
                flight.generation, result.generation
            );
            self.fail(flight, &mismatch);
            return;
        }

        match result.outcome {
            Ok(output) => {
                if let Err(err) = self.merge(flight, &output) {
                    self.fail(flight, &err);
                    return;
                }

                self.in_flight = None;
                self.center = output.center;
                self.scale = output.scale;

                for diagnostic in output.diagnostics {
                    self.presenter_port.present(RenderEvent::Diagnostic(diagnostic));
                }

                self.presenter_port.present(RenderEvent::Frame(FrameData {
                    generation: flight.generation,
                    size: output.size,
                    center: self.center.clone(),
                    scale: self.scale.clone(),
                    tiles_merged: output.tiles.len(),
                    render_duration: output.render_duration,
                }));
            }
            Err(err) => self.fail(flight, &err),
        }
    }

    fn merge(&mut self, flight: InFlight, output: &JobOutput) -> Result<(), TileCacheError> {
        if flight.kind == FlightKind::Full {
            if output.size == self.cache.size() {
                self.cache.begin_full()?;
            } else {
                info!(from = self.cache.size(), to = output.size, "resizing raster");
                self.cache.resize(output.size)?;
            }
        }

        for tile in &output.tiles {
            if let Err(err) = self.cache.merge(tile) {
                self.cache.abort();
                return Err(err);
            }
        }

        Ok(())
    }

    /// Ends the current flight without touching the displayed raster.
    fn fail(&mut self, flight: InFlight, err: &dyn std::fmt::Display) {
        warn!(generation = flight.generation, error = %err, "backend job failed");

        self.cache.abort();
        self.in_flight = None;
        // generation 0 never reached the worker
        if flight.generation != 0 {
            self.out_of_sync = true;
        }

        self.presenter_port.present(RenderEvent::Error(RenderError {
            generation: flight.generation,
            message: err.to_string(),
        }));
    }
}

impl Drop for InputCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
