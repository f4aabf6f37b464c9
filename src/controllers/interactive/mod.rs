//! Interactive exploration: input coalescing, the backend worker thread, and
//! the tile cache that presentation reads from.
//!
//! The coordinator follows the ports & adapters pattern:
//! - **Input**: `record_*` / `request_*` calls, recorded without blocking
//! - **Output**: [`PresenterPort`] receives frame, diagnostic and error events
//! - **Backend**: any [`ComputeBackend`](crate::core::engine::ComputeBackend), run on its own thread

mod coordinator;
pub mod data;
pub mod errors;
pub mod events;
pub mod ports;
mod worker;

pub use coordinator::{InputCoordinator, TickOutcome};
pub use events::render_event::RenderEvent;
pub use ports::presenter_port::PresenterPort;
pub use worker::BackendWorker;
