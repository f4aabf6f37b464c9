use crate::controllers::interactive::events::render_event::RenderEvent;

/// Where the coordinator reports merged frames, rejected settings and failed
/// jobs. Called from [`InputCoordinator::tick`](crate::InputCoordinator::tick),
/// so implementations should hand the event off rather than draw in place.
pub trait PresenterPort: Send + Sync {
    fn present(&self, event: RenderEvent);
}
