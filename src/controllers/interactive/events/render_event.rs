use crate::controllers::interactive::data::frame_data::FrameData;
use crate::controllers::interactive::errors::render_error::RenderError;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Frame(FrameData),
    /// A rejected setting; the previous value stays in effect.
    Diagnostic(String),
    Error(RenderError),
}
