use crate::core::actions::cancellation::ShutdownToken;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::tile::Tile;
use crate::core::engine::errors::EngineError;

/// The command set the interactive layer drives. Every mutation is
/// all-or-nothing: on `Err` the backend state is unchanged.
pub trait ComputeBackend: Send {
    /// Resets the view, formula, iteration budget and size to the defaults.
    fn initialize(&mut self) -> Result<(), EngineError>;

    fn default_formula(&self) -> String;
    fn default_size(&self) -> u32;
    fn default_max_iter(&self) -> u16;

    fn size(&self) -> u32;
    fn center_str(&self) -> String;
    fn scale_str(&self) -> String;

    fn set_formula(&mut self, text: &str) -> Result<(), EngineError>;
    fn set_max_iter(&mut self, max_iter: u32) -> Result<(), EngineError>;
    fn set_size(&mut self, size: u32) -> Result<(), EngineError>;

    /// Content drag by `(dx, dy)` screen fractions.
    fn move_view(&mut self, dx: f64, dy: f64) -> Result<(), EngineError>;
    /// Zoom by `level` steps about a screen-fraction pivot.
    fn zoom_view(&mut self, level: i32, pivot_x: f64, pivot_y: f64) -> Result<(), EngineError>;

    fn render_tile(&self, rect: PixelRect, cancel: &ShutdownToken) -> Result<Tile, EngineError>;
}
