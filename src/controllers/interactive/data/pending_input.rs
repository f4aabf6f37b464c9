/// A zoom step about a pivot in screen fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRequest {
    /// `+1` zooms in, `-1` zooms out.
    pub direction: i32,
    pub pivot_x: f64,
    pub pivot_y: f64,
}

/// Setting changes applied together before a full re-render. An empty change
/// is a plain refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsChange {
    /// Back to the engine defaults before anything else is applied.
    pub reset: bool,
    pub formula: Option<String>,
    pub max_iter: Option<u32>,
    pub size: Option<u32>,
}

/// The single piece of input a tick dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum NextInput {
    Settings(SettingsChange),
    Zoom(ZoomRequest),
    Move { dx: f64, dy: f64 },
}

/// Input recorded since the last dispatch.
///
/// Moves accumulate, the latest zoom replaces any earlier one, and settings
/// merge field by field with the latest value winning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingInput {
    move_dx: f64,
    move_dy: f64,
    zoom: Option<ZoomRequest>,
    settings: Option<SettingsChange>,
}

impl PendingInput {
    pub fn record_move(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.move_dx += dx;
            self.move_dy += dy;
        }
    }

    pub fn record_zoom(&mut self, direction: i32, pivot_x: f64, pivot_y: f64) {
        if direction == 0 || !pivot_x.is_finite() || !pivot_y.is_finite() {
            return;
        }

        self.zoom = Some(ZoomRequest {
            direction: direction.signum(),
            pivot_x,
            pivot_y,
        });
    }

    pub fn request_formula(&mut self, text: impl Into<String>) {
        self.settings_mut().formula = Some(text.into());
    }

    pub fn request_max_iter(&mut self, max_iter: u32) {
        self.settings_mut().max_iter = Some(max_iter);
    }

    pub fn request_size(&mut self, size: u32) {
        self.settings_mut().size = Some(size);
    }

    pub fn request_reset(&mut self) {
        // a reset supersedes every setting recorded before it
        self.settings = Some(SettingsChange {
            reset: true,
            ..SettingsChange::default()
        });
    }

    pub fn request_refresh(&mut self) {
        self.settings_mut();
    }

    /// Puts an undispatched move back in front of anything recorded since.
    pub fn restore_move(&mut self, dx: f64, dy: f64) {
        self.record_move(dx, dy);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_none() && self.zoom.is_none() && !self.has_move()
    }

    /// Takes the highest-priority input: settings, then zoom, then move.
    pub fn take_next(&mut self) -> Option<NextInput> {
        if let Some(settings) = self.settings.take() {
            return Some(NextInput::Settings(settings));
        }

        if let Some(zoom) = self.zoom.take() {
            return Some(NextInput::Zoom(zoom));
        }

        if self.has_move() {
            let (dx, dy) = (self.move_dx, self.move_dy);
            self.move_dx = 0.0;
            self.move_dy = 0.0;
            return Some(NextInput::Move { dx, dy });
        }

        None
    }

    fn has_move(&self) -> bool {
        self.move_dx != 0.0 || self.move_dy != 0.0
    }

    fn settings_mut(&mut self) -> &mut SettingsChange {
        self.settings.get_or_insert_with(SettingsChange::default)
    }
}
