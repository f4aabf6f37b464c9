use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
use crate::core::data::raster::{Raster, Sample};
use crate::core::data::tile::Tile;
use crate::core::tiles::errors::TileCacheError;

/// Value written into exposed strips until their tiles arrive.
pub const BLANK_SAMPLE: Sample = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Idle,
    Filling,
}

/// Rectangles the backend must render to complete a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillPlan {
    /// Nothing moved by a whole pixel; no backend work needed.
    Nothing,
    Full(PixelRect),
    /// Exposed strips after a shift, at most one per moved axis.
    Strips(Vec<PixelRect>),
}

impl FillPlan {
    #[must_use]
    pub fn rects(&self) -> Vec<PixelRect> {
        match self {
            FillPlan::Nothing => Vec::new(),
            FillPlan::Full(rect) => vec![*rect],
            FillPlan::Strips(rects) => rects.clone(),
        }
    }
}

/// Result of starting a pan: the whole-pixel shift applied to the raster and
/// the tiles needed to complete it. The view must move by exactly
/// `(dx, dy) / size` screen fractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub dx: i64,
    pub dy: i64,
    pub fill: FillPlan,
}

/// Double-buffered raster that follows pans by shifting pixels it already has
/// and requesting only the strips that scrolled into view.
#[derive(Debug)]
pub struct TileCache {
    size: u32,
    buffers: [Raster; 2],
    front: usize,
    remainder: (f64, f64),
    outstanding: Vec<PixelRect>,
    shifted: bool,
}

impl TileCache {
    pub fn new(size: u32) -> Result<Self, TileCacheError> {
        if size == 0 {
            return Err(TileCacheError::InvalidSize { size });
        }

        Ok(Self {
            size,
            buffers: [Raster::new(size, size), Raster::new(size, size)],
            front: 0,
            remainder: (0.0, 0.0),
            outstanding: Vec::new(),
            shifted: false,
        })
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The raster presentation reads.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.buffers[self.front]
    }

    #[must_use]
    pub fn state(&self) -> CacheState {
        if self.outstanding.is_empty() {
            CacheState::Idle
        } else {
            CacheState::Filling
        }
    }

    #[must_use]
    pub fn outstanding(&self) -> &[PixelRect] {
        &self.outstanding
    }

    /// Sub-pixel pan carried into the next move, in pixels.
    #[must_use]
    pub fn remainder(&self) -> (f64, f64) {
        self.remainder
    }

    /// Hands the sub-pixel pan over to a caller that applies it some other
    /// way, such as alongside a zoom, as screen fractions.
    pub fn take_remainder(&mut self) -> (f64, f64) {
        let n = f64::from(self.size);
        let (px, py) = std::mem::take(&mut self.remainder);

        (px / n, py / n)
    }

    /// Starts a sequence that re-renders the whole raster.
    pub fn begin_full(&mut self) -> Result<FillPlan, TileCacheError> {
        self.ensure_idle()?;

        let full = self.full_rect()?;
        self.outstanding = vec![full];
        self.shifted = false;

        Ok(FillPlan::Full(full))
    }

    /// Starts a pan by `(dx, dy)` screen fractions (content drag, x right,
    /// y down). Whole pixels are applied now; the fractional part is kept.
    pub fn begin_move(&mut self, dx: f64, dy: f64) -> Result<MovePlan, TileCacheError> {
        self.ensure_idle()?;

        let n = f64::from(self.size);
        let total_x = dx * n + self.remainder.0;
        let total_y = dy * n + self.remainder.1;
        let (px, py) = (total_x.trunc(), total_y.trunc());
        self.remainder = (total_x - px, total_y - py);

        let (px, py) = (px as i64, py as i64);
        let size = i64::from(self.size);

        let fill = if px == 0 && py == 0 {
            FillPlan::Nothing
        } else if px.abs() >= size || py.abs() >= size {
            let full = self.full_rect()?;
            self.outstanding = vec![full];
            self.shifted = false;
            FillPlan::Full(full)
        } else {
            let back = 1 - self.front;
            let (front_buf, back_buf) = split_pair(&mut self.buffers, self.front, back);
            front_buf.shift_into(back_buf, px, py, BLANK_SAMPLE);
            self.front = back;

            let strips = exposed_strips(self.size, px, py)?;
            self.outstanding = strips.clone();
            self.shifted = true;
            FillPlan::Strips(strips)
        };

        tracing::debug!(dx = px, dy = py, rects = fill.rects().len(), "tile cache move");

        Ok(MovePlan { dx: px, dy: py, fill })
    }

    /// Writes a returned tile into the raster. The tile must match an
    /// outstanding rectangle exactly.
    pub fn merge(&mut self, tile: &Tile) -> Result<(), TileCacheError> {
        let rect = tile.rect();
        let Some(position) = self.outstanding.iter().position(|r| *r == rect) else {
            return Err(TileCacheError::UnexpectedTile { rect });
        };

        self.buffers[self.front].blit(tile)?;
        self.outstanding.swap_remove(position);

        if self.outstanding.is_empty() {
            self.shifted = false;
        }

        Ok(())
    }

    /// Abandons the current sequence. A pending shift is undone so the
    /// previous raster is shown again.
    pub fn abort(&mut self) {
        if std::mem::take(&mut self.shifted) {
            self.front = 1 - self.front;
        }

        self.outstanding.clear();
    }

    /// Reallocates both buffers at `size`, seeding the new raster with a
    /// nearest-neighbour resample of the old one, and starts a full render.
    pub fn resize(&mut self, size: u32) -> Result<FillPlan, TileCacheError> {
        self.ensure_idle()?;
        if size == 0 {
            return Err(TileCacheError::InvalidSize { size });
        }

        let old = &self.buffers[self.front];
        let old_size = i64::from(self.size);
        let new_size = i64::from(size);

        let mut samples = Vec::with_capacity(size as usize * size as usize);
        for y in 0..new_size {
            for x in 0..new_size {
                samples.push(old.sample(x * old_size / new_size, y * old_size / new_size));
            }
        }

        let seeded = Raster::from_samples(size, size, samples)?;
        self.buffers = [seeded, Raster::new(size, size)];
        self.front = 0;
        // same screen fraction, counted in the new pixels
        let ratio = f64::from(size) / f64::from(self.size);
        self.remainder = (self.remainder.0 * ratio, self.remainder.1 * ratio);
        self.size = size;
        self.shifted = false;

        self.begin_full()
    }

    fn ensure_idle(&self) -> Result<(), TileCacheError> {
        match self.state() {
            CacheState::Idle => Ok(()),
            CacheState::Filling => Err(TileCacheError::SequenceInFlight),
        }
    }

    fn full_rect(&self) -> Result<PixelRect, TileCacheError> {
        PixelRect::square(self.size).map_err(|_| TileCacheError::InvalidSize { size: self.size })
    }
}

fn split_pair(buffers: &mut [Raster; 2], front: usize, back: usize) -> (&Raster, &mut Raster) {
    let [first, second] = buffers;
    if front < back {
        (&*first, second)
    } else {
        (&*second, first)
    }
}

/// Strips uncovered by shifting an `n`x`n` raster by `(dx, dy)`, with
/// `0 < |dx|, |dy| < n` on each moved axis.
///
/// The column strip spans the full height; the row strip skips the columns
/// the column strip already covers.
fn exposed_strips(n: u32, dx: i64, dy: i64) -> Result<Vec<PixelRect>, TileCacheError> {
    let size = i64::from(n);
    let mut strips = Vec::with_capacity(2);

    let invalid = |_: PixelRectError| TileCacheError::InvalidSize { size: n };

    if dx != 0 {
        let columns = if dx > 0 { 0..dx } else { size + dx..size };
        let strip = PixelRect::new(columns.start as u32, 0, (columns.end - columns.start) as u32, n)
            .map_err(invalid)?;
        strips.push(strip);
    }

    if dy != 0 {
        let rows = if dy > 0 { 0..dy } else { size + dy..size };
        let (x, width) = match dx {
            0 => (0, size),
            d if d > 0 => (d, size - d),
            d => (0, size + d),
        };

        let strip = PixelRect::new(
            x as u32,
            rows.start as u32,
            width as u32,
            (rows.end - rows.start) as u32,
        )
        .map_err(invalid)?;
        strips.push(strip);
    }

    Ok(strips)
}
