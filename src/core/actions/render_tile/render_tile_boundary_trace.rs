use std::collections::VecDeque;

use bitvec::prelude::*;

use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::render_tile::errors::RenderTileError;
use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
use crate::core::actions::render_tile::render_tile_serial::render_tile_serial;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Evaluates the tile border, follows every value boundary inward, and fills
/// the remaining pixels of each row from the nearest evaluated pixel on the
/// left.
///
/// Exact whenever each uniform region touches the tile border or a traced
/// boundary; isolated islands strictly inside a uniform region are lost.
/// Tiles thinner than 3 pixels have no interior and are evaluated in full.
pub fn render_tile_boundary_trace<Alg, C>(
    rect: PixelRect,
    algorithm: &Alg,
    cancel: &C,
) -> Result<Vec<u16>, RenderTileError<Alg::Failure>>
where
    Alg: TileAlgorithm<Success = u16>,
    C: CancelToken,
{
    if rect.width() < 3 || rect.height() < 3 {
        return render_tile_serial(rect, algorithm, cancel);
    }

    let mut tracer = Tracer::new(rect, algorithm, cancel);
    tracer.trace_border()?;
    tracer.follow_boundaries()?;

    Ok(tracer.fill_rows())
}

struct Tracer<'a, Alg, C> {
    rect: PixelRect,
    algorithm: &'a Alg,
    cancel: &'a C,
    width: i64,
    height: i64,
    samples: Vec<u16>,
    evaluated: BitVec,
    queued: BitVec,
    boundaries: VecDeque<(i64, i64)>,
    evaluations: usize,
}

impl<'a, Alg, C> Tracer<'a, Alg, C>
where
    Alg: TileAlgorithm<Success = u16>,
    C: CancelToken,
{
    fn new(rect: PixelRect, algorithm: &'a Alg, cancel: &'a C) -> Self {
        let len = rect.size() as usize;

        Self {
            rect,
            algorithm,
            cancel,
            width: i64::from(rect.width()),
            height: i64::from(rect.height()),
            samples: vec![0; len],
            evaluated: bitvec![0; len],
            queued: bitvec![0; len],
            boundaries: VecDeque::new(),
            evaluations: 0,
        }
    }

    fn index(&self, x: i64, y: i64) -> usize {
        (y * self.width + x) as usize
    }

    fn evaluate(&mut self, x: i64, y: i64) -> Result<u16, RenderTileError<Alg::Failure>> {
        let idx = self.index(x, y);
        if self.evaluated[idx] {
            return Ok(self.samples[idx]);
        }

        if self.evaluations % CANCEL_CHECK_INTERVAL_PIXELS == 0 && self.cancel.is_cancelled() {
            return Err(RenderTileError::Cancelled(Cancelled));
        }
        self.evaluations += 1;

        let point = Point {
            x: self.rect.x() + x as u32,
            y: self.rect.y() + y as u32,
        };
        let value = self
            .algorithm
            .compute(point)
            .map_err(RenderTileError::Algorithm)?;

        self.samples[idx] = value;
        self.evaluated.set(idx, true);

        Ok(value)
    }

    fn enqueue(&mut self, x: i64, y: i64) {
        let idx = self.index(x, y);
        if !self.queued[idx] {
            self.queued.set(idx, true);
            self.boundaries.push_back((x, y));
        }
    }

    /// Walks the border clockwise from the top-left corner, queueing each
    /// pixel whose value differs from the one before it.
    fn trace_border(&mut self) -> Result<(), RenderTileError<Alg::Failure>> {
        let (w, h) = (self.width, self.height);

        let walk = (0..w)
            .map(|x| (x, 0))
            .chain((1..h).map(|y| (w - 1, y)))
            .chain((0..w - 1).rev().map(|x| (x, h - 1)))
            .chain((1..h - 1).rev().map(|y| (0, y)));

        let mut previous = self.evaluate(0, 0)?;
        for (x, y) in walk {
            let value = self.evaluate(x, y)?;
            if value != previous {
                self.enqueue(x, y);
            }
            previous = value;
        }

        Ok(())
    }

    fn follow_boundaries(&mut self) -> Result<(), RenderTileError<Alg::Failure>> {
        while let Some((x, y)) = self.boundaries.pop_back() {
            let value = self.samples[self.index(x, y)];

            for (dx, dy) in NEIGHBOURS {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= self.width || ny >= self.height {
                    continue;
                }

                if self.evaluate(nx, ny)? != value {
                    self.enqueue(nx, ny);
                }
            }
        }

        Ok(())
    }

    fn fill_rows(self) -> Vec<u16> {
        let mut samples = self.samples;
        let width = self.width as usize;

        for (row, row_samples) in samples.chunks_mut(width).enumerate() {
            let row_start = row * width;
            let mut fill = row_samples[0];

            for (x, sample) in row_samples.iter_mut().enumerate() {
                if self.evaluated[row_start + x] {
                    fill = *sample;
                } else {
                    *sample = fill;
                }
            }
        }

        samples
    }
}
