use std::{iter::FusedIterator, num::NonZeroU32};

use itertools::Itertools as _;

use crate::geometry::{AABB, ScreenBlock, ScreenPoint, ScreenSize};

/// Screen blocks have exclusive upper corner, a block with `min == max` is empty.
impl ScreenBlock {
    pub fn from_size(size: ScreenSize) -> ScreenBlock {
        AABB::new(ScreenPoint::origin(), ScreenPoint::from(size))
    }

    pub fn width(&self) -> u32 {
        self.max().x.saturating_sub(self.min().x)
    }

    pub fn height(&self) -> u32 {
        self.max().y.saturating_sub(self.min().y)
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn contains(&self, p: &ScreenPoint) -> bool {
        self.min().x <= p.x && p.x < self.max().x && self.min().y <= p.y && p.y < self.max().y
    }

    /// Iterator over pixels inside the block, in C order (x changes first, then y).
    pub fn internal_points(&self) -> InternalPoints {
        if self.is_empty() {
            InternalPoints {
                min_x: 0,
                max: ScreenPoint::origin(),
                cursor: ScreenPoint::origin(),
            }
        } else {
            InternalPoints {
                min_x: self.min().x,
                max: *self.max(),
                cursor: *self.min(),
            }
        }
    }

    /// Splits the block into tiles of at most `tile_size` x `tile_size` pixels,
    /// ordered from the center of the block outwards.
    /// Tiles on the right and bottom edge are clipped to the block.
    pub fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock> {
        if self.is_empty() {
            return Vec::new();
        }

        let tile_size = tile_size.get();
        let columns = self.width().div_ceil(tile_size);
        let rows = self.height().div_ceil(tile_size);

        let mut tiles: Vec<ScreenBlock> = (0..rows)
            .cartesian_product(0..columns)
            .map(|(row, column)| {
                let min = ScreenPoint::new(
                    self.min().x + column * tile_size,
                    self.min().y + row * tile_size,
                );
                let max = ScreenPoint::new(
                    (min.x + tile_size).min(self.max().x),
                    (min.y + tile_size).min(self.max().y),
                );
                AABB::new(min, max)
            })
            .collect();

        let center = doubled_center(self);
        tiles.sort_by_key(|tile| {
            let tile_center = doubled_center(tile);
            let dx = (tile_center.0 - center.0).abs();
            let dy = (tile_center.1 - center.1).abs();
            (dx.max(dy), dx * dx + dy * dy)
        });

        tiles
    }
}

/// Twice the center of the block, to stay in integers.
fn doubled_center(block: &ScreenBlock) -> (i64, i64) {
    (
        block.min().x as i64 + block.max().x as i64,
        block.min().y as i64 + block.max().y as i64,
    )
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,

    cursor: ScreenPoint,
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let row_width = (self.max.x - self.min_x) as usize;
            let whole_rows = (self.max.y - self.cursor.y - 1) as usize;
            whole_rows * row_width + (self.max.x - self.cursor.x) as usize
        }
    }
}

impl FusedIterator for InternalPoints {}
