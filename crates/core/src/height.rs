//! Height buckets for non-linear strips.
//!
//! A pyramid strip zig-zags through rows of different length, so "fill to
//! 40%" cannot be expressed as a pixel range. A [`HeightMap`] assigns every
//! pixel to one of [`HEIGHT_BUCKETS`] buckets, bottom (0) to top (99).

use crate::types::HEIGHT_BUCKETS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    buckets: Vec<Vec<usize>>,
    pixel_count: usize,
}

impl HeightMap {
    /// Pixel 0 at the bottom, the last pixel at the top.
    pub fn linear(pixel_count: usize) -> Self {
        let mut buckets = vec![Vec::new(); HEIGHT_BUCKETS];
        for pixel in 0..pixel_count {
            let h = pixel * HEIGHT_BUCKETS / pixel_count.max(1);
            buckets[h.min(HEIGHT_BUCKETS - 1)].push(pixel);
        }
        Self {
            buckets,
            pixel_count,
        }
    }

    /// Rows of pixels laid out consecutively, bottom row first.
    ///
    /// Each row occupies an equal share of the height range.
    pub fn pyramid(rows: &[usize]) -> Self {
        let pixel_count = rows.iter().sum();
        let mut buckets = vec![Vec::new(); HEIGHT_BUCKETS];
        let mut pixel = 0;
        for (row, &len) in rows.iter().enumerate() {
            let lo = row * HEIGHT_BUCKETS / rows.len();
            let hi = ((row + 1) * HEIGHT_BUCKETS / rows.len()).max(lo + 1);
            for k in 0..len {
                // Spread the row's pixels over its share so partial fills stay smooth.
                let h = lo + k * (hi - lo) / len.max(1);
                buckets[h.min(HEIGHT_BUCKETS - 1)].push(pixel);
                pixel += 1;
            }
        }
        Self {
            buckets,
            pixel_count,
        }
    }

    /// Explicit bucket lists. Pixels at or past `pixel_count` are dropped.
    pub fn from_buckets(mut buckets: Vec<Vec<usize>>, pixel_count: usize) -> Self {
        buckets.resize(HEIGHT_BUCKETS, Vec::new());
        buckets.truncate(HEIGHT_BUCKETS);
        for bucket in &mut buckets {
            bucket.retain(|&p| p < pixel_count);
        }
        Self {
            buckets,
            pixel_count,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub fn bucket(&self, height: usize) -> &[usize] {
        self.buckets.get(height).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pixels in buckets `[from, to)`.
    pub fn pixels_between(&self, from: usize, to: usize) -> impl Iterator<Item = usize> + '_ {
        let to = to.min(HEIGHT_BUCKETS);
        let from = from.min(to);
        self.buckets[from..to].iter().flatten().copied()
    }

    /// Pixels below `height`.
    pub fn pixels_below(&self, height: usize) -> impl Iterator<Item = usize> + '_ {
        self.pixels_between(0, height)
    }

    pub fn height_of(&self, pixel: usize) -> Option<usize> {
        self.buckets.iter().position(|b| b.contains(&pixel))
    }
}
