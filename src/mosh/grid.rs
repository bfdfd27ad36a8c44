/// Axis-aligned square block: top-left origin plus edge length, in pixels.
///
/// Blocks may extend past the frame's right/bottom edge; consumers clip to frame bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Edge length.
    pub size: u32,
}

impl Block {
    /// Create a block at `(x, y)` with edge length `size`.
    pub fn new(x: u32, y: u32, size: u32) -> Self {
        Self { x, y, size }
    }

    /// Clip the block to a `width x height` frame.
    ///
    /// Returns the in-bounds `(x0, y0, x1, y1)` half-open rectangle, or `None` when the origin lies
    /// outside the frame.
    pub fn clip(self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let x1 = self.x.saturating_add(self.size).min(width);
        let y1 = self.y.saturating_add(self.size).min(height);
        Some((self.x, self.y, x1, y1))
    }

    /// The four quadrants of this block, in `(0,0), (half,0), (0,half), (half,half)` order.
    ///
    /// Quadrants whose origin is at or past `width`/`height` are dropped.
    pub fn quadrants(self, width: u32, height: u32) -> impl Iterator<Item = Block> {
        let half = self.size / 2;
        [(0, 0), (half, 0), (0, half), (half, half)]
            .into_iter()
            .map(move |(dx, dy)| Block::new(self.x.saturating_add(dx), self.y.saturating_add(dy), half))
            .filter(move |b| b.x < width && b.y < height)
    }
}

/// Partition a `width x height` frame into `level_size` blocks.
///
/// Enumeration is x-major: for each column origin `x`, every row origin `y` is emitted before moving
/// to the next column. Tie-breaking in selection depends on this order.
pub fn initial_grid(width: u32, height: u32, level_size: u32) -> Vec<Block> {
    if level_size == 0 {
        return Vec::new();
    }
    let step = level_size as usize;
    let cols = width.div_ceil(level_size) as usize;
    let rows = height.div_ceil(level_size) as usize;
    let mut out = Vec::with_capacity(cols * rows);
    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            out.push(Block::new(x, y, level_size));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/mosh/grid.rs"]
mod tests;
