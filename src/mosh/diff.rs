use crate::foundation::frame::Frame;
use crate::mosh::grid::Block;

/// A block paired with its temporal difference score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredBlock {
    /// Scored block.
    pub block: Block,
    /// Sum of absolute per-channel differences over the block's in-bounds area.
    pub score: u64,
}

/// Sum `|curr - prev|` over every channel of every pixel in `block`, clipped to frame bounds.
///
/// Pixels past the right/bottom edge are excluded from the sum. Both frames must share geometry;
/// callers check that up front.
pub fn block_diff(prev: &Frame, curr: &Frame, block: Block) -> u64 {
    debug_assert!(prev.same_geometry(curr));
    let Some((x0, y0, x1, y1)) = block.clip(curr.width, curr.height) else {
        return 0;
    };

    let ch = curr.channels as usize;
    let stride = curr.stride();
    let row_start = x0 as usize * ch;
    let row_end = x1 as usize * ch;

    let mut sum = 0u64;
    for y in y0 as usize..y1 as usize {
        let off = y * stride;
        let a = &prev.data[off + row_start..off + row_end];
        let b = &curr.data[off + row_start..off + row_end];
        sum += a
            .iter()
            .zip(b)
            .map(|(&p, &c)| u64::from(p.abs_diff(c)))
            .sum::<u64>();
    }
    sum
}

/// Sort scored blocks by `(score, x, y)`, all three descending.
pub fn rank_descending(scored: &mut [ScoredBlock]) {
    scored.sort_unstable_by(|a, b| {
        (b.score, b.block.x, b.block.y).cmp(&(a.score, a.block.x, a.block.y))
    });
}

#[cfg(test)]
#[path = "../../tests/unit/mosh/diff.rs"]
mod tests;
