use rayon::prelude::*;

use crate::foundation::error::{MoshError, MoshResult};
use crate::foundation::frame::Frame;
use crate::mosh::grid::Block;

/// Copy each `division_size` block of `updates` from `curr` into `base`, clipped to frame bounds.
///
/// Update blocks are pairwise disjoint, so application order does not matter.
pub fn apply_updates(
    base: &mut Frame,
    curr: &Frame,
    updates: &[Block],
    division_size: u32,
) -> MoshResult<()> {
    apply_updates_in(base, curr, updates, division_size, None)
}

/// [`apply_updates`], writing horizontal stripes in parallel on `pool` when one is given.
///
/// Stripes are `division_size` rows tall. Every update origin is a multiple of `division_size`, so
/// each block falls in exactly one stripe and no two workers touch the same row.
pub(crate) fn apply_updates_in(
    base: &mut Frame,
    curr: &Frame,
    updates: &[Block],
    division_size: u32,
    pool: Option<&rayon::ThreadPool>,
) -> MoshResult<()> {
    if division_size == 0 {
        return Err(MoshError::configuration("division_size must be > 0"));
    }
    base.ensure_same_geometry(curr, "base frame and current frame differ")?;

    let Some(pool) = pool else {
        for &block in updates {
            copy_block(base, curr, block, division_size);
        }
        return Ok(());
    };

    if updates.iter().any(|b| b.y % division_size != 0) {
        return Err(MoshError::validation(
            "parallel compositing requires update origins aligned to division_size",
        ));
    }

    let stripe_rows = division_size as usize;
    let stripe_count = (curr.height as usize).div_ceil(stripe_rows);
    let mut by_stripe = vec![Vec::<Block>::new(); stripe_count];
    for &block in updates {
        if let Some(bucket) = by_stripe.get_mut(block.y as usize / stripe_rows) {
            bucket.push(block);
        }
    }

    let stride = curr.stride();
    let (width, height, ch) = (curr.width, curr.height, curr.channels as usize);
    pool.install(|| {
        base.data
            .par_chunks_mut(stride * stripe_rows)
            .zip(by_stripe.par_iter())
            .enumerate()
            .for_each(|(stripe, (dst, blocks))| {
                let stripe_y0 = stripe * stripe_rows;
                for &block in blocks {
                    let clipped = Block::new(block.x, block.y, division_size).clip(width, height);
                    let Some((x0, y0, x1, y1)) = clipped else {
                        continue;
                    };
                    let (cs, ce) = (x0 as usize * ch, x1 as usize * ch);
                    for y in y0 as usize..y1 as usize {
                        let src = y * stride;
                        let dst_off = (y - stripe_y0) * stride;
                        dst[dst_off + cs..dst_off + ce]
                            .copy_from_slice(&curr.data[src + cs..src + ce]);
                    }
                }
            });
    });
    Ok(())
}

fn copy_block(base: &mut Frame, curr: &Frame, block: Block, division_size: u32) {
    let region = Block::new(block.x, block.y, division_size);
    let Some((x0, y0, x1, y1)) = region.clip(curr.width, curr.height) else {
        return;
    };
    let ch = curr.channels as usize;
    let stride = curr.stride();
    let (cs, ce) = (x0 as usize * ch, x1 as usize * ch);
    for y in y0 as usize..y1 as usize {
        let off = y * stride;
        base.data[off + cs..off + ce].copy_from_slice(&curr.data[off + cs..off + ce]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mosh/composite.rs"]
mod tests;
