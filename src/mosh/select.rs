use rayon::prelude::*;

use crate::foundation::error::{MoshError, MoshResult};
use crate::foundation::frame::Frame;
use crate::mosh::diff::{ScoredBlock, block_diff, rank_descending};
use crate::mosh::grid::{Block, initial_grid};
use crate::mosh::observer::{LevelReport, MoshObserver};

/// Parameters of the multi-level difference search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectParams {
    /// Edge length of the finest blocks, which are the ones composited.
    pub division_size: u32,
    /// Number of coarse-to-fine refinement passes.
    pub fractal_level: u32,
    /// Target fraction of the frame to refresh; `>= 1` keeps everything.
    pub budget: f64,
}

impl SelectParams {
    /// Check the parameter ranges the search relies on.
    pub fn validate(&self) -> MoshResult<()> {
        if self.division_size == 0 {
            return Err(MoshError::configuration("division_size must be > 0"));
        }
        if self.fractal_level == 0 {
            return Err(MoshError::configuration("fractal_level must be >= 1"));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(MoshError::configuration(format!(
                "budget must be a finite value > 0, got {}",
                self.budget
            )));
        }
        self.top_level_size().map(|_| ())
    }

    /// Edge length of the blocks in the initial grid: `division_size * 2^fractal_level`.
    pub fn top_level_size(&self) -> MoshResult<u32> {
        1u32.checked_shl(self.fractal_level)
            .and_then(|scale| self.division_size.checked_mul(scale))
            .ok_or_else(|| {
                MoshError::configuration(format!(
                    "division_size {} * 2^{} overflows the block size range",
                    self.division_size, self.fractal_level
                ))
            })
    }

    /// Fraction of candidates retained by each refinement pass: `budget^(1/fractal_level)`.
    pub fn per_pass_retention(&self) -> f64 {
        self.budget.powf(1.0 / f64::from(self.fractal_level))
    }
}

/// Number of ranked candidates kept at one pass: `floor(candidates * budget^(1/fractal_level))`.
///
/// `fractal_level` is the top-level parameter, not the current level. Budgets above 1 keep every
/// candidate.
pub fn keep_count(candidates: usize, budget: f64, fractal_level: u32) -> usize {
    let retain = budget.powf(1.0 / f64::from(fractal_level));
    let keep = (candidates as f64 * retain).floor();
    if keep >= candidates as f64 {
        candidates
    } else if keep <= 0.0 {
        0
    } else {
        keep as usize
    }
}

/// Score `candidates` against the frame pair and sort them by `(score, x, y)` descending.
pub fn rank_candidates(
    prev: &Frame,
    curr: &Frame,
    candidates: &[Block],
) -> MoshResult<Vec<ScoredBlock>> {
    prev.ensure_same_geometry(curr, "previous and current frame differ")?;
    let mut scored = score_candidates(prev, curr, candidates, None);
    rank_descending(&mut scored);
    Ok(scored)
}

/// Run the coarse-to-fine search and return the `division_size` blocks to refresh.
///
/// Each pass scores the current candidates, keeps the top [`keep_count`] of them and splits each
/// kept block into its in-frame quadrants, which become the next pass's candidates. After the last
/// pass every returned block has edge length `division_size`.
pub fn select_updates(
    prev: &Frame,
    curr: &Frame,
    params: &SelectParams,
    observer: &mut dyn MoshObserver,
) -> MoshResult<Vec<Block>> {
    select_updates_in(prev, curr, params, None, observer)
}

/// [`select_updates`], scoring each pass on `pool` when one is given.
pub(crate) fn select_updates_in(
    prev: &Frame,
    curr: &Frame,
    params: &SelectParams,
    pool: Option<&rayon::ThreadPool>,
    observer: &mut dyn MoshObserver,
) -> MoshResult<Vec<Block>> {
    params.validate()?;
    prev.ensure_same_geometry(curr, "previous and current frame differ")?;

    let (width, height) = (curr.width, curr.height);
    let mut level_size = params.top_level_size()?;
    let mut candidates = initial_grid(width, height, level_size);

    for level in (1..=params.fractal_level).rev() {
        let mut scored = score_candidates(prev, curr, &candidates, pool);
        rank_descending(&mut scored);

        let kept = keep_count(scored.len(), params.budget, params.fractal_level);
        let mut next = Vec::with_capacity(kept * 4);
        for s in &scored[..kept] {
            next.extend(s.block.quadrants(width, height));
        }

        observer.on_level(&LevelReport {
            level,
            level_size,
            candidates: scored.len(),
            kept,
            emitted: next.len(),
        });

        candidates = next;
        level_size /= 2;
    }

    debug_assert!(candidates.iter().all(|b| b.size == params.division_size));
    Ok(candidates)
}

fn score_candidates(
    prev: &Frame,
    curr: &Frame,
    candidates: &[Block],
    pool: Option<&rayon::ThreadPool>,
) -> Vec<ScoredBlock> {
    let score = |&block: &Block| ScoredBlock {
        block,
        score: block_diff(prev, curr, block),
    };
    match pool {
        // `collect` on an indexed parallel iterator keeps candidate order.
        Some(pool) => pool.install(|| candidates.par_iter().map(score).collect()),
        None => candidates.iter().map(score).collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mosh/select.rs"]
mod tests;
