use std::num::NonZeroU32;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::MoshResult;
use crate::foundation::frame::Frame;

/// Owner of the persistent canvas that selected blocks are composited onto.
///
/// Created once per run and only ever mutated in place.
#[derive(Clone, Debug)]
pub struct BaseFrameStore {
    frame: Frame,
}

impl BaseFrameStore {
    /// Start from a black canvas when `start_blank`, else from a copy of `first`.
    pub fn init(first: &Frame, start_blank: bool) -> MoshResult<Self> {
        let frame = if start_blank {
            Frame::zeroed(first.width, first.height, first.channels)?
        } else {
            first.clone()
        };
        Ok(Self { frame })
    }

    /// Blank the canvas when `idx` is a multiple of `refresh_rate`.
    ///
    /// Returns `true` when the reset fired. No-op without a refresh rate.
    pub fn reset_if_due(&mut self, idx: FrameIndex, refresh_rate: Option<NonZeroU32>) -> bool {
        let Some(rate) = refresh_rate else {
            return false;
        };
        if !idx.0.is_multiple_of(u64::from(rate.get())) {
            return false;
        }
        self.frame.fill_zero();
        true
    }

    /// Borrow the canvas.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutably borrow the canvas (for the compositor).
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Consume the store and return the canvas.
    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mosh/base.rs"]
mod tests;
