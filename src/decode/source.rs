use std::collections::VecDeque;

use crate::foundation::core::Fps;
use crate::foundation::error::MoshResult;
use crate::foundation::frame::Frame;

/// Stream properties a [`FrameSource`] exposes up front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Source frame rate.
    pub fps: Fps,
}

/// Producer of decoded frames in presentation order.
///
/// `next_frame` returns `Ok(None)` once the stream is exhausted; errors are reserved for malformed
/// input or decoder failures.
pub trait FrameSource {
    /// Stream properties.
    fn info(&self) -> SourceInfo;
    /// Decode the next frame, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> MoshResult<Option<Frame>>;
}

/// In-memory source for tests and debugging.
#[derive(Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: VecDeque<Frame>,
}

impl InMemorySource {
    /// Create a source that yields `frames` in order.
    pub fn new(info: SourceInfo, frames: Vec<Frame>) -> Self {
        Self {
            info,
            frames: frames.into(),
        }
    }

    /// Number of frames not yet yielded.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> MoshResult<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}
