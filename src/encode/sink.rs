use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::MoshResult;
use crate::foundation::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming finished frames in processing order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> MoshResult<()>;
    /// Push one frame in strictly increasing index order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> MoshResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> MoshResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    frames: Vec<(FrameIndex, Frame)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MoshResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> MoshResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MoshResult<()> {
        self.ended = true;
        Ok(())
    }
}
