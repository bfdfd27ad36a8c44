use crate::foundation::core::FrameIndex;

/// Summary of one refinement pass of the difference selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelReport {
    /// Refinement level, counting down from `fractal_level` to 1.
    pub level: u32,
    /// Edge length of the blocks scored at this level.
    pub level_size: u32,
    /// Number of candidate blocks scored.
    pub candidates: usize,
    /// Number of top-ranked blocks kept.
    pub kept: usize,
    /// Number of quadrant blocks handed to the next level (or returned after level 1).
    pub emitted: usize,
}

/// Optional hook invoked at fixed checkpoints of a mosh run.
///
/// Every method defaults to a no-op; the pipeline never depends on what an observer does.
pub trait MoshObserver {
    /// A decoded frame is about to be processed.
    fn on_frame_start(&mut self, _idx: FrameIndex) {}

    /// One selector refinement pass finished.
    fn on_level(&mut self, _report: &LevelReport) {}

    /// The base frame was blanked before selection of frame `idx`.
    fn on_reset(&mut self, _idx: FrameIndex) {}

    /// The base frame for `idx` was handed to the sink.
    fn on_frame_emitted(&mut self, _idx: FrameIndex, _updated_blocks: usize) {}
}

/// Observer that ignores every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MoshObserver for NoopObserver {}

/// Observer that forwards checkpoints to `tracing` as structured events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl MoshObserver for TracingObserver {
    fn on_frame_start(&mut self, idx: FrameIndex) {
        tracing::debug!(frame = idx.0, "processing frame");
    }

    fn on_level(&mut self, report: &LevelReport) {
        tracing::debug!(
            level = report.level,
            level_size = report.level_size,
            candidates = report.candidates,
            kept = report.kept,
            emitted = report.emitted,
            "refinement pass"
        );
    }

    fn on_reset(&mut self, idx: FrameIndex) {
        tracing::debug!(frame = idx.0, "base frame reset");
    }

    fn on_frame_emitted(&mut self, idx: FrameIndex, updated_blocks: usize) {
        tracing::debug!(frame = idx.0, updated_blocks, "frame emitted");
    }
}

/// Observer that records every checkpoint, for tests and debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    /// Frames started, in order.
    pub frames_started: Vec<FrameIndex>,
    /// Level reports, in order.
    pub levels: Vec<LevelReport>,
    /// Frames on which the base frame was reset.
    pub resets: Vec<FrameIndex>,
    /// Emitted frames with their updated block count.
    pub emitted: Vec<(FrameIndex, usize)>,
}

impl MoshObserver for RecordingObserver {
    fn on_frame_start(&mut self, idx: FrameIndex) {
        self.frames_started.push(idx);
    }

    fn on_level(&mut self, report: &LevelReport) {
        self.levels.push(*report);
    }

    fn on_reset(&mut self, idx: FrameIndex) {
        self.resets.push(idx);
    }

    fn on_frame_emitted(&mut self, idx: FrameIndex, updated_blocks: usize) {
        self.emitted.push((idx, updated_blocks));
    }
}
