//! blockmosh is a difference-driven block datamoshing engine for video.
//!
//! A persistent canvas (the *base frame*) is selectively overwritten, block by block, from every
//! newly decoded frame. The blocks chosen are the ones with the largest temporal change, found by a
//! coarse-to-fine search: a coarse grid is scored, the most active blocks are kept and split into
//! quadrants, and the process repeats until the blocks reach `division_size`. Regions that never
//! win keep stale content, which produces the smear/trail look.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: a [`FrameSource`] yields frames (`FfmpegSource` for real files)
//! 2. **Reset** (optional): the base frame is blanked every `refresh_rate` frames
//! 3. **Select**: [`select_updates`] picks the `division_size` blocks to refresh
//! 4. **Composite**: [`apply_updates`] copies those blocks onto the base frame
//! 5. **Encode**: the base frame is pushed to a [`FrameSink`] (`FfmpegSink` for MP4 output)
//!
//! [`MoshSession::run`] drives the whole loop.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod mosh;

/// Frame sources.
pub mod decode;
/// Frame sinks.
pub mod encode;
/// Session-oriented mosh API.
pub mod session;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{MoshError, MoshResult};
pub use crate::foundation::frame::Frame;

pub use crate::mosh::base::BaseFrameStore;
pub use crate::mosh::composite::apply_updates;
pub use crate::mosh::diff::{ScoredBlock, block_diff, rank_descending};
pub use crate::mosh::grid::{Block, initial_grid};
pub use crate::mosh::observer::{
    LevelReport, MoshObserver, NoopObserver, RecordingObserver, TracingObserver,
};
pub use crate::mosh::select::{SelectParams, keep_count, rank_candidates, select_updates};

pub use crate::decode::ffmpeg::{FfmpegSource, VideoSourceInfo, probe_video};
pub use crate::decode::source::{FrameSource, InMemorySource, SourceInfo};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path, next_free_output_path,
};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::session::config::{MoshConfig, MoshSessionOpts};
pub use crate::session::mosh_session::{MoshSession, MoshStats};
