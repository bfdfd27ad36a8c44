//! Frame sources.
//!
//! Sources yield decoded frames in presentation order and are consumed by `MoshSession::run`.

/// `ffmpeg`-based source (any container/codec the system `ffmpeg` can read).
pub mod ffmpeg;
/// Generic frame source trait and built-in sources.
pub mod source;
