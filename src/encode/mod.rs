//! Encoding sinks.
//!
//! Sinks consume finished base frames in processing order and are used by `MoshSession::run`.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// PNG image-sequence sink.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
