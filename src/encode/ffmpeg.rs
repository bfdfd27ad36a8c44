use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MoshError, MoshResult};
use crate::foundation::frame::Frame;

/// Channels per pixel the sink accepts (`rgb24`).
const ENCODE_CHANNELS: u8 = 3;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> MoshResult<()> {
        validate_sink_config(&cfg)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(MoshError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(MoshError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        // Output: h264 + yuv420p for broad compatibility.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            MoshError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MoshError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MoshError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> MoshResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| MoshError::encode("ffmpeg sink not started"))?;
        check_frame_order(self.last_idx, idx)?;
        self.last_idx = Some(idx);
        check_frame_matches(cfg, frame)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(MoshError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            MoshError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> MoshResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| MoshError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| MoshError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MoshError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| MoshError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(MoshError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

fn validate_sink_config(cfg: &SinkConfig) -> MoshResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(MoshError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(MoshError::validation(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(MoshError::validation(
            "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

fn check_frame_order(last: Option<FrameIndex>, idx: FrameIndex) -> MoshResult<()> {
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(MoshError::encode(
            "ffmpeg sink received out-of-order frame index",
        ));
    }
    Ok(())
}

fn check_frame_matches(cfg: &SinkConfig, frame: &Frame) -> MoshResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(MoshError::frame_geometry(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.channels != ENCODE_CHANNELS {
        return Err(MoshError::frame_geometry(format!(
            "ffmpeg sink expects {ENCODE_CHANNELS}-channel rgb frames, got {} channels",
            frame.channels
        )));
    }
    Ok(())
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, use `-r` before `-i` to specify the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MoshResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// First path among `output.mp4`, `output1.mp4`, `output2.mp4`, ... in `dir` that does not exist.
pub fn next_free_output_path(dir: &Path) -> PathBuf {
    let mut candidate = dir.join("output.mp4");
    let mut counter = 1u64;
    while candidate.exists() {
        candidate = dir.join(format!("output{counter}.mp4"));
        counter += 1;
    }
    candidate
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
