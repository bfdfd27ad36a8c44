use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::decode::source::{FrameSource, SourceInfo};
use crate::foundation::core::Fps;
use crate::foundation::error::{MoshError, MoshResult};
use crate::foundation::frame::Frame;

/// Channels per decoded pixel (`rgb24`).
const DECODE_CHANNELS: u8 = 3;

/// Basic metadata about a source video file.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate of the first video stream.
    pub fps: Fps,
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> MoshResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| MoshError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(MoshError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| MoshError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MoshError::decode("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| MoshError::decode("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| MoshError::decode("missing video height from ffprobe"))?;

    // `r_frame_rate` is "0/0" for some containers; fall back to the average rate.
    let fps = [&video_stream.r_frame_rate, &video_stream.avg_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|rate| Fps::parse_ratio(rate).ok())
        .ok_or_else(|| MoshError::decode("missing or invalid frame rate from ffprobe"))?;

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps,
    })
}

/// Frame source that streams `rgb24` frames out of the system `ffmpeg`.
pub struct FfmpegSource {
    video: VideoSourceInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
}

impl FfmpegSource {
    /// Probe `path` and start decoding its first video stream.
    pub fn open(path: impl AsRef<Path>) -> MoshResult<Self> {
        let video = probe_video(path.as_ref())?;
        let frame_len =
            video.width as usize * video.height as usize * DECODE_CHANNELS as usize;
        if frame_len == 0 {
            return Err(MoshError::decode(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&video.source_path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MoshError::decode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MoshError::decode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MoshError::decode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            video,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame_len,
        })
    }

    /// Probed metadata of the source file.
    pub fn video_info(&self) -> &VideoSourceInfo {
        &self.video
    }

    fn finish(&mut self) -> MoshResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| MoshError::decode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MoshError::decode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| MoshError::decode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(MoshError::decode(format!(
                "ffmpeg decode of '{}' exited with status {}: {}",
                self.video.source_path.display(),
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            width: self.video.width,
            height: self.video.height,
            fps: self.video.fps,
        }
    }

    fn next_frame(&mut self) -> MoshResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        let filled = read_full(stdout, &mut buf)
            .map_err(|e| MoshError::decode(format!("failed to read ffmpeg output: {e}")))?;

        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }
        if filled < self.frame_len {
            self.finish()?;
            return Err(MoshError::decode(format!(
                "truncated frame from ffmpeg: got {filled} bytes, expected {}",
                self.frame_len
            )));
        }

        Frame::new(self.video.width, self.video.height, DECODE_CHANNELS, buf).map(Some)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Read until `buf` is full or the stream ends; returns the number of bytes read.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/ffmpeg.rs"]
mod tests;
