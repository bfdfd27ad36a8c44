use std::path::PathBuf;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MoshError, MoshResult};
use crate::foundation::frame::Frame;

/// Sink that writes every frame as `frame_NNNNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Create a sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Output path for frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> MoshResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create png output dir '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> MoshResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| MoshError::encode("png sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(MoshError::frame_geometry(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let color = match frame.channels {
            1 => image::ColorType::L8,
            3 => image::ColorType::Rgb8,
            4 => image::ColorType::Rgba8,
            n => {
                return Err(MoshError::encode(format!(
                    "png sink cannot write {n}-channel frames"
                )));
            }
        };

        let path = self.frame_path(idx);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            color,
            image::ImageFormat::Png,
        )
        .map_err(|e| MoshError::encode(format!("write png '{}': {e}", path.display())))?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> MoshResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
