use crate::foundation::error::{MoshError, MoshResult};

/// A decoded video frame as 8-bit interleaved channels.
///
/// Pixels are tightly packed, row-major: the byte for channel `c` of pixel `(x, y)` lives at
/// `(y * width + x) * channels + c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Channels per pixel (3 for RGB video).
    pub channels: u8,
    /// Pixel bytes, `width * height * channels` long.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap an existing pixel buffer, validating its length against the geometry.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> MoshResult<Self> {
        let expected = checked_byte_len(width, height, channels)?;
        if data.len() != expected {
            return Err(MoshError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create an all-zero (black) frame.
    pub fn zeroed(width: u32, height: u32, channels: u8) -> MoshResult<Self> {
        let len = checked_byte_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0u8; len],
        })
    }

    /// Byte length of one pixel row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Return `true` when `other` has the same width, height and channel count.
    pub fn same_geometry(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Fail with [`MoshError::FrameGeometry`] unless `other` matches this frame's geometry.
    pub fn ensure_same_geometry(&self, other: &Frame, what: &str) -> MoshResult<()> {
        if self.same_geometry(other) {
            return Ok(());
        }
        Err(MoshError::frame_geometry(format!(
            "{what}: {}x{}x{} vs {}x{}x{}",
            self.width, self.height, self.channels, other.width, other.height, other.channels
        )))
    }

    /// Set every byte to zero in place.
    pub fn fill_zero(&mut self) {
        self.data.fill(0);
    }

    /// Borrow the channel bytes of pixel `(x, y)`.
    ///
    /// Panics when `(x, y)` is outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let ch = self.channels as usize;
        let off = y as usize * self.stride() + x as usize * ch;
        &self.data[off..off + ch]
    }
}

fn checked_byte_len(width: u32, height: u32, channels: u8) -> MoshResult<usize> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(MoshError::validation(format!(
            "frame dimensions must be non-zero, got {width}x{height}x{channels}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(channels as usize))
        .ok_or_else(|| {
            MoshError::validation(format!(
                "frame dimensions overflow: {width}x{height}x{channels}"
            ))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
