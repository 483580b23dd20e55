use crate::foundation::error::{GifError, GifResult};

/// Largest width or height a GIF logical screen can describe.
pub const GIF_MAX_DIMENSION: u32 = u16::MAX as u32;

/// Straight-alpha RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Output canvas dimensions, computed once per encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reject sizes a GIF logical screen cannot hold.
    pub fn check_gif_bounds(self) -> GifResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GifError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > GIF_MAX_DIMENSION || self.height > GIF_MAX_DIMENSION {
            return Err(GifError::validation(format!(
                "canvas {}x{} exceeds GIF maximum ({GIF_MAX_DIMENSION}x{GIF_MAX_DIMENSION})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel rectangle inside a frame (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(self) -> u64 {
        u64::from(self.left) + u64::from(self.width)
    }

    pub fn bottom(self) -> u64 {
        u64::from(self.top) + u64::from(self.height)
    }

    pub fn fits_within(self, size: Size) -> bool {
        self.right() <= u64::from(size.width) && self.bottom() <= u64::from(size.height)
    }
}

/// Progress snapshot reported after each frame write.
///
/// `total` is fixed for the whole encode; `encoded` is the 1-based index of the frame
/// that was just written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub encoded: usize,
}

impl Progress {
    pub fn is_done(self) -> bool {
        self.encoded >= self.total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
