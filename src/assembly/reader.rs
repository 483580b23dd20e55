use std::path::Path;

use crate::{
    assembly::gif::Gif, config::options::GifOptions, foundation::error::GifResult,
    pipeline::normalize::split_frames, raster::frame::Frame,
};

/// Reads an existing animation so it can be split or recomposed.
#[derive(Clone, Debug)]
pub struct GifReader {
    source: Frame,
}

impl GifReader {
    pub fn new(source: impl Into<Frame>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> GifResult<Self> {
        Ok(Self::new(Frame::decode(bytes)?))
    }

    pub fn open(path: impl AsRef<Path>) -> GifResult<Self> {
        Ok(Self::new(Frame::open(path)?))
    }

    pub fn source(&self) -> &Frame {
        &self.source
    }

    /// Per-page delays in milliseconds as decoded from the source, if it carried timing.
    pub fn delays(&self) -> Option<&[u32]> {
        self.source.delays()
    }

    /// Split the source into single frames, in page order.
    pub fn to_frames(&self) -> GifResult<Vec<Frame>> {
        split_frames(&self.source)
    }

    /// A new assembly pre-populated with this source's frames.
    pub fn to_gif(&self, options: GifOptions) -> GifResult<Gif> {
        let mut gif = Gif::new(options)?;
        gif.add_frames(self.to_frames()?);
        Ok(gif)
    }
}

pub fn read_gif(bytes: &[u8]) -> GifResult<GifReader> {
    GifReader::from_bytes(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/reader.rs"]
mod tests;
