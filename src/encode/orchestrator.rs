use crate::{
    config::options::{Delay, FrameOverrides, GifOptions},
    encode::gif::{AnimationEncoder, FrameWriteOptions, GifEncoder},
    foundation::core::{Progress, Size},
    foundation::error::{GifError, GifResult},
    palette::bridge::IndexedFrame,
};

/// The encoder one encode call writes into.
///
/// `Owned` encoders are created by the pipeline and live for exactly one call. `Borrowed`
/// encoders belong to the caller: frames and the terminator are written into them, but they
/// are never reset.
pub enum EncoderSlot<'a> {
    Owned(GifEncoder),
    Borrowed(&'a mut dyn AnimationEncoder),
}

impl<'a> EncoderSlot<'a> {
    pub fn owned(encoder: GifEncoder) -> Self {
        Self::Owned(encoder)
    }

    pub fn borrowed(encoder: &'a mut dyn AnimationEncoder) -> Self {
        Self::Borrowed(encoder)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    pub fn encoder(&mut self) -> &mut dyn AnimationEncoder {
        match self {
            Self::Owned(enc) => enc,
            Self::Borrowed(enc) => &mut **enc,
        }
    }

    /// Release the slot, returning a copy of the stream for borrowed encoders.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Owned(enc) => enc.into_bytes(),
            Self::Borrowed(enc) => enc.bytes().to_vec(),
        }
    }
}

impl std::fmt::Debug for EncoderSlot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owned(enc) => f.debug_tuple("Owned").field(enc).finish(),
            Self::Borrowed(_) => f.write_str("Borrowed(..)"),
        }
    }
}

/// Per-frame write settings shared by every frame of one encode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSettings {
    pub transparent: bool,
    pub timing: Option<Delay>,
    /// Already mapped through [`GifOptions::encoder_repeat`].
    pub repeat: i32,
    pub overrides: FrameOverrides,
}

impl FrameSettings {
    pub fn from_options(opts: &GifOptions) -> Self {
        Self {
            transparent: opts.transparent,
            timing: opts.delay.clone(),
            repeat: opts.encoder_repeat(),
            overrides: opts.frame_options.clone(),
        }
    }

    /// Write options for the frame at `position`. Overrides win over computed values; the
    /// palette is always the frame's own. Without an override, the transparent index is the
    /// palette's first fully transparent entry, or 0.
    pub fn write_options(&self, position: usize, frame: &IndexedFrame) -> FrameWriteOptions {
        let o = &self.overrides;
        FrameWriteOptions {
            palette: Some(frame.palette.clone()),
            first: o.first,
            transparent: o.transparent.unwrap_or(self.transparent),
            transparent_index: o
                .transparent_index
                .or_else(|| frame.palette.transparent_index())
                .unwrap_or(0),
            delay: o
                .delay
                .or_else(|| self.timing.as_ref().and_then(|t| t.at(position))),
            repeat: o.repeat.unwrap_or(self.repeat),
            dispose: o.dispose,
        }
    }
}

/// Write every frame in order, report progress after each write, then finalize.
///
/// `frames` is pulled lazily so each frame is aligned and quantized only after the previous
/// one has been written. `total` is reported unchanged in every [`Progress`].
#[tracing::instrument(skip(frames, settings, slot, progress), fields(owned = slot.is_owned()))]
pub fn encode_frames<I>(
    frames: I,
    total: usize,
    canvas: Size,
    settings: &FrameSettings,
    slot: &mut EncoderSlot<'_>,
    progress: &mut dyn FnMut(Progress),
) -> GifResult<()>
where
    I: IntoIterator<Item = GifResult<IndexedFrame>>,
{
    let encoder = slot.encoder();
    let mut written = 0usize;

    for (i, frame) in frames.into_iter().enumerate() {
        let frame = frame?;
        if frame.size != canvas {
            return Err(GifError::CanvasMismatch {
                index: i,
                actual: frame.size,
                canvas,
            });
        }
        let opts = settings.write_options(i, &frame);
        encoder.write_frame(&frame.indices, frame.size.width, frame.size.height, &opts)?;
        written = i + 1;
        tracing::debug!(frame = i, delay = ?opts.delay, "wrote frame");
        progress(Progress {
            total,
            encoded: written,
        });
    }

    if written != total {
        return Err(GifError::encode(format!(
            "expected {total} frames, encoded {written}"
        )));
    }
    encoder.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/orchestrator.rs"]
mod tests;
