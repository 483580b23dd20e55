use std::borrow::Cow;

use gif::{DisposalMethod, Repeat};

use crate::{
    config::options::{EncoderOptions, REPEAT_FOREVER_SENTINEL},
    foundation::core::Size,
    foundation::error::{GifError, GifResult},
    palette::quantizer::Palette,
};

/// Options for a single frame write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameWriteOptions {
    /// Local color table for this frame.
    pub palette: Option<Palette>,
    /// Force (or suppress) writing the stream header with this frame. Defaults to "when the
    /// encoder has not written one yet".
    pub first: Option<bool>,
    pub transparent: bool,
    pub transparent_index: u8,
    /// Display time in milliseconds; `None` uses the encoder default of 0.
    pub delay: Option<u32>,
    /// `0` or [`REPEAT_FOREVER_SENTINEL`] loop forever, `n > 0` loops `n` times, other
    /// negative values write no loop extension.
    pub repeat: i32,
    /// GIF disposal method (0..=7). `None` restores the background for transparent frames
    /// and leaves it unspecified otherwise.
    pub dispose: Option<u8>,
}

impl Default for FrameWriteOptions {
    fn default() -> Self {
        Self {
            palette: None,
            first: None,
            transparent: false,
            transparent_index: 0,
            delay: None,
            repeat: 0,
            dispose: None,
        }
    }
}

/// Stateful palette-indexed animation encoder.
pub trait AnimationEncoder {
    fn write_frame(
        &mut self,
        indices: &[u8],
        width: u32,
        height: u32,
        opts: &FrameWriteOptions,
    ) -> GifResult<()>;

    /// Write the end-of-stream terminator.
    fn finish(&mut self) -> GifResult<()>;

    /// The finalized stream. Empty until [`AnimationEncoder::finish`] succeeds.
    fn bytes(&self) -> &[u8];

    /// Drop all state and return to an empty stream.
    fn reset(&mut self);
}

enum State {
    Idle,
    Writing(gif::Encoder<Vec<u8>>),
    Finished,
}

/// [`AnimationEncoder`] writing GIF89a through the `gif` crate.
///
/// The logical screen is sized from the first frame written.
pub struct GifEncoder {
    opts: EncoderOptions,
    state: State,
    out: Vec<u8>,
    frames: usize,
}

impl GifEncoder {
    pub fn new(opts: EncoderOptions) -> Self {
        Self {
            opts,
            state: State::Idle,
            out: Vec::new(),
            frames: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished)
    }

    /// Take the finalized stream. Empty if the encoder was never finished.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn start(&mut self, size: Size, repeat: i32) -> GifResult<()> {
        let buf = Vec::with_capacity(self.opts.initial_capacity);
        let mut encoder = gif::Encoder::new(buf, size.width as u16, size.height as u16, &[])
            .map_err(|e| GifError::encode(format!("write gif header: {e}")))?;
        if let Some(repeat) = gif_repeat(repeat) {
            encoder
                .set_repeat(repeat)
                .map_err(|e| GifError::encode(format!("write loop extension: {e}")))?;
        }
        self.state = State::Writing(encoder);
        Ok(())
    }
}

impl Default for GifEncoder {
    fn default() -> Self {
        Self::new(EncoderOptions::default())
    }
}

impl std::fmt::Debug for GifEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            State::Idle => "idle",
            State::Writing(_) => "writing",
            State::Finished => "finished",
        };
        f.debug_struct("GifEncoder")
            .field("state", &state)
            .field("frames", &self.frames)
            .field("bytes", &self.out.len())
            .finish()
    }
}

impl AnimationEncoder for GifEncoder {
    fn write_frame(
        &mut self,
        indices: &[u8],
        width: u32,
        height: u32,
        opts: &FrameWriteOptions,
    ) -> GifResult<()> {
        let size = Size::new(width, height);
        size.check_gif_bounds()?;
        if indices.len() != size.area() {
            return Err(GifError::encode(format!(
                "index buffer has {} entries, expected {} for {size}",
                indices.len(),
                size.area()
            )));
        }
        let Some(palette) = opts.palette.as_ref() else {
            return Err(GifError::encode("frame written without a palette"));
        };
        if let Some(&bad) = indices.iter().find(|&&i| usize::from(i) >= palette.len()) {
            return Err(GifError::encode(format!(
                "index {bad} is outside the {}-color palette",
                palette.len()
            )));
        }

        match self.state {
            State::Finished => {
                return Err(GifError::EncoderFinalized {
                    frames: self.frames,
                });
            }
            State::Idle => {
                if opts.first == Some(false) {
                    return Err(GifError::encode(
                        "first frame written with `first: false` but no header exists",
                    ));
                }
                self.start(size, opts.repeat)?;
            }
            State::Writing(_) => {
                if opts.first == Some(true) {
                    return Err(GifError::encode(
                        "`first: true` on a stream that already has a header",
                    ));
                }
            }
        }
        let State::Writing(encoder) = &mut self.state else {
            return Err(GifError::encode("gif encoder is not writing"));
        };

        let frame = gif::Frame {
            width: width as u16,
            height: height as u16,
            delay: delay_centis(opts.delay.unwrap_or(0)),
            dispose: disposal(opts.dispose, opts.transparent),
            transparent: opts.transparent.then_some(opts.transparent_index),
            palette: Some(palette.to_rgb_bytes()),
            buffer: Cow::Borrowed(indices),
            ..gif::Frame::default()
        };
        encoder
            .write_frame(&frame)
            .map_err(|e| GifError::encode(format!("write frame {}: {e}", self.frames)))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> GifResult<()> {
        match std::mem::replace(&mut self.state, State::Finished) {
            State::Writing(encoder) => {
                let bytes = encoder
                    .into_inner()
                    .map_err(|e| GifError::encode(format!("write gif trailer: {e}")))?;
                self.out = bytes;
                Ok(())
            }
            State::Finished => Ok(()),
            State::Idle => {
                self.state = State::Idle;
                Err(GifError::encode("cannot finish a gif with no frames"))
            }
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.out
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.out.clear();
        self.frames = 0;
    }
}

/// Loop extension for an encoder repeat value.
pub fn gif_repeat(repeat: i32) -> Option<Repeat> {
    match repeat {
        0 | REPEAT_FOREVER_SENTINEL => Some(Repeat::Infinite),
        n if n > 0 => Some(Repeat::Finite(n.min(i32::from(u16::MAX)) as u16)),
        _ => None,
    }
}

/// Milliseconds to GIF centiseconds, rounded to nearest.
pub fn delay_centis(ms: u32) -> u16 {
    (ms.saturating_add(5) / 10).min(u32::from(u16::MAX)) as u16
}

fn disposal(dispose: Option<u8>, transparent: bool) -> DisposalMethod {
    let code = dispose.unwrap_or(if transparent { 2 } else { 0 });
    DisposalMethod::from_u8(code & 7).unwrap_or(DisposalMethod::Any)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
