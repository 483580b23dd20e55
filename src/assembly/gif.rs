use crate::{
    config::options::GifOptions,
    encode::gif::{AnimationEncoder, GifEncoder},
    encode::orchestrator::{EncoderSlot, FrameSettings, encode_frames},
    foundation::core::Progress,
    foundation::error::{GifError, GifResult},
    palette::bridge::{PaletteSettings, quantize_frame},
    palette::quantizer::{NeuQuantizer, Quantizer},
    pipeline::align::{Alignment, align_frame},
    pipeline::canvas::resolve_canvas,
    pipeline::normalize::split_all,
    raster::frame::Frame,
};

/// Accumulates frame sources and assembles them into one animated GIF.
///
/// Options are validated and normalized once, in [`Gif::new`]. Sources are kept as added;
/// every encode works on its own copies, so a `Gif` can be encoded more than once.
pub struct Gif {
    options: GifOptions,
    frames: Vec<Frame>,
    quantizer: Box<dyn Quantizer>,
}

impl Gif {
    pub fn new(options: GifOptions) -> GifResult<Self> {
        options.validate()?;
        Ok(Self {
            options: options.normalized(),
            frames: Vec::new(),
            quantizer: Box::new(NeuQuantizer),
        })
    }

    /// Replace the default [`NeuQuantizer`].
    pub fn with_quantizer(mut self, quantizer: Box<dyn Quantizer>) -> Self {
        self.quantizer = quantizer;
        self
    }

    /// Append one source. Multi-page sources expand into one frame per page at encode time.
    pub fn add_frame(&mut self, frame: impl Into<Frame>) -> &mut Self {
        self.frames.push(frame.into());
        self
    }

    /// Append sources in order. Repeated calls are cumulative.
    pub fn add_frames<I, F>(&mut self, frames: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Frame>,
    {
        self.frames.extend(frames.into_iter().map(Into::into));
        self
    }

    /// Sources added so far, before page expansion.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn options(&self) -> &GifOptions {
        &self.options
    }

    /// A fresh encoder configured from `encoder_options`, for callers composing streams by hand.
    pub fn encoder(&self) -> GifEncoder {
        GifEncoder::new(self.options.encoder_options.clone())
    }

    pub fn to_buffer(&self) -> GifResult<Vec<u8>> {
        self.to_buffer_with(&mut |_| {}, None)
    }

    /// Run the full pipeline and return the encoded stream.
    ///
    /// `progress` is called once per written frame. With `encoder` set, frames and the
    /// terminator are written into the caller's encoder without resetting it, and the
    /// returned bytes are a copy of its whole stream.
    #[tracing::instrument(skip_all, fields(sources = self.frames.len()))]
    pub fn to_buffer_with(
        &self,
        progress: &mut dyn FnMut(Progress),
        encoder: Option<&mut dyn AnimationEncoder>,
    ) -> GifResult<Vec<u8>> {
        if self.frames.is_empty() {
            return Err(GifError::validation("no frames were added"));
        }
        let opts = &self.options;

        let frames = split_all(&self.frames)?;
        let canvas = resolve_canvas(&self.frames, opts.width, opts.height, opts.resize_to)?;
        canvas.check_gif_bounds()?;
        let total = frames.len();
        tracing::debug!(%canvas, total, "resolved canvas");

        let alignment = Alignment::from_options(opts);
        let palette = PaletteSettings::from_options(opts);
        let settings = FrameSettings::from_options(opts);
        let quantizer = self.quantizer.as_ref();

        let mut slot = match encoder {
            Some(enc) => EncoderSlot::borrowed(enc),
            None => EncoderSlot::owned(self.encoder()),
        };
        let indexed = frames.into_iter().map(|mut frame| {
            align_frame(&mut frame, canvas, &alignment)?;
            quantize_frame(frame, &palette, quantizer)
        });
        encode_frames(indexed, total, canvas, &settings, &mut slot, progress)?;
        Ok(slot.into_bytes())
    }

    /// Encode, then decode the result back into an animated handle carrying the configured
    /// loop count and delays.
    pub fn to_animation(&self) -> GifResult<Frame> {
        self.to_animation_with(&mut |_| {}, None)
    }

    pub fn to_animation_with(
        &self,
        progress: &mut dyn FnMut(Progress),
        encoder: Option<&mut dyn AnimationEncoder>,
    ) -> GifResult<Frame> {
        let bytes = self.to_buffer_with(progress, encoder)?;
        let decoded = Frame::decode(&bytes)?;
        let pages = decoded.metadata().page_count() as usize;
        let delays = match &self.options.delay {
            Some(delay) => Some(delay.expand(pages)),
            None => decoded.delays().map(<[u32]>::to_vec),
        };
        Ok(decoded.with_animation_meta(self.options.repeat, delays))
    }
}

impl std::fmt::Debug for Gif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gif")
            .field("options", &self.options)
            .field("frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}

/// Start an assembly with validated options.
pub fn create_gif(options: GifOptions) -> GifResult<Gif> {
    Gif::new(options)
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/gif.rs"]
mod tests;
