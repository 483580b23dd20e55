use std::{io::Cursor, path::Path};

use anyhow::Context as _;
use image::{
    AnimationDecoder, DynamicImage, ImageFormat, Rgba, RgbaImage,
    codecs::{gif::GifDecoder, png::PngDecoder, webp::WebPDecoder},
};

use crate::config::options::{FitMode, RawOptions, ResizeOptions};
use crate::foundation::core::{Rect, Rgba8, Size};
use crate::foundation::error::{GifError, GifResult};

/// Intrinsic size and page layout of a [`Frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMeta {
    pub width: u32,
    pub height: u32,
    /// Page count, reported only for multi-page sources.
    pub pages: Option<u32>,
    /// Height of one page, reported only for multi-page sources.
    pub page_height: Option<u32>,
}

impl FrameMeta {
    pub fn page_count(&self) -> u32 {
        self.pages.unwrap_or(1)
    }

    /// Size of a single page (the full size for still sources).
    pub fn natural_size(&self) -> Size {
        Size::new(self.width, self.page_height.unwrap_or(self.height))
    }
}

/// Padding in pixels added around a frame by [`Frame::extend`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// An image handle moving through the pipeline.
///
/// A handle is either a single still, or a multi-page source whose pages are stacked
/// vertically (`pages * page_height == height`). Geometric operations mutate the handle in
/// place and treat it as a single still afterwards.
#[derive(Clone, Debug)]
pub struct Frame {
    image: DynamicImage,
    pages: u32,
    page_height: u32,
    delays: Option<Vec<u32>>,
    loop_count: Option<u16>,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        let page_height = image.height();
        Self {
            image,
            pages: 1,
            page_height,
            delays: None,
            loop_count: None,
        }
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::new(DynamicImage::ImageRgba8(image))
    }

    /// Stack equally sized pages into one multi-page handle.
    ///
    /// `delays` are per-page display times in milliseconds.
    pub fn from_pages(pages: Vec<RgbaImage>, delays: Option<Vec<u32>>) -> GifResult<Self> {
        let Some(first) = pages.first() else {
            return Err(GifError::validation("a multi-page frame needs at least one page"));
        };
        let (width, page_height) = first.dimensions();
        if let Some(bad) = pages.iter().find(|p| p.dimensions() != (width, page_height)) {
            return Err(GifError::validation(format!(
                "page size mismatch: got {}x{}, expected {width}x{page_height}",
                bad.width(),
                bad.height()
            )));
        }

        let count = pages.len() as u32;
        let total_height = page_height.checked_mul(count).ok_or_else(|| {
            GifError::validation(format!("{count} pages of height {page_height} overflow"))
        })?;

        let mut stacked = RgbaImage::new(width, total_height);
        for (i, page) in pages.iter().enumerate() {
            image::imageops::replace(&mut stacked, page, 0, i64::from(page_height) * i as i64);
        }

        Ok(Self {
            image: DynamicImage::ImageRgba8(stacked),
            pages: count,
            page_height,
            delays,
            loop_count: None,
        })
    }

    /// Decode an encoded image. Animated GIF, PNG and WebP sources become multi-page handles.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> GifResult<Self> {
        let format = image::guess_format(bytes).context("detect image format")?;

        let frames = match format {
            ImageFormat::Gif => {
                let decoder = GifDecoder::new(Cursor::new(bytes)).context("read gif header")?;
                Some(decoder.into_frames())
            }
            ImageFormat::Png => {
                let decoder = PngDecoder::new(Cursor::new(bytes)).context("read png header")?;
                if decoder.is_apng().context("inspect png animation")? {
                    Some(decoder.apng().context("read apng")?.into_frames())
                } else {
                    None
                }
            }
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(Cursor::new(bytes)).context("read webp header")?;
                if decoder.has_animation() {
                    Some(decoder.into_frames())
                } else {
                    None
                }
            }
            _ => None,
        };

        let Some(frames) = frames else {
            let image = image::load_from_memory_with_format(bytes, format)
                .with_context(|| format!("decode {format:?} image"))?;
            return Ok(Self::new(image));
        };

        let frames = frames
            .collect_frames()
            .map_err(|e| GifError::decode(format!("decode animation frames: {e}")))?;
        if frames.is_empty() {
            return Err(GifError::decode("animation contains no frames"));
        }

        let mut delays = Vec::with_capacity(frames.len());
        let mut pages = Vec::with_capacity(frames.len());
        for frame in frames {
            let (numer, denom) = frame.delay().numer_denom_ms();
            delays.push(if denom == 0 { 0 } else { numer / denom });
            pages.push(frame.into_buffer());
        }
        tracing::debug!(pages = pages.len(), "decoded animated source");
        Self::from_pages(pages, Some(delays))
    }

    pub fn open(path: impl AsRef<Path>) -> GifResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    pub fn metadata(&self) -> FrameMeta {
        let multi = self.pages > 1;
        FrameMeta {
            width: self.image.width(),
            height: self.image.height(),
            pages: multi.then_some(self.pages),
            page_height: multi.then_some(self.page_height),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Per-page delays in milliseconds, when the source carried timing.
    pub fn delays(&self) -> Option<&[u32]> {
        self.delays.as_deref()
    }

    /// Loop count attached to an assembled animation (`0` loops forever).
    pub fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    pub fn with_animation_meta(mut self, loop_count: u16, delays: Option<Vec<u32>>) -> Self {
        self.loop_count = Some(loop_count);
        self.delays = delays;
        self
    }

    fn make_still(&mut self) {
        self.pages = 1;
        self.page_height = self.image.height();
        self.delays = None;
    }

    /// Copy a rectangular region into a new handle.
    pub fn extracted(&self, rect: Rect) -> GifResult<Frame> {
        self.check_region(rect)?;
        Ok(Self::new(
            self.image
                .crop_imm(rect.left, rect.top, rect.width, rect.height),
        ))
    }

    /// Replace this handle with a rectangular region of itself.
    pub fn extract(&mut self, rect: Rect) -> GifResult<()> {
        self.check_region(rect)?;
        self.image = self
            .image
            .crop_imm(rect.left, rect.top, rect.width, rect.height);
        self.make_still();
        Ok(())
    }

    fn check_region(&self, rect: Rect) -> GifResult<()> {
        if rect.width == 0 || rect.height == 0 || !rect.fits_within(self.size()) {
            return Err(GifError::validation(format!(
                "extract region {}x{}+{}+{} is outside the {} image",
                rect.width,
                rect.height,
                rect.left,
                rect.top,
                self.size()
            )));
        }
        Ok(())
    }

    /// Rescale to exactly `size`.
    pub fn resize(&mut self, size: Size, opts: &ResizeOptions) -> GifResult<()> {
        if size.width == 0 || size.height == 0 {
            return Err(GifError::validation(format!("cannot resize to {size}")));
        }
        let filter = opts.filter.to_filter_type();
        self.image = match opts.fit.normalized() {
            FitMode::Fill => self.image.resize_exact(size.width, size.height, filter),
            FitMode::Cover => self.image.resize_to_fill(size.width, size.height, filter),
            _ => {
                let scaled = self.image.resize(size.width, size.height, filter);
                let mut canvas =
                    RgbaImage::from_pixel(size.width, size.height, Rgba(opts.background));
                let x = (size.width - scaled.width().min(size.width)) / 2;
                let y = (size.height - scaled.height().min(size.height)) / 2;
                image::imageops::overlay(&mut canvas, &scaled.to_rgba8(), x.into(), y.into());
                DynamicImage::ImageRgba8(canvas)
            }
        };
        self.make_still();
        Ok(())
    }

    /// Add `pad` pixels around the image, filled with `background`.
    pub fn extend(&mut self, pad: Padding, background: Rgba8) -> GifResult<()> {
        let (w, h) = (self.image.width(), self.image.height());
        let width = w
            .checked_add(pad.left)
            .and_then(|v| v.checked_add(pad.right))
            .ok_or_else(|| GifError::validation("extended width overflows"))?;
        let height = h
            .checked_add(pad.top)
            .and_then(|v| v.checked_add(pad.bottom))
            .ok_or_else(|| GifError::validation("extended height overflows"))?;

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(background));
        image::imageops::replace(
            &mut canvas,
            &self.image.to_rgba8(),
            pad.left.into(),
            pad.top.into(),
        );
        self.image = DynamicImage::ImageRgba8(canvas);
        self.make_still();
        Ok(())
    }

    /// Add an alpha channel set to `fill` if the image has none.
    pub fn ensure_alpha(&mut self, fill: u8) {
        if self.image.color().has_alpha() {
            return;
        }
        let mut rgba = self.image.to_rgba8();
        for px in rgba.pixels_mut() {
            px[3] = fill;
        }
        self.image = DynamicImage::ImageRgba8(rgba);
    }

    /// Interleaved RGBA8 pixels, row-major.
    pub fn raw_pixels(&self, opts: &RawOptions) -> Vec<u8> {
        let mut raw = self.image.to_rgba8().into_raw();
        if opts.premultiplied {
            premultiply_rgba8_in_place(&mut raw);
        }
        raw
    }

    /// Encode the handle as PNG bytes.
    pub fn reencode_lossless(&self) -> GifResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        match &self.image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba16(self.image.to_rgba16())
                    .write_to(&mut out, ImageFormat::Png)
            }
            other => other.write_to(&mut out, ImageFormat::Png),
        }
        .context("encode png")?;
        Ok(out.into_inner())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> GifResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let bytes = self.reencode_lossless()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl From<RgbaImage> for Frame {
    fn from(image: RgbaImage) -> Self {
        Self::from_rgba(image)
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/frame.rs"]
mod tests;
