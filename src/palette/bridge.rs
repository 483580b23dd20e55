use crate::{
    config::options::{ColorFormat, GifOptions, QuantizeOptions, RawOptions},
    foundation::core::Size,
    foundation::error::{GifError, GifResult},
    palette::quantizer::{Palette, Quantizer},
    raster::frame::Frame,
};

/// A frame reduced to palette indices, ready for the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    pub size: Size,
    /// One palette index per pixel, row-major; `len == width * height`.
    pub indices: Vec<u8>,
    pub palette: Palette,
}

/// Quantization settings shared by every frame of one encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteSettings {
    pub max_colors: usize,
    pub format: ColorFormat,
    pub raw: RawOptions,
    pub quantize: QuantizeOptions,
}

impl PaletteSettings {
    pub fn from_options(opts: &GifOptions) -> Self {
        Self {
            max_colors: usize::from(opts.max_colors),
            format: opts.effective_format(),
            raw: opts.raw_options.clone(),
            quantize: opts.quantize_options.clone(),
        }
    }
}

/// Build a palette for one aligned frame and map its pixels onto it.
///
/// The frame is consumed; every frame gets its own palette.
#[tracing::instrument(skip_all, fields(size = %frame.size()))]
pub fn quantize_frame(
    mut frame: Frame,
    settings: &PaletteSettings,
    quantizer: &dyn Quantizer,
) -> GifResult<IndexedFrame> {
    frame.ensure_alpha(settings.raw.alpha_fill);
    let size = frame.size();
    let rgba = frame.raw_pixels(&settings.raw);

    let palette = quantizer.build_palette(
        &rgba,
        settings.max_colors,
        settings.format,
        &settings.quantize,
    )?;
    let indices = quantizer.map_to_indices(&rgba, &palette, settings.format, &settings.quantize)?;

    if indices.len() != size.area() {
        return Err(GifError::quantize(format!(
            "index buffer has {} entries, expected {} for {size}",
            indices.len(),
            size.area()
        )));
    }
    tracing::trace!(colors = palette.len(), "quantized frame");

    Ok(IndexedFrame {
        size,
        indices,
        palette,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/palette/bridge.rs"]
mod tests;
