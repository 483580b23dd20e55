use color_quant::NeuQuant;
use rayon::prelude::*;

use crate::{
    config::options::{ColorFormat, QuantizeOptions},
    foundation::core::Rgba8,
    foundation::error::{GifError, GifResult},
};

/// Maximum number of entries a GIF color table can hold.
pub const MAX_PALETTE_LEN: usize = 256;

/// Bounded color table for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgba8>,
}

impl Palette {
    pub fn new(entries: Vec<Rgba8>) -> GifResult<Self> {
        if entries.is_empty() || entries.len() > MAX_PALETTE_LEN {
            return Err(GifError::quantize(format!(
                "palette must hold 1..={MAX_PALETTE_LEN} colors, got {}",
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Rgba8] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with zero alpha.
    pub fn transparent_index(&self) -> Option<u8> {
        self.entries
            .iter()
            .position(|e| e[3] == 0)
            .map(|i| i as u8)
    }

    /// Flat `[r, g, b, r, g, b, ..]` table as written into a GIF color table.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|&[r, g, b, _]| [r, g, b])
            .collect()
    }
}

/// Palette construction and pixel-to-index mapping.
///
/// Both operations take interleaved RGBA8 pixels and must agree on `format`.
pub trait Quantizer: Send + Sync {
    fn build_palette(
        &self,
        rgba: &[u8],
        max_colors: usize,
        format: ColorFormat,
        opts: &QuantizeOptions,
    ) -> GifResult<Palette>;

    /// One index per pixel, each valid for `palette`. `opts` must match the options the
    /// palette was built with.
    fn map_to_indices(
        &self,
        rgba: &[u8],
        palette: &Palette,
        format: ColorFormat,
        opts: &QuantizeOptions,
    ) -> GifResult<Vec<u8>>;
}

/// [`Quantizer`] backed by the NeuQuant neural-network quantizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeuQuantizer;

impl Quantizer for NeuQuantizer {
    fn build_palette(
        &self,
        rgba: &[u8],
        max_colors: usize,
        format: ColorFormat,
        opts: &QuantizeOptions,
    ) -> GifResult<Palette> {
        check_rgba(rgba)?;
        if rgba.is_empty() {
            return Err(GifError::quantize("cannot build a palette for an empty frame"));
        }

        let prepared: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| prepare_pixel([px[0], px[1], px[2], px[3]], format, opts))
            .collect();

        let colors = max_colors.clamp(2, MAX_PALETTE_LEN);
        let nq = NeuQuant::new(opts.sample_factor.clamp(1, 30), colors, &prepared);
        let entries = nq
            .color_map_rgba()
            .chunks_exact(4)
            .map(|c| reduce_to_format([c[0], c[1], c[2], c[3]], format))
            .collect();
        Palette::new(entries)
    }

    fn map_to_indices(
        &self,
        rgba: &[u8],
        palette: &Palette,
        format: ColorFormat,
        opts: &QuantizeOptions,
    ) -> GifResult<Vec<u8>> {
        check_rgba(rgba)?;
        if palette.is_empty() || palette.len() > MAX_PALETTE_LEN {
            return Err(GifError::quantize(format!(
                "cannot map onto a palette of {} colors",
                palette.len()
            )));
        }

        // Fully transparent pixels share one entry so a single GIF transparent index covers them.
        let clear = if format.has_alpha() {
            palette.transparent_index()
        } else {
            None
        };
        Ok(rgba
            .par_chunks_exact(4)
            .map(|px| {
                let key = prepare_pixel([px[0], px[1], px[2], px[3]], format, opts);
                match clear {
                    Some(i) if key[3] == 0 => i,
                    _ => nearest_index(palette.entries(), key, format.has_alpha()),
                }
            })
            .collect())
    }
}

fn check_rgba(rgba: &[u8]) -> GifResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(GifError::quantize(format!(
            "pixel buffer length {} is not a multiple of 4",
            rgba.len()
        )));
    }
    Ok(())
}

/// Apply alpha clearing and one-bit alpha, then reduce to the format's precision.
///
/// Alpha handling only runs for formats that keep alpha; RGB formats ignore the channel.
pub fn prepare_pixel(px: Rgba8, format: ColorFormat, opts: &QuantizeOptions) -> Rgba8 {
    if !format.has_alpha() {
        return reduce_to_format(px, format);
    }
    let [mut r, mut g, mut b, mut a] = px;
    if opts.clear_alpha && a <= opts.clear_alpha_threshold {
        r = opts.clear_alpha_color;
        g = opts.clear_alpha_color;
        b = opts.clear_alpha_color;
        a = 0;
    } else if let Some(threshold) = opts.one_bit_alpha {
        a = if a <= threshold { 0 } else { 255 };
    }
    reduce_to_format([r, g, b, a], format)
}

/// Truncate each channel to the bits kept by `format`. Alpha is forced opaque for RGB formats.
pub fn reduce_to_format(px: Rgba8, format: ColorFormat) -> Rgba8 {
    let bits = format.channel_bits();
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = if bits[c] == 0 {
            255
        } else {
            reduce_channel(px[c], bits[c])
        };
    }
    out
}

/// Keep the top `bits` of `v` and replicate them into the low bits.
fn reduce_channel(v: u8, bits: u8) -> u8 {
    debug_assert!((4..=8).contains(&bits));
    let q = v >> (8 - bits);
    (q << (8 - bits)) | (q >> (2 * bits - 8))
}

fn nearest_index(entries: &[Rgba8], px: Rgba8, with_alpha: bool) -> u8 {
    let channels = if with_alpha { 4 } else { 3 };
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, entry) in entries.iter().enumerate() {
        let dist: u32 = (0..channels)
            .map(|c| {
                let d = i32::from(px[c]) - i32::from(entry[c]);
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best = i;
            best_dist = dist;
            if dist == 0 {
                break;
            }
        }
    }
    best as u8
}

#[cfg(test)]
#[path = "../../tests/unit/palette/quantizer.rs"]
mod tests;
