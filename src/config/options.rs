//! Caller-facing configuration for one assembly.
//!
//! Every recognized option is a field with a documented default. Options are validated once
//! when a [`Gif`](crate::Gif) is constructed; the pipeline stages only read them.

use image::imageops::FilterType;

use crate::foundation::core::{GIF_MAX_DIMENSION, Rgba8};
use crate::foundation::error::{GifError, GifResult};

/// Internal repeat sentinel written for a configured repeat of `1`.
pub const REPEAT_FOREVER_SENTINEL: i32 = -1;

/// Per-frame delay in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Delay {
    /// One delay applied to every frame.
    Uniform(u32),
    /// Delays by frame position. Positions past the end fall back to the encoder default.
    PerFrame(Vec<u32>),
}

impl Delay {
    /// Delay override for the frame at `position`, if any.
    pub fn at(&self, position: usize) -> Option<u32> {
        match self {
            Self::Uniform(ms) => Some(*ms),
            Self::PerFrame(list) => list.get(position).copied(),
        }
    }

    /// Expand to one entry per frame, using `0` where no override exists.
    pub fn expand(&self, frames: usize) -> Vec<u32> {
        (0..frames).map(|i| self.at(i).unwrap_or(0)).collect()
    }
}

/// How the canvas size is reduced across all frame sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeTo {
    #[default]
    Largest,
    Smallest,
}

/// How each frame is conformed to the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeType {
    /// Rescale the whole frame.
    #[default]
    Zoom,
    /// Symmetric pad or centered crop, per axis.
    Crop,
}

/// Fit mode for zoom alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the canvas, cropping the overflow around the center.
    #[default]
    Cover,
    /// Scale to fit inside the canvas, letterboxing with the resize background.
    Contain,
    /// Stretch to the canvas, ignoring aspect ratio.
    Fill,
    /// Not exact; normalized to [`FitMode::Contain`].
    Inside,
    /// Not exact; normalized to [`FitMode::Contain`].
    Outside,
}

impl FitMode {
    /// Map fit modes that do not guarantee exact output dimensions onto `Contain`.
    pub fn normalized(self) -> Self {
        match self {
            Self::Inside | Self::Outside => Self::Contain,
            other => other,
        }
    }

    pub fn is_exact(self) -> bool {
        !matches!(self, Self::Inside | Self::Outside)
    }
}

/// Resampling filter used by zoom alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl Filter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Color packing format shared by palette construction and index mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Rgb565,
    Rgb444,
    Rgba4444,
}

impl ColorFormat {
    /// Significant bits kept per channel, in RGBA order. `0` means the channel is ignored.
    pub fn channel_bits(self) -> [u8; 4] {
        match self {
            Self::Rgb565 => [5, 6, 5, 0],
            Self::Rgb444 => [4, 4, 4, 0],
            Self::Rgba4444 => [4, 4, 4, 4],
        }
    }

    pub fn has_alpha(self) -> bool {
        self.channel_bits()[3] > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub fit: FitMode,
    pub filter: Filter,
    /// Letterbox color for [`FitMode::Contain`].
    pub background: Rgba8,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            fit: FitMode::Cover,
            filter: Filter::Lanczos3,
            background: [0, 0, 0, 255],
        }
    }
}

impl ResizeOptions {
    pub fn normalized(mut self) -> Self {
        self.fit = self.fit.normalized();
        self
    }
}

/// Raw pixel extraction settings for the palette bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawOptions {
    /// Premultiply color channels by alpha before quantization.
    pub premultiplied: bool,
    /// Alpha written when a frame has no alpha channel of its own.
    pub alpha_fill: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Initial byte capacity of the output stream.
    pub initial_capacity: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 4096,
        }
    }
}

/// Pass-through options for the quantizer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuantizeOptions {
    /// Overrides [`GifOptions::format`] for both palette building and index mapping.
    pub format: Option<ColorFormat>,
    /// Snap alpha to 0 or 255 around this threshold (`rgba4444` only).
    pub one_bit_alpha: Option<u8>,
    /// Replace the color of nearly transparent pixels with `clear_alpha_color`.
    pub clear_alpha: bool,
    pub clear_alpha_threshold: u8,
    pub clear_alpha_color: u8,
    /// NeuQuant sampling factor, 1 (best) to 30 (fastest).
    pub sample_factor: i32,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            format: None,
            one_bit_alpha: None,
            clear_alpha: true,
            clear_alpha_threshold: 0,
            clear_alpha_color: 0,
            sample_factor: 10,
        }
    }
}

/// Per-frame write overrides. Set fields win over the computed per-frame values,
/// except the palette, which is always the frame's own.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameOverrides {
    pub first: Option<bool>,
    pub transparent: Option<bool>,
    pub transparent_index: Option<u8>,
    pub delay: Option<u32>,
    pub repeat: Option<i32>,
    pub dispose: Option<u8>,
}

/// Options for one [`Gif`](crate::Gif) assembly.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifOptions {
    /// Output width; reduced across sources when unset.
    pub width: Option<u32>,
    /// Output height; reduced across sources when unset.
    pub height: Option<u32>,
    pub delay: Option<Delay>,
    /// `0` loops forever, `1` writes the forever sentinel, other values loop that many times.
    pub repeat: u16,
    /// Enable 1-bit transparency.
    pub transparent: bool,
    pub max_colors: u16,
    pub format: ColorFormat,
    pub resize_to: ResizeTo,
    pub resize_type: ResizeType,
    pub resize_options: ResizeOptions,
    /// Fill color for crop-or-extend padding.
    pub extend_background: Rgba8,
    pub raw_options: RawOptions,
    pub encoder_options: EncoderOptions,
    pub quantize_options: QuantizeOptions,
    pub frame_options: FrameOverrides,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            delay: None,
            repeat: 0,
            transparent: false,
            max_colors: 256,
            format: ColorFormat::Rgb565,
            resize_to: ResizeTo::Largest,
            resize_type: ResizeType::Zoom,
            resize_options: ResizeOptions::default(),
            extend_background: [0, 0, 0, 0],
            raw_options: RawOptions::default(),
            encoder_options: EncoderOptions::default(),
            quantize_options: QuantizeOptions::default(),
            frame_options: FrameOverrides::default(),
        }
    }
}

impl GifOptions {
    pub fn validate(&self) -> GifResult<()> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            match value {
                Some(0) => {
                    return Err(GifError::validation(format!("{axis} must be non-zero")));
                }
                Some(v) if v > GIF_MAX_DIMENSION => {
                    return Err(GifError::validation(format!(
                        "{axis} {v} exceeds GIF maximum {GIF_MAX_DIMENSION}"
                    )));
                }
                _ => {}
            }
        }
        if !(2..=256).contains(&self.max_colors) {
            return Err(GifError::validation(format!(
                "max_colors must be within 2..=256, got {}",
                self.max_colors
            )));
        }
        if !(1..=30).contains(&self.quantize_options.sample_factor) {
            return Err(GifError::validation(format!(
                "quantize sample_factor must be within 1..=30, got {}",
                self.quantize_options.sample_factor
            )));
        }
        if let Some(dispose) = self.frame_options.dispose
            && dispose > 7
        {
            return Err(GifError::validation(format!(
                "dispose method must be within 0..=7, got {dispose}"
            )));
        }
        Ok(())
    }

    /// Apply the documented option normalizations.
    ///
    /// Currently this rewrites the zoom fit modes `inside` and `outside` to `contain`.
    pub fn normalized(mut self) -> Self {
        self.resize_options = self.resize_options.normalized();
        self
    }

    /// Packing format used for both palette construction and index mapping.
    pub fn effective_format(&self) -> ColorFormat {
        self.quantize_options.format.unwrap_or(self.format)
    }

    /// Repeat value handed to the encoder on every frame write.
    pub fn encoder_repeat(&self) -> i32 {
        match self.repeat {
            1 => REPEAT_FOREVER_SENTINEL,
            n => i32::from(n),
        }
    }

    pub fn from_json_str(s: &str) -> GifResult<Self> {
        use anyhow::Context as _;
        let opts: Self = serde_json::from_str(s).context("parse gif options JSON")?;
        Ok(opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
