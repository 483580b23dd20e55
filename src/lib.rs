//! animgif assembles still and animated images into a single animated GIF, and splits
//! existing animations back into frames.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: multi-page sources (animated GIF/PNG/WebP) are split into single frames
//! 2. **Resolve canvas**: one output size, from explicit dimensions or the largest/smallest source
//! 3. **Align**: every frame is zoomed, or padded/cropped around its center, to the canvas
//! 4. **Quantize**: each frame gets its own palette (`color_quant` NeuQuant by default)
//! 5. **Encode**: frames are written in order through an [`AnimationEncoder`], reporting
//!    [`Progress`] after each write
//!
//! Frames are processed strictly one after another; only the per-pixel palette mapping inside a
//! single frame runs in parallel.
//!
//! # Getting started
//!
//! Build a [`Gif`] from [`GifOptions`], add frames, and call [`Gif::to_buffer`]. Use
//! [`GifReader`] to decompose an existing animation and recompose it with new options.
#![forbid(unsafe_code)]

mod assembly;
mod config;
mod encode;
mod foundation;
mod palette;
mod pipeline;
mod raster;

pub use assembly::gif::{Gif, create_gif};
pub use assembly::reader::{GifReader, read_gif};
pub use config::options::{
    ColorFormat, Delay, EncoderOptions, Filter, FitMode, FrameOverrides, GifOptions,
    QuantizeOptions, REPEAT_FOREVER_SENTINEL, RawOptions, ResizeOptions, ResizeTo, ResizeType,
};
pub use encode::gif::{AnimationEncoder, FrameWriteOptions, GifEncoder, delay_centis, gif_repeat};
pub use encode::orchestrator::{EncoderSlot, FrameSettings, encode_frames};
pub use foundation::core::{GIF_MAX_DIMENSION, Progress, Rect, Rgba8, Size};
pub use foundation::error::{GifError, GifResult};
pub use palette::bridge::{IndexedFrame, PaletteSettings, quantize_frame};
pub use palette::quantizer::{
    MAX_PALETTE_LEN, NeuQuantizer, Palette, Quantizer, prepare_pixel, reduce_to_format,
};
pub use pipeline::align::{Alignment, AxisFit, align_frame, axis_fit, plan_crop_or_extend};
pub use pipeline::canvas::{resolve_canvas, resolve_canvas_from_sizes};
pub use pipeline::normalize::{split_all, split_frames};
pub use raster::frame::{Frame, FrameMeta, Padding};
