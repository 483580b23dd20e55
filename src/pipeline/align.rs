use crate::{
    config::options::{GifOptions, ResizeOptions, ResizeType},
    foundation::core::{Rect, Rgba8, Size},
    foundation::error::GifResult,
    raster::frame::{Frame, Padding},
};

/// How frames are conformed to the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Rescale the whole frame. The fit mode is always one that yields the exact size.
    Zoom(ResizeOptions),
    /// Pad symmetrically or crop around the center, per axis.
    CropOrExtend { background: Rgba8 },
}

impl Alignment {
    pub fn from_options(opts: &GifOptions) -> Self {
        match opts.resize_type {
            ResizeType::Zoom => Self::Zoom(opts.resize_options.clone().normalized()),
            ResizeType::Crop => Self::CropOrExtend {
                background: opts.extend_background,
            },
        }
    }
}

/// Adjustment along one axis for crop-or-extend alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisFit {
    Keep,
    /// Pad `before` (left/top) and `after` (right/bottom). An odd difference puts the extra
    /// pixel after.
    Pad { before: u32, after: u32 },
    /// Keep `target` pixels starting at `offset`.
    Crop { offset: u32 },
}

pub fn axis_fit(current: u32, target: u32) -> AxisFit {
    let diff = current.abs_diff(target);
    let half = diff / 2;
    match current.cmp(&target) {
        std::cmp::Ordering::Equal => AxisFit::Keep,
        std::cmp::Ordering::Less => AxisFit::Pad {
            before: half,
            after: diff - half,
        },
        std::cmp::Ordering::Greater => AxisFit::Crop { offset: half },
    }
}

/// Width and height adjustments that take `current` to `canvas`.
pub fn plan_crop_or_extend(current: Size, canvas: Size) -> (AxisFit, AxisFit) {
    (
        axis_fit(current.width, canvas.width),
        axis_fit(current.height, canvas.height),
    )
}

/// Conform `frame` to exactly `canvas`, in place. No-op when the sizes already match.
#[tracing::instrument(skip(frame, alignment), fields(from = %frame.size()))]
pub fn align_frame(frame: &mut Frame, canvas: Size, alignment: &Alignment) -> GifResult<()> {
    if frame.size() == canvas {
        return Ok(());
    }

    match alignment {
        Alignment::Zoom(resize) => frame.resize(canvas, resize)?,
        Alignment::CropOrExtend { background } => {
            let (x, y) = plan_crop_or_extend(frame.size(), canvas);
            match x {
                AxisFit::Keep => {}
                AxisFit::Pad { before, after } => frame.extend(
                    Padding {
                        left: before,
                        right: after,
                        ..Padding::default()
                    },
                    *background,
                )?,
                AxisFit::Crop { offset } => {
                    let height = frame.size().height;
                    frame.extract(Rect::new(offset, 0, canvas.width, height))?
                }
            }
            match y {
                AxisFit::Keep => {}
                AxisFit::Pad { before, after } => frame.extend(
                    Padding {
                        top: before,
                        bottom: after,
                        ..Padding::default()
                    },
                    *background,
                )?,
                AxisFit::Crop { offset } => {
                    let width = frame.size().width;
                    frame.extract(Rect::new(0, offset, width, canvas.height))?
                }
            }
        }
    }

    debug_assert_eq!(frame.size(), canvas, "alignment must produce the canvas size");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/align.rs"]
mod tests;
