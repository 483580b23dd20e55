use crate::{
    config::options::ResizeTo,
    foundation::core::Size,
    foundation::error::{GifError, GifResult},
    raster::frame::Frame,
};

/// Resolve the output canvas for a set of top-level sources.
///
/// Explicit axes are used as given. Missing axes are reduced over each source's natural
/// size (page height for multi-page sources) with max for [`ResizeTo::Largest`] and min for
/// [`ResizeTo::Smallest`].
#[tracing::instrument(skip(sources), fields(sources = sources.len()))]
pub fn resolve_canvas(
    sources: &[Frame],
    width: Option<u32>,
    height: Option<u32>,
    policy: ResizeTo,
) -> GifResult<Size> {
    let sizes: Vec<Size> = sources
        .iter()
        .map(|s| s.metadata().natural_size())
        .collect();
    resolve_canvas_from_sizes(&sizes, width, height, policy)
}

pub fn resolve_canvas_from_sizes(
    sizes: &[Size],
    width: Option<u32>,
    height: Option<u32>,
    policy: ResizeTo,
) -> GifResult<Size> {
    if let (Some(width), Some(height)) = (width, height) {
        return Ok(Size::new(width, height));
    }

    let reduce = |axis: fn(&Size) -> u32| -> Option<u32> {
        let values = sizes.iter().map(axis);
        match policy {
            ResizeTo::Largest => values.max(),
            ResizeTo::Smallest => values.min(),
        }
    };

    let width = width.or_else(|| reduce(|s| s.width));
    let height = height.or_else(|| reduce(|s| s.height));
    match (width, height) {
        (Some(width), Some(height)) => {
            let size = Size::new(width, height);
            tracing::debug!(%size, ?policy, "resolved canvas");
            Ok(size)
        }
        _ => Err(GifError::validation(
            "cannot resolve canvas size: no frames and no explicit width/height",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/canvas.rs"]
mod tests;
