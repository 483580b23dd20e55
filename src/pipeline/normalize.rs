use crate::{
    foundation::core::Rect,
    foundation::error::{GifError, GifResult},
    raster::frame::Frame,
};

/// Split a source into independent single-page frames, in page order.
///
/// Multi-page sources are re-encoded losslessly once, then each page is extracted at
/// `top = page_height * i`. Single-page sources are returned unchanged.
#[tracing::instrument(skip(source))]
pub fn split_frames(source: &Frame) -> GifResult<Vec<Frame>> {
    let meta = source.metadata();
    let pages = meta.page_count();
    let page_height = meta.page_height.unwrap_or(meta.height);

    if pages <= 1 || page_height == 0 {
        return Ok(vec![source.clone()]);
    }

    let intermediate = Frame::decode(&source.reencode_lossless()?)?;
    if intermediate.size() != source.size() {
        return Err(GifError::decode(format!(
            "lossless intermediate changed size from {} to {}",
            source.size(),
            intermediate.size()
        )));
    }

    let frames = (0..pages)
        .map(|i| intermediate.extracted(Rect::new(0, page_height * i, meta.width, page_height)))
        .collect::<GifResult<Vec<_>>>()?;
    tracing::debug!(pages, page_height, "split multi-page source");
    Ok(frames)
}

/// Split every source and concatenate the results, preserving source order.
pub fn split_all(sources: &[Frame]) -> GifResult<Vec<Frame>> {
    let mut out = Vec::with_capacity(sources.len());
    for source in sources {
        out.extend(split_frames(source)?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/normalize.rs"]
mod tests;
