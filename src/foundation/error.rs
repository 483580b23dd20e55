use crate::foundation::core::Size;

/// Result alias for every fallible animgif operation.
pub type GifResult<T> = Result<T, GifError>;

/// Failures surfaced by the assembly pipeline and its collaborators.
///
/// Collaborator failures are never retried; an encode either completes or returns one of these.
#[derive(thiserror::Error, Debug)]
pub enum GifError {
    /// Options or frame data rejected before any encoding.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame source could not be decoded or re-encoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Palette construction or index mapping failed.
    #[error("quantize error: {0}")]
    Quantize(String),

    /// The GIF stream could not be written.
    #[error("encode error: {0}")]
    Encode(String),

    /// A frame reached the encoder at a size other than the canvas.
    #[error("frame {index} is {actual}, but the canvas is {canvas}")]
    CanvasMismatch {
        index: usize,
        actual: Size,
        canvas: Size,
    },

    /// A frame was written after the encoder emitted its terminator.
    #[error("gif encoder is already finalized after {frames} frames; reset it to start over")]
    EncoderFinalized { frames: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn quantize(msg: impl Into<String>) -> Self {
        Self::Quantize(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// `true` for errors caused by the caller's options or inputs rather than a collaborator.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::CanvasMismatch { .. } | Self::EncoderFinalized { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
