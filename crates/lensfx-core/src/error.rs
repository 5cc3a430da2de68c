/// Core error types for the LensFX effect player.
use crate::format::PixelLayout;

/// A specialized Result type for LensFX operations.
pub type LensResult<T> = Result<T, LensError>;

/// Top-level error type shared by the player crates.
#[derive(Debug, thiserror::Error)]
pub enum LensError {
    #[error("effect manager not initialized")]
    NoEffectManager,

    #[error("effect not loaded")]
    NoEffectLoaded,

    #[error("unsupported pixel layout (raw code {raw})")]
    UnsupportedLayout { raw: u32 },

    #[error("pixel layout {layout} expects {expected} plane(s), buffer has {actual}")]
    PlaneCountMismatch {
        layout: PixelLayout,
        expected: usize,
        actual: usize,
    },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("engine creation failed: {0}")]
    EngineCreation(String),

    #[error("draw timed out after {attempts} attempt(s)")]
    DrawTimedOut { attempts: u64 },

    #[error("draw cancelled after {attempts} attempt(s)")]
    DrawCancelled { attempts: u64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LensError {
    /// Create a plane-count mismatch error for a layout.
    pub fn plane_mismatch(layout: PixelLayout, actual: usize) -> Self {
        LensError::PlaneCountMismatch {
            layout,
            expected: layout.plane_count(),
            actual,
        }
    }

    /// Returns true if the error means the frame never reached the engine.
    pub fn is_dropped_frame(&self) -> bool {
        matches!(
            self,
            LensError::UnsupportedLayout { .. }
                | LensError::PlaneCountMismatch { .. }
                | LensError::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_errors_are_distinct() {
        assert_eq!(
            LensError::NoEffectManager.to_string(),
            "effect manager not initialized"
        );
        assert_eq!(LensError::NoEffectLoaded.to_string(), "effect not loaded");
    }

    #[test]
    fn test_plane_mismatch_display() {
        let err = LensError::plane_mismatch(PixelLayout::I420Bt601Full, 2);
        assert_eq!(
            err.to_string(),
            "pixel layout i420_bt601_full expects 3 plane(s), buffer has 2"
        );
        assert!(err.is_dropped_frame());
    }

    #[test]
    fn test_dropped_frame_errors() {
        assert!(LensError::UnsupportedLayout { raw: 99 }.is_dropped_frame());
        let zero_sized = LensError::InvalidDimensions {
            width: 0,
            height: 1080,
        };
        assert!(zero_sized.is_dropped_frame());
        assert!(!LensError::NoEffectLoaded.is_dropped_frame());
    }
}
