use crate::classify;
use crate::error::{LensError, LensResult};
use crate::format::PixelLayout;

/// A read-only view of one memory plane of a caller-owned frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane<'a> {
    /// Raw plane bytes.
    pub data: &'a [u8],
    /// Bytes per row, including any padding.
    pub row_stride: usize,
}

impl<'a> Plane<'a> {
    pub fn new(data: &'a [u8], row_stride: usize) -> Self {
        Self { data, row_stride }
    }
}

/// One input frame as handed over by the caller.
///
/// The buffer only borrows plane memory: the caller keeps ownership and must not
/// mutate the planes until the push call that receives this buffer returns.
/// Construction does not validate the plane count against the layout; that
/// happens in [`PixelBuffer::validate`], which the player runs before anything
/// reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout tag.
    pub layout: PixelLayout,
    planes: Vec<Plane<'a>>,
}

impl<'a> PixelBuffer<'a> {
    /// Create a buffer from arbitrary planes.
    pub fn new(width: u32, height: u32, layout: PixelLayout, planes: Vec<Plane<'a>>) -> Self {
        Self {
            width,
            height,
            layout,
            planes,
        }
    }

    /// A packed 8-bit frame with tightly packed rows.
    pub fn packed(width: u32, height: u32, layout: PixelLayout, data: &'a [u8]) -> Self {
        let stride = width as usize * classify::pixel_format(layout).bytes_per_pixel();
        Self::new(width, height, layout, vec![Plane::new(data, stride)])
    }

    /// A semi-planar frame: luma plus interleaved chroma.
    pub fn nv12(width: u32, height: u32, layout: PixelLayout, y: &'a [u8], uv: &'a [u8]) -> Self {
        let stride = width as usize;
        Self::new(
            width,
            height,
            layout,
            vec![Plane::new(y, stride), Plane::new(uv, stride)],
        )
    }

    /// A fully planar frame: luma plus two chroma planes.
    pub fn i420(
        width: u32,
        height: u32,
        layout: PixelLayout,
        y: &'a [u8],
        u: &'a [u8],
        v: &'a [u8],
    ) -> Self {
        let stride = width as usize;
        let chroma_stride = stride.div_ceil(2);
        Self::new(
            width,
            height,
            layout,
            vec![
                Plane::new(y, stride),
                Plane::new(u, chroma_stride),
                Plane::new(v, chroma_stride),
            ],
        )
    }

    pub fn planes(&self) -> &[Plane<'a>] {
        &self.planes
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Plane at `index`, `None` when out of range.
    pub fn plane(&self, index: usize) -> Option<&Plane<'a>> {
        self.planes.get(index)
    }

    /// Check that the layout is known, the plane count matches it and the
    /// dimensions are positive.
    pub fn validate(&self) -> LensResult<()> {
        if !self.layout.is_known() {
            return Err(LensError::UnsupportedLayout {
                raw: self.layout.raw(),
            });
        }
        if self.planes.len() != self.layout.plane_count() {
            return Err(LensError::plane_mismatch(self.layout, self.planes.len()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(LensError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_buffer() {
        let data = vec![0u8; 4 * 3 * 2];
        let buf = PixelBuffer::packed(4, 2, PixelLayout::Bpc8Rgb, &data);
        assert_eq!(buf.plane_count(), 1);
        assert_eq!(buf.plane(0).unwrap().row_stride, 12);
        assert!(buf.validate().is_ok());
    }

    #[test]
    fn test_packed_stride_follows_channel_order() {
        let data = vec![0u8; 4 * 4 * 2];
        for (layout, stride) in [
            (PixelLayout::Bpc8Bgr, 12),
            (PixelLayout::Bpc8Rgba, 16),
            (PixelLayout::Bpc8Argb, 16),
            (PixelLayout::Other(2), 16),
        ] {
            let buf = PixelBuffer::packed(4, 2, layout, &data);
            assert_eq!(buf.plane(0).unwrap().row_stride, stride, "{layout}");
        }
    }

    #[test]
    fn test_i420_chroma_stride_rounds_up() {
        let (y, u, v) = (vec![0u8; 15], vec![0u8; 6], vec![0u8; 6]);
        let buf = PixelBuffer::i420(5, 3, PixelLayout::I420Bt709Video, &y, &u, &v);
        assert_eq!(buf.plane(1).unwrap().row_stride, 3);
        assert!(buf.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_plane_mismatch() {
        let y = vec![0u8; 16];
        let buf = PixelBuffer::new(
            4,
            4,
            PixelLayout::Nv12Bt601Full,
            vec![Plane::new(&y, 4)],
        );
        assert!(matches!(
            buf.validate(),
            Err(LensError::PlaneCountMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(buf.plane(1).is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_layout() {
        let data = vec![0u8; 4];
        let buf = PixelBuffer::packed(1, 1, PixelLayout::Other(77), &data);
        assert!(matches!(
            buf.validate(),
            Err(LensError::UnsupportedLayout { raw: 77 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let data = vec![0u8; 0];
        let buf = PixelBuffer::packed(0, 4, PixelLayout::Bpc8Rgba, &data);
        assert!(matches!(
            buf.validate(),
            Err(LensError::InvalidDimensions {
                width: 0,
                height: 4,
            })
        ));
    }
}
