//! Format classification.
//!
//! Bridges the caller-facing [`PixelLayout`] tag to the engine's three
//! orthogonal descriptors. Every function here is total: unknown layouts and
//! layouts from the wrong family resolve to documented defaults instead of
//! failing.

use serde::Serialize;

use crate::format::{PixelLayout, PlaneStructure, Rotation};
use crate::image::{
    CameraOrientation, ColorRange, ColorStd, FrameFormat, PixelFormat, YuvFormat, YuvLayout,
};

/// Channel order for a packed layout. Anything else yields [`PixelFormat::Rgb`].
pub fn pixel_format(layout: PixelLayout) -> PixelFormat {
    match layout.canonical() {
        PixelLayout::Bpc8Bgr => PixelFormat::Bgr,
        PixelLayout::Bpc8Rgba => PixelFormat::Rgba,
        PixelLayout::Bpc8Bgra => PixelFormat::Bgra,
        PixelLayout::Bpc8Argb => PixelFormat::Argb,
        _ => PixelFormat::Rgb,
    }
}

/// Colorspace descriptor for a YUV layout.
///
/// BT.601 and full range are the defaults for unset sub-bits; anything outside
/// the YUV family yields NV12 / BT.601 / full.
pub fn yuv_format(layout: PixelLayout) -> YuvFormat {
    use ColorRange::{Full, Video};
    use ColorStd::{Bt601, Bt709};
    use YuvLayout::{I420, Nv12};

    let (range, standard, planes) = match layout.canonical() {
        PixelLayout::Nv12Bt601Full => (Full, Bt601, Nv12),
        PixelLayout::Nv12Bt601Video => (Video, Bt601, Nv12),
        PixelLayout::Nv12Bt709Full => (Full, Bt709, Nv12),
        PixelLayout::Nv12Bt709Video => (Video, Bt709, Nv12),
        PixelLayout::I420Bt601Full => (Full, Bt601, I420),
        PixelLayout::I420Bt601Video => (Video, Bt601, I420),
        PixelLayout::I420Bt709Full => (Full, Bt709, I420),
        PixelLayout::I420Bt709Video => (Video, Bt709, I420),
        _ => (Full, Bt601, Nv12),
    };
    YuvFormat::new(range, standard, planes)
}

/// Engine orientation for a buffer rotation.
pub fn camera_orientation(rotation: Rotation) -> CameraOrientation {
    match rotation {
        Rotation::Deg0 => CameraOrientation::Deg0,
        Rotation::Deg90 => CameraOrientation::Deg90,
        Rotation::Deg180 => CameraOrientation::Deg180,
        Rotation::Deg270 => CameraOrientation::Deg270,
    }
}

/// Size and orientation metadata for a frame.
pub fn frame_format(width: u32, height: u32, rotation: Rotation) -> FrameFormat {
    FrameFormat::new(width, height, camera_orientation(rotation))
}

/// Packed layout carrying a given channel order.
pub fn packed_layout(format: PixelFormat) -> PixelLayout {
    match format {
        PixelFormat::Rgb => PixelLayout::Bpc8Rgb,
        PixelFormat::Bgr => PixelLayout::Bpc8Bgr,
        PixelFormat::Rgba => PixelLayout::Bpc8Rgba,
        PixelFormat::Bgra => PixelLayout::Bpc8Bgra,
        PixelFormat::Argb => PixelLayout::Bpc8Argb,
    }
}

/// YUV layout carrying a given colorspace descriptor.
pub fn yuv_layout(format: YuvFormat) -> PixelLayout {
    use ColorRange::{Full, Video};
    use ColorStd::{Bt601, Bt709};
    use YuvLayout::{I420, Nv12};

    match (format.range, format.standard, format.layout) {
        (Full, Bt601, Nv12) => PixelLayout::Nv12Bt601Full,
        (Video, Bt601, Nv12) => PixelLayout::Nv12Bt601Video,
        (Full, Bt709, Nv12) => PixelLayout::Nv12Bt709Full,
        (Video, Bt709, Nv12) => PixelLayout::Nv12Bt709Video,
        (Full, Bt601, I420) => PixelLayout::I420Bt601Full,
        (Video, Bt601, I420) => PixelLayout::I420Bt601Video,
        (Full, Bt709, I420) => PixelLayout::I420Bt709Full,
        (Video, Bt709, I420) => PixelLayout::I420Bt709Video,
    }
}

/// Everything the classifier says about one layout tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub layout: PixelLayout,
    pub raw: u32,
    pub known: bool,
    pub planes: Option<PlaneStructure>,
    pub plane_count: usize,
    /// Channel order, present for packed layouts.
    pub pixel_format: Option<PixelFormat>,
    /// Colorspace descriptor, present for YUV layouts.
    pub yuv: Option<YuvFormat>,
}

/// Classify a layout tag.
pub fn classify(layout: PixelLayout) -> Classification {
    let layout = layout.canonical();
    Classification {
        layout,
        raw: layout.raw(),
        known: layout.is_known(),
        planes: layout.plane_structure(),
        plane_count: layout.plane_count(),
        pixel_format: layout.is_packed().then(|| pixel_format(layout)),
        yuv: layout.is_yuv().then(|| yuv_format(layout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_channel_orders() {
        assert_eq!(pixel_format(PixelLayout::Bpc8Rgb), PixelFormat::Rgb);
        assert_eq!(pixel_format(PixelLayout::Bpc8Bgr), PixelFormat::Bgr);
        assert_eq!(pixel_format(PixelLayout::Bpc8Rgba), PixelFormat::Rgba);
        assert_eq!(pixel_format(PixelLayout::Bpc8Bgra), PixelFormat::Bgra);
        assert_eq!(pixel_format(PixelLayout::Bpc8Argb), PixelFormat::Argb);
    }

    #[test]
    fn test_channel_order_fallback_is_rgb() {
        assert_eq!(pixel_format(PixelLayout::Other(1234)), PixelFormat::Rgb);
        assert_eq!(pixel_format(PixelLayout::Nv12Bt709Video), PixelFormat::Rgb);
    }

    #[test]
    fn test_yuv_table() {
        use ColorRange::{Full, Video};
        use ColorStd::{Bt601, Bt709};
        use YuvLayout::{I420, Nv12};

        let table = [
            (PixelLayout::Nv12Bt601Full, Full, Bt601, Nv12),
            (PixelLayout::Nv12Bt601Video, Video, Bt601, Nv12),
            (PixelLayout::Nv12Bt709Full, Full, Bt709, Nv12),
            (PixelLayout::Nv12Bt709Video, Video, Bt709, Nv12),
            (PixelLayout::I420Bt601Full, Full, Bt601, I420),
            (PixelLayout::I420Bt601Video, Video, Bt601, I420),
            (PixelLayout::I420Bt709Full, Full, Bt709, I420),
            (PixelLayout::I420Bt709Video, Video, Bt709, I420),
        ];
        for (layout, range, standard, planes) in table {
            let format = yuv_format(layout);
            assert_eq!(format, YuvFormat::new(range, standard, planes), "{layout}");
            assert_eq!(yuv_layout(format), layout);
        }
    }

    #[test]
    fn test_yuv_fallback_is_all_defaults() {
        let expected = YuvFormat::new(ColorRange::Full, ColorStd::Bt601, YuvLayout::Nv12);
        assert_eq!(yuv_format(PixelLayout::Other(99)), expected);
        assert_eq!(yuv_format(PixelLayout::Bpc8Bgra), expected);
        assert_eq!(YuvFormat::default(), expected);
    }

    #[test]
    fn test_packed_inverse_lookup() {
        for layout in PixelLayout::KNOWN.into_iter().filter(|l| l.is_packed()) {
            assert_eq!(packed_layout(pixel_format(layout)), layout);
        }
    }

    #[test]
    fn test_rotation_lookup_is_idempotent() {
        for raw in 0..8 {
            let rotation = Rotation::from_raw(raw);
            let first = camera_orientation(rotation);
            assert_eq!(first, camera_orientation(rotation));
            assert_eq!(first.degrees(), rotation.degrees());
        }
        assert_eq!(
            camera_orientation(Rotation::from_raw(200)),
            CameraOrientation::Deg0
        );
    }

    #[test]
    fn test_classify_summary() {
        let c = classify(PixelLayout::I420Bt709Video);
        assert!(c.known);
        assert_eq!(c.plane_count, 3);
        assert_eq!(c.planes, Some(PlaneStructure::FullyPlanar));
        assert_eq!(c.pixel_format, None);
        assert_eq!(c.yuv.unwrap().range, ColorRange::Video);

        let c = classify(PixelLayout::Other(50));
        assert!(!c.known);
        assert_eq!(c.raw, 50);
        assert_eq!(c.pixel_format, None);
        assert_eq!(c.yuv, None);
    }

    #[test]
    fn test_known_code_in_other_classifies_as_known() {
        let c = classify(PixelLayout::Other(8));
        assert_eq!(c, classify(PixelLayout::Nv12Bt709Video));
        assert!(matches!(c.layout, PixelLayout::Nv12Bt709Video));
        assert_eq!(pixel_format(PixelLayout::Other(3)), PixelFormat::Bgra);
        assert_eq!(yuv_format(PixelLayout::Other(10)).layout, YuvLayout::I420);
    }
}
