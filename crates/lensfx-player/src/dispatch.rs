//! Frame dispatch: turn a caller's [`PixelBuffer`] into the engine's
//! [`FullImage`] and push it.

use lensfx_core::classify;
use lensfx_core::{
    Bpc8Image, ColorPlane, FullImage, LensError, LensResult, PixelBuffer, PlaneStructure,
    Rotation, YuvImage, YuvPlanes,
};

use crate::engine::RenderEngine;

/// Build the engine image for a buffer.
///
/// Picks the 1-, 2- or 3-plane construction from the layout's plane structure.
/// Unknown layouts and buffers whose plane count does not match their layout
/// are rejected before any plane is touched.
pub fn build_image<'a>(buffer: &PixelBuffer<'a>, rotation: Rotation) -> LensResult<FullImage<'a>> {
    buffer.validate()?;

    let format = classify::frame_format(buffer.width, buffer.height, rotation);
    let plane = |index: usize| -> LensResult<ColorPlane<'a>> {
        buffer
            .plane(index)
            .map(|p| ColorPlane::new(p.data, p.row_stride))
            .ok_or_else(|| LensError::plane_mismatch(buffer.layout, buffer.plane_count()))
    };

    let structure = buffer
        .layout
        .plane_structure()
        .ok_or(LensError::UnsupportedLayout {
            raw: buffer.layout.raw(),
        })?;

    let image = match structure {
        PlaneStructure::Packed => FullImage::Bpc8(Bpc8Image {
            plane: plane(0)?,
            pixel_format: classify::pixel_format(buffer.layout),
            format,
        }),
        PlaneStructure::SemiPlanar => FullImage::Yuv(YuvImage {
            planes: YuvPlanes::Nv12 {
                y: plane(0)?,
                uv: plane(1)?,
            },
            format,
            yuv: classify::yuv_format(buffer.layout),
        }),
        PlaneStructure::FullyPlanar => FullImage::Yuv(YuvImage {
            planes: YuvPlanes::I420 {
                y: plane(0)?,
                u: plane(1)?,
                v: plane(2)?,
            },
            format,
            yuv: classify::yuv_format(buffer.layout),
        }),
    };
    Ok(image)
}

/// Push one buffer to the engine. Exactly one push on success, none on error.
pub fn push_frame(
    engine: &mut dyn RenderEngine,
    buffer: &PixelBuffer<'_>,
    rotation: Rotation,
) -> LensResult<()> {
    match build_image(buffer, rotation) {
        Ok(image) => {
            engine.push_frame(image);
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Dropping {}x{} frame: {}", buffer.width, buffer.height, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{EngineLog, RecordingEngine};
    use lensfx_core::{
        CameraOrientation, ColorRange, ColorStd, PixelFormat, PixelLayout, Plane, YuvLayout,
    };

    #[test]
    fn test_packed_rgba_rotated() {
        let data = vec![0u8; 1920 * 1080 * 4];
        let buffer = PixelBuffer::packed(1920, 1080, PixelLayout::Bpc8Rgba, &data);
        let image = build_image(&buffer, Rotation::Deg90).unwrap();
        assert_eq!(image.plane_count(), 1);
        assert_eq!(image.pixel_format(), Some(PixelFormat::Rgba));
        assert_eq!(image.format().orientation, CameraOrientation::Deg90);
        assert_eq!((image.format().width, image.format().height), (1920, 1080));
    }

    #[test]
    fn test_nv12_bt709_video() {
        let (y, uv) = (vec![0u8; 16], vec![0u8; 8]);
        let buffer = PixelBuffer::nv12(4, 4, PixelLayout::Nv12Bt709Video, &y, &uv);
        let image = build_image(&buffer, Rotation::Deg0).unwrap();
        assert_eq!(image.plane_count(), 2);
        let yuv = image.yuv_format().unwrap();
        assert_eq!(yuv.standard, ColorStd::Bt709);
        assert_eq!(yuv.range, ColorRange::Video);
        assert_eq!(yuv.layout, YuvLayout::Nv12);
    }

    #[test]
    fn test_i420_keeps_plane_order() {
        let (y, u, v) = (vec![1u8; 16], vec![2u8; 4], vec![3u8; 4]);
        let buffer = PixelBuffer::i420(4, 4, PixelLayout::I420Bt601Full, &y, &u, &v);
        match build_image(&buffer, Rotation::Deg0).unwrap() {
            FullImage::Yuv(YuvImage {
                planes: YuvPlanes::I420 { y, u, v },
                ..
            }) => {
                assert_eq!(y.bytes()[0], 1);
                assert_eq!(u.bytes()[0], 2);
                assert_eq!(v.bytes()[0], 3);
                assert_eq!((y.row_stride(), u.row_stride()), (4, 2));
            }
            other => panic!("expected I420 image, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_layout_pushes_nothing() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone());
        let data = vec![0u8; 16];
        let buffer = PixelBuffer::packed(2, 2, PixelLayout::Other(1000), &data);
        let result = push_frame(&mut engine, &buffer, Rotation::Deg0);
        assert!(matches!(result, Err(LensError::UnsupportedLayout { raw: 1000 })));
        assert!(log.pushed_frames().is_empty());
    }

    #[test]
    fn test_missing_plane_pushes_nothing() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone());
        let (y, u) = (vec![0u8; 16], vec![0u8; 4]);
        let buffer = PixelBuffer::new(
            4,
            4,
            PixelLayout::I420Bt709Full,
            vec![Plane::new(&y, 4), Plane::new(&u, 2)],
        );
        let result = push_frame(&mut engine, &buffer, Rotation::Deg0);
        assert!(matches!(
            result,
            Err(LensError::PlaneCountMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_push_forwards_exactly_once() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone());
        let data = vec![0u8; 2 * 2 * 3];
        let buffer = PixelBuffer::packed(2, 2, PixelLayout::Bpc8Bgr, &data);
        push_frame(&mut engine, &buffer, Rotation::Deg270).unwrap();
        let frames = log.pushed_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pixel_format, Some(PixelFormat::Bgr));
        assert_eq!(frames[0].format.orientation, CameraOrientation::Deg270);
    }
}
