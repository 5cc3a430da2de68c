//! Engine-side image vocabulary.
//!
//! The rendering engine describes an input frame along three independent axes:
//! channel order for packed frames, colorspace (standard + range + plane layout)
//! for YUV frames, and a [`FrameFormat`] carrying size and orientation. The
//! types here borrow plane memory from the caller; a [`FullImage`] never
//! outlives the push call that built it.

use serde::{Deserialize, Serialize};

/// Channel order of a packed 8-bit frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    #[default]
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Argb,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra | PixelFormat::Argb => 4,
        }
    }
}

/// YUV matrix standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStd {
    #[default]
    Bt601,
    Bt709,
}

/// YUV value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRange {
    /// Full 0..=255 range.
    #[default]
    Full,
    /// Video (limited) range.
    Video,
}

/// Plane layout of a YUV frame as the engine understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YuvLayout {
    /// Semi-planar: luma + interleaved chroma.
    #[default]
    Nv12,
    /// Fully planar: luma + two chroma planes.
    I420,
}

/// Colorspace descriptor of a YUV frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct YuvFormat {
    pub range: ColorRange,
    pub standard: ColorStd,
    pub layout: YuvLayout,
}

impl YuvFormat {
    pub fn new(range: ColorRange, standard: ColorStd, layout: YuvLayout) -> Self {
        Self {
            range,
            standard,
            layout,
        }
    }
}

/// Orientation of the camera that produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraOrientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl CameraOrientation {
    pub fn degrees(&self) -> u32 {
        match self {
            CameraOrientation::Deg0 => 0,
            CameraOrientation::Deg90 => 90,
            CameraOrientation::Deg180 => 180,
            CameraOrientation::Deg270 => 270,
        }
    }
}

/// Size and orientation metadata attached to every pushed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameFormat {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pub orientation: CameraOrientation,
    /// Whether the engine should mirror the frame horizontally.
    pub require_mirroring: bool,
    /// Face orientation hint in degrees.
    pub face_orientation: i32,
    /// Camera field of view, when known.
    pub fov: Option<f32>,
}

impl FrameFormat {
    /// A camera frame with no mirroring, upright faces and unknown field of view.
    pub fn new(width: u32, height: u32, orientation: CameraOrientation) -> Self {
        Self {
            width,
            height,
            orientation,
            require_mirroring: false,
            face_orientation: 0,
            fov: None,
        }
    }
}

/// A read-only view of one memory plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPlane<'a> {
    data: &'a [u8],
    row_stride: usize,
}

impl<'a> ColorPlane<'a> {
    pub fn new(data: &'a [u8], row_stride: usize) -> Self {
        Self { data, row_stride }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes per row, including any padding.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }
}

/// A single-plane packed 8-bit frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bpc8Image<'a> {
    pub plane: ColorPlane<'a>,
    pub pixel_format: PixelFormat,
    pub format: FrameFormat,
}

/// The planes of a YUV frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YuvPlanes<'a> {
    Nv12 {
        y: ColorPlane<'a>,
        uv: ColorPlane<'a>,
    },
    I420 {
        y: ColorPlane<'a>,
        u: ColorPlane<'a>,
        v: ColorPlane<'a>,
    },
}

impl YuvPlanes<'_> {
    pub fn plane_count(&self) -> usize {
        match self {
            YuvPlanes::Nv12 { .. } => 2,
            YuvPlanes::I420 { .. } => 3,
        }
    }
}

/// A two- or three-plane YUV frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YuvImage<'a> {
    pub planes: YuvPlanes<'a>,
    pub format: FrameFormat,
    pub yuv: YuvFormat,
}

/// Any frame the engine accepts through its push capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FullImage<'a> {
    Bpc8(Bpc8Image<'a>),
    Yuv(YuvImage<'a>),
}

impl FullImage<'_> {
    /// Size and orientation metadata of the frame.
    pub fn format(&self) -> &FrameFormat {
        match self {
            FullImage::Bpc8(img) => &img.format,
            FullImage::Yuv(img) => &img.format,
        }
    }

    pub fn plane_count(&self) -> usize {
        match self {
            FullImage::Bpc8(_) => 1,
            FullImage::Yuv(img) => img.planes.plane_count(),
        }
    }

    /// Channel order, for packed frames.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        match self {
            FullImage::Bpc8(img) => Some(img.pixel_format),
            FullImage::Yuv(_) => None,
        }
    }

    /// Colorspace descriptor, for YUV frames.
    pub fn yuv_format(&self) -> Option<YuvFormat> {
        match self {
            FullImage::Bpc8(_) => None,
            FullImage::Yuv(img) => Some(img.yuv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format_defaults() {
        let format = FrameFormat::new(640, 480, CameraOrientation::Deg270);
        assert_eq!(format.orientation.degrees(), 270);
        assert!(!format.require_mirroring);
        assert_eq!(format.face_orientation, 0);
        assert_eq!(format.fov, None);
    }

    #[test]
    fn test_full_image_accessors() {
        let y = [16u8; 4];
        let uv = [128u8; 2];
        let image = FullImage::Yuv(YuvImage {
            planes: YuvPlanes::Nv12 {
                y: ColorPlane::new(&y, 2),
                uv: ColorPlane::new(&uv, 2),
            },
            format: FrameFormat::new(2, 2, CameraOrientation::Deg0),
            yuv: YuvFormat::new(ColorRange::Video, ColorStd::Bt709, YuvLayout::Nv12),
        });
        assert_eq!(image.plane_count(), 2);
        assert_eq!(image.pixel_format(), None);
        assert_eq!(image.yuv_format().unwrap().standard, ColorStd::Bt709);
        assert_eq!(image.format().width, 2);
    }

    #[test]
    fn test_pixel_format_bytes_per_pixel() {
        assert_eq!(PixelFormat::Bgr.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Argb.bytes_per_pixel(), 4);
    }
}
