use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::LensError;

/// Byte arrangement and colorspace family of a caller-supplied pixel buffer.
///
/// Known layouts carry stable raw codes (their declaration order, starting at 0)
/// so foreign callers can hand over plain integers. Codes outside the known set
/// are preserved in [`PixelLayout::Other`] and handled by the classifier's
/// fallbacks instead of failing.
///
/// Layouts are identified by raw code: `Other(2)` is the same layout as
/// `Bpc8Rgba` and behaves like it everywhere. Deserialization accepts a name, a
/// raw code or `{ other = code }` and always yields the canonical variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "LayoutRepr")]
pub enum PixelLayout {
    /// Packed 8-bit RGB.
    Bpc8Rgb,
    /// Packed 8-bit BGR.
    Bpc8Bgr,
    /// Packed 8-bit RGBA.
    Bpc8Rgba,
    /// Packed 8-bit BGRA.
    Bpc8Bgra,
    /// Packed 8-bit ARGB.
    Bpc8Argb,
    Nv12Bt601Full,
    Nv12Bt601Video,
    Nv12Bt709Full,
    Nv12Bt709Video,
    I420Bt601Full,
    I420Bt601Video,
    I420Bt709Full,
    I420Bt709Video,
    /// A raw code with no known layout.
    Other(u32),
}

/// How a layout's samples are split across memory planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneStructure {
    /// All channels interleaved in one plane.
    Packed,
    /// Luma plane plus one interleaved chroma plane.
    SemiPlanar,
    /// Luma plane plus two separate chroma planes.
    FullyPlanar,
}

impl PlaneStructure {
    /// Number of memory planes this structure uses.
    pub fn plane_count(&self) -> usize {
        match self {
            PlaneStructure::Packed => 1,
            PlaneStructure::SemiPlanar => 2,
            PlaneStructure::FullyPlanar => 3,
        }
    }
}

impl PixelLayout {
    /// Every known layout, in raw-code order.
    pub const KNOWN: [PixelLayout; 13] = [
        PixelLayout::Bpc8Rgb,
        PixelLayout::Bpc8Bgr,
        PixelLayout::Bpc8Rgba,
        PixelLayout::Bpc8Bgra,
        PixelLayout::Bpc8Argb,
        PixelLayout::Nv12Bt601Full,
        PixelLayout::Nv12Bt601Video,
        PixelLayout::Nv12Bt709Full,
        PixelLayout::Nv12Bt709Video,
        PixelLayout::I420Bt601Full,
        PixelLayout::I420Bt601Video,
        PixelLayout::I420Bt709Full,
        PixelLayout::I420Bt709Video,
    ];

    /// Map a raw code to a layout. Unknown codes become [`PixelLayout::Other`].
    pub fn from_raw(raw: u32) -> Self {
        Self::KNOWN
            .get(raw as usize)
            .copied()
            .unwrap_or(PixelLayout::Other(raw))
    }

    /// The raw code of this layout.
    pub fn raw(&self) -> u32 {
        match self {
            PixelLayout::Bpc8Rgb => 0,
            PixelLayout::Bpc8Bgr => 1,
            PixelLayout::Bpc8Rgba => 2,
            PixelLayout::Bpc8Bgra => 3,
            PixelLayout::Bpc8Argb => 4,
            PixelLayout::Nv12Bt601Full => 5,
            PixelLayout::Nv12Bt601Video => 6,
            PixelLayout::Nv12Bt709Full => 7,
            PixelLayout::Nv12Bt709Video => 8,
            PixelLayout::I420Bt601Full => 9,
            PixelLayout::I420Bt601Video => 10,
            PixelLayout::I420Bt709Full => 11,
            PixelLayout::I420Bt709Video => 12,
            PixelLayout::Other(raw) => *raw,
        }
    }

    /// The named variant for this layout's raw code, if it has one.
    pub fn canonical(self) -> Self {
        match self {
            PixelLayout::Other(raw) => Self::from_raw(raw),
            known => known,
        }
    }

    /// Plane structure of this layout, `None` for unknown codes.
    pub fn plane_structure(&self) -> Option<PlaneStructure> {
        match self.canonical() {
            PixelLayout::Bpc8Rgb
            | PixelLayout::Bpc8Bgr
            | PixelLayout::Bpc8Rgba
            | PixelLayout::Bpc8Bgra
            | PixelLayout::Bpc8Argb => Some(PlaneStructure::Packed),
            PixelLayout::Nv12Bt601Full
            | PixelLayout::Nv12Bt601Video
            | PixelLayout::Nv12Bt709Full
            | PixelLayout::Nv12Bt709Video => Some(PlaneStructure::SemiPlanar),
            PixelLayout::I420Bt601Full
            | PixelLayout::I420Bt601Video
            | PixelLayout::I420Bt709Full
            | PixelLayout::I420Bt709Video => Some(PlaneStructure::FullyPlanar),
            PixelLayout::Other(_) => None,
        }
    }

    /// Number of planes a buffer in this layout must carry (0 for unknown codes).
    pub fn plane_count(&self) -> usize {
        self.plane_structure().map_or(0, |s| s.plane_count())
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.canonical(), PixelLayout::Other(_))
    }

    /// True for the packed 8-bit RGB family.
    pub fn is_packed(&self) -> bool {
        self.plane_structure() == Some(PlaneStructure::Packed)
    }

    /// True for the NV12 and I420 families.
    pub fn is_yuv(&self) -> bool {
        matches!(
            self.plane_structure(),
            Some(PlaneStructure::SemiPlanar | PlaneStructure::FullyPlanar)
        )
    }

    /// Snake-case name, `None` for unknown codes.
    pub fn name(&self) -> Option<&'static str> {
        let name = match self.canonical() {
            PixelLayout::Bpc8Rgb => "bpc8_rgb",
            PixelLayout::Bpc8Bgr => "bpc8_bgr",
            PixelLayout::Bpc8Rgba => "bpc8_rgba",
            PixelLayout::Bpc8Bgra => "bpc8_bgra",
            PixelLayout::Bpc8Argb => "bpc8_argb",
            PixelLayout::Nv12Bt601Full => "nv12_bt601_full",
            PixelLayout::Nv12Bt601Video => "nv12_bt601_video",
            PixelLayout::Nv12Bt709Full => "nv12_bt709_full",
            PixelLayout::Nv12Bt709Video => "nv12_bt709_video",
            PixelLayout::I420Bt601Full => "i420_bt601_full",
            PixelLayout::I420Bt601Video => "i420_bt601_video",
            PixelLayout::I420Bt709Full => "i420_bt709_full",
            PixelLayout::I420Bt709Video => "i420_bt709_video",
            PixelLayout::Other(_) => return None,
        };
        Some(name)
    }
}

impl PartialEq for PixelLayout {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for PixelLayout {}

impl Hash for PixelLayout {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

/// Serialized forms accepted for a [`PixelLayout`].
#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutRepr {
    Code(u32),
    Name(String),
    Other { other: u32 },
}

impl TryFrom<LayoutRepr> for PixelLayout {
    type Error = LensError;

    fn try_from(repr: LayoutRepr) -> Result<Self, Self::Error> {
        match repr {
            LayoutRepr::Code(raw) | LayoutRepr::Other { other: raw } => Ok(Self::from_raw(raw)),
            LayoutRepr::Name(name) => name.parse(),
        }
    }
}

impl From<u32> for PixelLayout {
    fn from(raw: u32) -> Self {
        PixelLayout::from_raw(raw)
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "unknown({})", self.raw()),
        }
    }
}

impl FromStr for PixelLayout {
    type Err = LensError;

    /// Accepts a snake-case layout name or a raw numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<u32>() {
            return Ok(PixelLayout::from_raw(raw));
        }
        let lower = s.to_ascii_lowercase();
        Self::KNOWN
            .iter()
            .copied()
            .find(|l| l.name() == Some(lower.as_str()))
            .ok_or_else(|| LensError::InvalidArgument(format!("unknown pixel layout '{s}'")))
    }
}

/// Rotation of a buffer's content relative to upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Map a raw code (0..=3) to a rotation. Unknown codes fall back to 0°.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    /// Map a degree value to a rotation. Anything but 90, 180 or 270 is 0°.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
