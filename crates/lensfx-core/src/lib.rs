//! # lensfx-core
//!
//! Core types for the LensFX effect player.
//! This crate holds everything that does not need a live rendering engine:
//! caller-side pixel buffers and layout tags, the engine-side image vocabulary,
//! the pure format classifier that bridges the two, configuration and errors.

pub mod buffer;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod image;

pub use config::*;

pub use buffer::{PixelBuffer, Plane};
pub use error::{LensError, LensResult};
pub use format::{PixelLayout, PlaneStructure, Rotation};
pub use image::{
    Bpc8Image, CameraOrientation, ColorPlane, ColorRange, ColorStd, FrameFormat, FullImage,
    PixelFormat, YuvFormat, YuvImage, YuvLayout, YuvPlanes,
};
