//! # lensfx-player
//!
//! Drives a rendering engine from camera frames and a display surface.
//! The engine itself is an injected capability ([`RenderEngine`]); this crate
//! owns the frame dispatch, the surface/playback lifecycle and the draw loop.
//! All calls into one player are expected from a single thread; use
//! [`SharedEffectPlayer`] when several threads need access.

pub mod dispatch;
pub mod draw;
pub mod engine;
pub mod lifecycle;
pub mod player;
pub mod recording;
pub mod shared;

pub use draw::{CancelToken, DrawPolicy, DrawReport};
pub use engine::{Effect, EffectManager, EngineFactory, RenderEngine};
pub use lifecycle::{Lifecycle, PlaybackState, SurfaceState};
pub use player::EffectPlayer;
pub use recording::{EngineCall, EngineLog, FrameSummary, RecordingEngine, RecordingFactory};
pub use shared::SharedEffectPlayer;
