//! A stand-in rendering engine that records every call it receives.
//!
//! Used by the CLI's `simulate` command and by tests. The call log lives behind
//! a shared handle so it can still be inspected after the engine has been moved
//! into a player.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use lensfx_core::{
    EngineConfig, FrameFormat, FullImage, LensError, LensResult, PixelFormat, YuvFormat, YuvPlanes,
};

use crate::engine::{Effect, EffectManager, EngineFactory, RenderEngine};

/// Owned summary of a pushed frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub plane_count: usize,
    pub plane_lengths: Vec<usize>,
    pub plane_strides: Vec<usize>,
    pub pixel_format: Option<PixelFormat>,
    pub yuv: Option<YuvFormat>,
    pub format: FrameFormat,
}

impl FrameSummary {
    pub fn of(image: &FullImage<'_>) -> Self {
        let planes = match image {
            FullImage::Bpc8(img) => vec![img.plane],
            FullImage::Yuv(img) => match img.planes {
                YuvPlanes::Nv12 { y, uv } => vec![y, uv],
                YuvPlanes::I420 { y, u, v } => vec![y, u, v],
            },
        };
        Self {
            plane_count: image.plane_count(),
            plane_lengths: planes.iter().map(|p| p.bytes().len()).collect(),
            plane_strides: planes.iter().map(|p| p.row_stride()).collect(),
            pixel_format: image.pixel_format(),
            yuv: image.yuv_format(),
            format: *image.format(),
        }
    }
}

/// One call received by a [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum EngineCall {
    SurfaceCreated { width: u32, height: u32 },
    SurfaceChanged { width: u32, height: u32 },
    SurfaceDestroyed,
    SetEffectSize { width: u32, height: u32 },
    Load { effect: String },
    CallJsMethod { method: String, params: String },
    Play,
    Pause,
    Stop,
    PushFrame(FrameSummary),
    Draw { status: i64 },
}

/// Shared, append-only log of engine calls.
#[derive(Debug, Clone, Default)]
pub struct EngineLog {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl EngineLog {
    pub fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    pub fn pushed_frames(&self) -> Vec<FrameSummary> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                EngineCall::PushFrame(summary) => Some(summary.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn draw_attempts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, EngineCall::Draw { .. }))
            .count()
    }

    /// Last framebuffer size the engine was given.
    pub fn effect_size(&self) -> Option<(u32, u32)> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            EngineCall::SetEffectSize { width, height } => Some((*width, *height)),
            _ => None,
        })
    }
}

struct RecordingEffect {
    log: EngineLog,
}

impl Effect for RecordingEffect {
    fn call_js_method(&mut self, method: &str, params: &str) {
        self.log.record(EngineCall::CallJsMethod {
            method: method.to_string(),
            params: params.to_string(),
        });
    }
}

struct RecordingEffectManager {
    log: EngineLog,
    current: Option<RecordingEffect>,
}

impl EffectManager for RecordingEffectManager {
    fn set_effect_size(&mut self, width: u32, height: u32) {
        self.log.record(EngineCall::SetEffectSize { width, height });
    }

    fn load(&mut self, effect: &str) {
        self.log.record(EngineCall::Load {
            effect: effect.to_string(),
        });
        self.current = Some(RecordingEffect {
            log: self.log.clone(),
        });
    }

    fn current(&mut self) -> Option<&mut dyn Effect> {
        self.current.as_mut().map(|e| e as &mut dyn Effect)
    }
}

/// Engine stub that records calls and can pretend to be slow to render.
pub struct RecordingEngine {
    log: EngineLog,
    manager: Option<RecordingEffectManager>,
    not_ready: u32,
}

impl RecordingEngine {
    /// An engine with an effect manager that renders on the first attempt.
    pub fn new(log: EngineLog) -> Self {
        Self {
            manager: Some(RecordingEffectManager {
                log: log.clone(),
                current: None,
            }),
            log,
            not_ready: 0,
        }
    }

    /// Drop the effect manager, as an engine that cannot manage effects yet.
    pub fn without_effect_manager(mut self) -> Self {
        self.manager = None;
        self
    }

    /// Report "not ready" for the next `attempts` draw calls.
    pub fn not_ready_for(mut self, attempts: u32) -> Self {
        self.not_ready = attempts;
        self
    }

    pub fn log(&self) -> &EngineLog {
        &self.log
    }
}

impl RenderEngine for RecordingEngine {
    fn surface_created(&mut self, width: u32, height: u32) {
        self.log.record(EngineCall::SurfaceCreated { width, height });
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.log.record(EngineCall::SurfaceChanged { width, height });
    }

    fn surface_destroyed(&mut self) {
        self.log.record(EngineCall::SurfaceDestroyed);
    }

    fn effect_manager(&mut self) -> Option<&mut dyn EffectManager> {
        self.manager.as_mut().map(|m| m as &mut dyn EffectManager)
    }

    fn playback_play(&mut self) {
        self.log.record(EngineCall::Play);
    }

    fn playback_pause(&mut self) {
        self.log.record(EngineCall::Pause);
    }

    fn playback_stop(&mut self) {
        self.log.record(EngineCall::Stop);
    }

    fn push_frame(&mut self, image: FullImage<'_>) {
        self.log.record(EngineCall::PushFrame(FrameSummary::of(&image)));
    }

    fn draw(&mut self) -> i64 {
        let status = if self.not_ready > 0 {
            self.not_ready -= 1;
            -1
        } else {
            0
        };
        self.log.record(EngineCall::Draw { status });
        status
    }
}

/// Factory producing [`RecordingEngine`]s that share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    log: EngineLog,
    with_effect_manager: bool,
    not_ready: u32,
    failure: Option<String>,
    created_with: Arc<Mutex<Option<EngineConfig>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            with_effect_manager: true,
            ..Self::default()
        }
    }

    pub fn without_effect_manager(mut self) -> Self {
        self.with_effect_manager = false;
        self
    }

    pub fn not_ready_for(mut self, attempts: u32) -> Self {
        self.not_ready = attempts;
        self
    }

    /// Refuse to create engines, as a device without a usable render backend.
    pub fn failing_with(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn log(&self) -> &EngineLog {
        &self.log
    }

    /// Config the last engine was created with.
    pub fn created_with(&self) -> Option<EngineConfig> {
        self.created_with.lock().clone()
    }
}

impl EngineFactory for RecordingFactory {
    fn create(&self, config: &EngineConfig) -> LensResult<Box<dyn RenderEngine>> {
        *self.created_with.lock() = Some(config.clone());
        if let Some(reason) = &self.failure {
            return Err(LensError::EngineCreation(reason.clone()));
        }
        let mut engine = RecordingEngine::new(self.log.clone()).not_ready_for(self.not_ready);
        if !self.with_effect_manager {
            engine = engine.without_effect_manager();
        }
        Ok(Box::new(engine))
    }
}
