//! Surface and playback lifecycle.
//!
//! The surface axis follows `uninitialized -> active <-> destroyed`. While a
//! surface is active the engine's framebuffer is kept at the surface size.
//! The playback axis is independent and forwarded without local checks.

use serde::Serialize;

use lensfx_core::{LensError, LensResult};

use crate::engine::RenderEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SurfaceState {
    /// No surface has been created yet.
    #[default]
    Uninitialized,
    Active { width: u32, height: u32 },
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Lifecycle state of one engine instance.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    surface: SurfaceState,
    playback: PlaybackState,
    framebuffer: Option<(u32, u32)>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> SurfaceState {
        self.surface
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Size the engine framebuffer was last synced to.
    pub fn framebuffer_size(&self) -> Option<(u32, u32)> {
        self.framebuffer
    }

    /// Surface size while a surface is active.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        match self.surface {
            SurfaceState::Active { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// True when the framebuffer matches the active surface.
    pub fn is_synced(&self) -> bool {
        self.surface_size().is_some() && self.surface_size() == self.framebuffer
    }

    pub fn surface_created(
        &mut self,
        engine: &mut dyn RenderEngine,
        width: u32,
        height: u32,
    ) -> LensResult<()> {
        if let SurfaceState::Active { .. } = self.surface {
            tracing::warn!("Surface created while another surface is active");
        }
        engine.surface_created(width, height);
        self.surface = SurfaceState::Active { width, height };
        tracing::debug!("Surface created: {}x{}", width, height);
        self.sync_framebuffer(engine, width, height)
    }

    pub fn surface_changed(
        &mut self,
        engine: &mut dyn RenderEngine,
        width: u32,
        height: u32,
    ) -> LensResult<()> {
        if !matches!(self.surface, SurfaceState::Active { .. }) {
            tracing::warn!("Surface changed without an active surface ({:?})", self.surface);
        }
        engine.surface_changed(width, height);
        self.surface = SurfaceState::Active { width, height };
        tracing::debug!("Surface changed: {}x{}", width, height);
        self.sync_framebuffer(engine, width, height)
    }

    pub fn surface_destroyed(&mut self, engine: &mut dyn RenderEngine) {
        engine.surface_destroyed();
        self.surface = SurfaceState::Destroyed;
        tracing::debug!("Surface destroyed");
    }

    pub fn resume(&mut self, engine: &mut dyn RenderEngine) {
        engine.playback_play();
        self.playback = PlaybackState::Playing;
    }

    pub fn pause(&mut self, engine: &mut dyn RenderEngine) {
        engine.playback_pause();
        self.playback = PlaybackState::Paused;
    }

    pub fn stop(&mut self, engine: &mut dyn RenderEngine) {
        engine.playback_stop();
        self.playback = PlaybackState::Stopped;
    }

    fn sync_framebuffer(
        &mut self,
        engine: &mut dyn RenderEngine,
        width: u32,
        height: u32,
    ) -> LensResult<()> {
        match engine.effect_manager() {
            Some(manager) => {
                manager.set_effect_size(width, height);
                self.framebuffer = Some((width, height));
                Ok(())
            }
            None => {
                tracing::warn!(
                    "Cannot resize framebuffer to {}x{}: no effect manager",
                    width,
                    height
                );
                Err(LensError::NoEffectManager)
            }
        }
    }
}

/// Ask the engine to load an effect. Fails when the engine cannot manage
/// effects yet.
pub fn load_effect(engine: &mut dyn RenderEngine, effect: &str) -> LensResult<()> {
    let manager = engine.effect_manager().ok_or(LensError::NoEffectManager)?;
    manager.load(effect);
    tracing::debug!("Loading effect '{}'", effect);
    Ok(())
}

/// Call a script method on the loaded effect.
///
/// A missing effect manager and a missing effect are reported as different
/// errors.
pub fn call_js_method(engine: &mut dyn RenderEngine, method: &str, params: &str) -> LensResult<()> {
    let Some(manager) = engine.effect_manager() else {
        tracing::error!("effect manager not initialized");
        return Err(LensError::NoEffectManager);
    };
    let Some(effect) = manager.current() else {
        tracing::error!("effect not loaded");
        return Err(LensError::NoEffectLoaded);
    };
    effect.call_js_method(method, params);
    Ok(())
}
