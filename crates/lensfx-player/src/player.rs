use lensfx_core::{EngineConfig, LensConfig, LensResult, PixelBuffer, Rotation};

use crate::dispatch;
use crate::draw::{self, DrawPolicy, DrawReport};
use crate::engine::{EngineFactory, RenderEngine};
use crate::lifecycle::{self, Lifecycle, PlaybackState, SurfaceState};

/// Effect player: one rendering engine driven by frames and a display surface.
///
/// The engine is created once, together with the player, and lives until the
/// player is dropped. Surfaces may come and go any number of times in between.
pub struct EffectPlayer {
    engine: Box<dyn RenderEngine>,
    lifecycle: Lifecycle,
    draw_policy: DrawPolicy,
}

impl EffectPlayer {
    /// Wrap an already created engine.
    pub fn new(engine: Box<dyn RenderEngine>) -> Self {
        Self {
            engine,
            lifecycle: Lifecycle::new(),
            draw_policy: DrawPolicy::default(),
        }
    }

    /// Create an engine for the given resources and client token with default
    /// parameters.
    pub fn create(
        resource_paths: Vec<String>,
        client_token: impl Into<String>,
        factory: &dyn EngineFactory,
    ) -> LensResult<Self> {
        let config = EngineConfig::new(resource_paths, client_token);
        Self::create_with(&config, factory)
    }

    /// Create an engine from explicit engine parameters.
    pub fn create_with(config: &EngineConfig, factory: &dyn EngineFactory) -> LensResult<Self> {
        tracing::info!(
            "Creating engine ({:?} backend, {} resource path(s))",
            config.render_backend,
            config.resource_paths.len()
        );
        let engine = factory.create(config)?;
        Ok(Self::new(engine))
    }

    /// Create an engine and draw policy from a loaded configuration.
    pub fn from_config(config: &LensConfig, factory: &dyn EngineFactory) -> LensResult<Self> {
        let player = Self::create_with(&config.engine_config(), factory)?;
        Ok(player.with_draw_policy(DrawPolicy::from_settings(&config.draw)))
    }

    pub fn with_draw_policy(mut self, policy: DrawPolicy) -> Self {
        self.draw_policy = policy;
        self
    }

    pub fn draw_policy(&self) -> &DrawPolicy {
        &self.draw_policy
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.lifecycle.surface()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.lifecycle.playback()
    }

    /// Size the engine framebuffer was last synced to.
    pub fn framebuffer_size(&self) -> Option<(u32, u32)> {
        self.lifecycle.framebuffer_size()
    }

    pub fn surface_created(&mut self, width: u32, height: u32) -> LensResult<()> {
        self.lifecycle
            .surface_created(self.engine.as_mut(), width, height)
    }

    pub fn surface_changed(&mut self, width: u32, height: u32) -> LensResult<()> {
        self.lifecycle
            .surface_changed(self.engine.as_mut(), width, height)
    }

    pub fn surface_destroyed(&mut self) {
        self.lifecycle.surface_destroyed(self.engine.as_mut());
    }

    pub fn load_effect(&mut self, effect: &str) -> LensResult<()> {
        lifecycle::load_effect(self.engine.as_mut(), effect)
    }

    pub fn call_js_method(&mut self, method: &str, params: &str) -> LensResult<()> {
        lifecycle::call_js_method(self.engine.as_mut(), method, params)
    }

    pub fn pause(&mut self) {
        self.lifecycle.pause(self.engine.as_mut());
    }

    pub fn resume(&mut self) {
        self.lifecycle.resume(self.engine.as_mut());
    }

    pub fn stop(&mut self) {
        self.lifecycle.stop(self.engine.as_mut());
    }

    /// Normalize a frame and push it to the engine. Does not block.
    pub fn push_frame(&mut self, image: &PixelBuffer<'_>, orientation: Rotation) -> LensResult<()> {
        dispatch::push_frame(self.engine.as_mut(), image, orientation)
    }

    /// Render one frame, retrying until the engine is ready. Ignores any
    /// timeout in the configured policy.
    pub fn draw(&mut self) -> DrawReport {
        draw::draw(self.engine.as_mut(), self.draw_policy.retry_interval)
    }

    /// Render one frame under an explicit retry policy.
    pub fn draw_with(&mut self, policy: &DrawPolicy) -> LensResult<DrawReport> {
        draw::draw_with(self.engine.as_mut(), policy)
    }

    /// Render one frame under the configured policy, including its timeout.
    pub fn draw_bounded(&mut self) -> LensResult<DrawReport> {
        let policy = self.draw_policy.clone();
        self.draw_with(&policy)
    }
}

impl std::fmt::Debug for EffectPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectPlayer")
            .field("lifecycle", &self.lifecycle)
            .field("draw_policy", &self.draw_policy)
            .finish_non_exhaustive()
    }
}
