use lensfx_core::{EngineConfig, FullImage, LensResult};

/// The rendering engine as seen by the player.
///
/// Implementations wrap a real renderer; the player never looks inside. Every
/// method is a plain forward with no success/failure contract except
/// [`RenderEngine::draw`], whose status tells whether a frame was produced.
pub trait RenderEngine: Send {
    fn surface_created(&mut self, width: u32, height: u32);

    fn surface_changed(&mut self, width: u32, height: u32);

    fn surface_destroyed(&mut self);

    /// The effect-management capability, if the engine can manage effects yet.
    fn effect_manager(&mut self) -> Option<&mut dyn EffectManager>;

    fn playback_play(&mut self);

    fn playback_pause(&mut self);

    fn playback_stop(&mut self);

    /// Hand one normalized frame to the engine. Plane memory is only borrowed
    /// for the duration of the call.
    fn push_frame(&mut self, image: FullImage<'_>);

    /// Attempt to render one frame. Negative means not ready, anything else
    /// means a frame was produced.
    fn draw(&mut self) -> i64;
}

/// Loads effects and resizes the engine's internal framebuffer.
pub trait EffectManager {
    /// Resize the framebuffer effects render into.
    fn set_effect_size(&mut self, width: u32, height: u32);

    fn load(&mut self, effect: &str);

    /// The currently loaded effect, if any.
    fn current(&mut self) -> Option<&mut dyn Effect>;
}

/// A loaded effect.
pub trait Effect {
    /// Invoke a method of the effect's script with a string payload.
    fn call_js_method(&mut self, method: &str, params: &str);
}

/// Creates engines. Called once per player, at construction time.
pub trait EngineFactory {
    fn create(&self, config: &EngineConfig) -> LensResult<Box<dyn RenderEngine>>;
}
