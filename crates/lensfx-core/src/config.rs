use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{LensError, LensResult};

/// Graphics API the engine renders with. Must be chosen before the engine exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    #[default]
    OpenGl,
    Metal,
    Vulkan,
}

/// How the engine schedules its neural-network passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NnMode {
    #[default]
    Automatic,
    Enable,
    Disable,
}

/// Face-search quality/speed trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSearchMode {
    Fast,
    #[default]
    Good,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    pub resource_paths: Vec<String>,
    pub client_token: String,
    pub render_backend: RenderBackend,
    pub nn_mode: NnMode,
    pub face_search: FaceSearchMode,
    pub js_debugger: bool,
    pub manual_audio: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            resource_paths: vec!["resources".to_string()],
            client_token: String::new(),
            render_backend: RenderBackend::OpenGl,
            nn_mode: NnMode::Automatic,
            face_search: FaceSearchMode::Good,
            js_debugger: false,
            manual_audio: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DrawSettings {
    /// Sleep between render attempts that report not-ready.
    pub retry_interval_ms: u64,
    /// Give up after this long. `None` retries forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            retry_interval_ms: 10,
            timeout_ms: None,
        }
    }
}

impl DrawSettings {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Everything needed to create and drive an effect player.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct LensConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub draw: DrawSettings,
}

/// Parameters the engine is created with.
///
/// The framebuffer starts at 1x1; the player resizes it to the surface as soon
/// as a surface exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub resource_paths: Vec<String>,
    pub client_token: String,
    pub fx_width: u32,
    pub fx_height: u32,
    pub nn_mode: NnMode,
    pub face_search: FaceSearchMode,
    pub js_debugger_enabled: bool,
    pub manual_audio: bool,
    pub render_backend: RenderBackend,
}

impl EngineConfig {
    /// Default engine parameters for the given resources and client token.
    pub fn new(resource_paths: Vec<String>, client_token: impl Into<String>) -> Self {
        Self::from_settings(&EngineSettings {
            resource_paths,
            client_token: client_token.into(),
            ..EngineSettings::default()
        })
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            resource_paths: settings.resource_paths.clone(),
            client_token: settings.client_token.clone(),
            fx_width: 1,
            fx_height: 1,
            nn_mode: settings.nn_mode,
            face_search: settings.face_search,
            js_debugger_enabled: settings.js_debugger,
            manual_audio: settings.manual_audio,
            render_backend: settings.render_backend,
        }
    }
}

impl LensConfig {
    pub fn from_toml_str(contents: &str) -> LensResult<Self> {
        toml::from_str(contents).map_err(|e| LensError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &std::path::Path) -> LensResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> LensResult<String> {
        toml::to_string_pretty(self).map_err(|e| LensError::Config(e.to_string()))
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> LensResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::from_settings(&self.engine)
    }
}
