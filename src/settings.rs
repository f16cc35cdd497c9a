//! User settings and preferences
//!
//! Persisted in LocalStorage on the web; native runs use defaults.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DELTA_MS;
use crate::sim::{Effects, ScenePreset};

/// Which surface the browser build draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RendererKind {
    #[default]
    Canvas2d,
    WebGpu,
}

impl RendererKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererKind::Canvas2d => "Canvas 2D",
            RendererKind::WebGpu => "WebGPU",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "canvas" | "canvas2d" | "2d" => Some(RendererKind::Canvas2d),
            "webgpu" | "gpu" | "wgpu" => Some(RendererKind::WebGpu),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scene to start in
    pub preset: ScenePreset,
    pub renderer: RendererKind,

    // === Visual Effects ===
    /// Offset glows behind moving entities
    pub motion_blur: bool,
    /// Shadow glows around polygons and the border
    pub glow: bool,

    // === Timing ===
    /// Largest frame delta fed to the simulation (ms)
    pub max_frame_delta_ms: f64,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Start in idle/demo mode
    pub autopilot: bool,

    // === Accessibility ===
    /// Reduced motion (no border pulse, no motion blur)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: ScenePreset::default(),
            renderer: RendererKind::default(),

            motion_blur: true,
            glow: true,

            max_frame_delta_ms: MAX_FRAME_DELTA_MS,

            show_fps: true,
            autopilot: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effect toggles for the simulation (respects reduced_motion)
    pub fn effects(&self) -> Effects {
        let max_frame_delta_ms = if self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0 {
            self.max_frame_delta_ms
        } else {
            MAX_FRAME_DELTA_MS
        };

        Effects {
            motion_blur: self.motion_blur && !self.reduced_motion,
            glow: self.glow,
            pulse_border: !self.reduced_motion,
            max_frame_delta_ms,
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "polyglow_settings";

    /// Parse stored JSON, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("LocalStorage refused settings");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage on native ({}), using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
