//! Player configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Pixel ratio used when none is configured and the host cannot detect one.
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;

/// What the playable draws into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSurface {
    /// The playable receives the root container and manages its own children.
    #[default]
    Container,
    /// The player adds a drawing surface sized to the display before `load`.
    Canvas,
}

/// Configuration for a single player instance. Every field has a default, so
/// partial JSON objects are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Text of the gating control shown before the first start.
    pub button_label: String,
    /// Text of the gating control shown by `show_resume_gate` when no label is given.
    pub resume_label: String,

    /// Class names applied to the elements the player creates.
    pub root_class: String,
    pub overlay_class: String,
    pub button_class: String,

    /// Ratio between backing-store pixels and display pixels. `None` means the
    /// host detects it once at construction (falling back to 1.0).
    pub pixel_ratio: Option<f64>,

    pub render_surface: RenderSurface,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            button_label: "PLAY".to_string(),
            resume_label: "RESUME".to_string(),
            root_class: "jsplayer".to_string(),
            overlay_class: "modaloverlay".to_string(),
            button_class: "button".to_string(),
            pixel_ratio: None,
            render_surface: RenderSurface::Container,
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PlayerError> {
        let cfg: PlayerConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if let Some(ratio) = self.pixel_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(PlayerError::config(format!(
                    "pixel_ratio must be a positive finite number, got {ratio}"
                )));
            }
        }
        for (field, value) in [
            ("root_class", &self.root_class),
            ("overlay_class", &self.overlay_class),
            ("button_class", &self.button_class),
        ] {
            if value.split_whitespace().count() != 1 {
                return Err(PlayerError::config(format!(
                    "{field} must be a single class name, got {value:?}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn resolved_pixel_ratio(&self) -> f64 {
        self.pixel_ratio.unwrap_or(DEFAULT_PIXEL_RATIO)
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }
}
