//! The visual side of a player: root container, overlay, optional drawing surface.
//!
//! The core never renders anything. A stage mirrors the overlay state onto the
//! host's elements and hands the playable its target.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use crate::overlay::GateControl;

pub trait Stage {
    /// What `load`/`update` receive.
    type Target: ?Sized;

    fn target(&self) -> &Self::Target;

    /// Replace the overlay content with `control` and make the overlay visible.
    fn show_overlay(&mut self, control: &GateControl) -> Result<(), PlayerError>;

    /// Make the overlay invisible, keeping its content.
    fn hide_overlay(&mut self) -> Result<(), PlayerError>;

    /// Resize the drawing surface to its displayed size times `pixel_ratio`.
    /// Called once, right before `load`. Container-only stages do nothing.
    fn sync_surface_size(&mut self, _pixel_ratio: f64) -> Result<(), PlayerError> {
        Ok(())
    }
}

/// Backing-store dimensions in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Device-pixel size of a surface displayed at `display_width` x `display_height`
/// CSS pixels. Negative or non-finite inputs collapse to zero.
pub fn backing_size(display_width: f64, display_height: f64, pixel_ratio: f64) -> SurfaceSize {
    let scale = |v: f64| {
        let px = (v * pixel_ratio).round();
        if px.is_finite() && px > 0.0 {
            px.min(u32::MAX as f64) as u32
        } else {
            0
        }
    };
    SurfaceSize {
        width: scale(display_width),
        height: scale(display_height),
    }
}

/// Overlay changes observed by a [`HeadlessStage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayEvent {
    Shown(GateControl),
    Hidden,
}

/// Drawing surface of a [`HeadlessStage`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadlessSurface {
    pub display_width: f64,
    pub display_height: f64,
    pub backing: SurfaceSize,
}

/// Stage without a display, for native hosts and tests. Records every overlay
/// change and surface sync.
#[derive(Debug, Clone, Default)]
pub struct HeadlessStage {
    surface: HeadlessSurface,
    overlay_events: Vec<OverlayEvent>,
    overlay_visible: bool,
    surface_syncs: u32,
}

impl HeadlessStage {
    pub fn new(display_width: f64, display_height: f64) -> Self {
        Self {
            surface: HeadlessSurface {
                display_width,
                display_height,
                backing: SurfaceSize::default(),
            },
            ..Self::default()
        }
    }

    pub fn overlay_events(&self) -> &[OverlayEvent] {
        &self.overlay_events
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn surface_syncs(&self) -> u32 {
        self.surface_syncs
    }
}

impl Stage for HeadlessStage {
    type Target = HeadlessSurface;

    fn target(&self) -> &HeadlessSurface {
        &self.surface
    }

    fn show_overlay(&mut self, control: &GateControl) -> Result<(), PlayerError> {
        self.overlay_events.push(OverlayEvent::Shown(control.clone()));
        self.overlay_visible = true;
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<(), PlayerError> {
        self.overlay_events.push(OverlayEvent::Hidden);
        self.overlay_visible = false;
        Ok(())
    }

    fn sync_surface_size(&mut self, pixel_ratio: f64) -> Result<(), PlayerError> {
        self.surface.backing = backing_size(
            self.surface.display_width,
            self.surface.display_height,
            pixel_ratio,
        );
        self.surface_syncs += 1;
        Ok(())
    }
}
