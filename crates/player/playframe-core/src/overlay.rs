//! Modal overlay holding the single gating control.

use serde::{Deserialize, Serialize};

/// What activating the gating control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    /// Load the playable, then start the frame loop.
    Begin,
    /// Restart a stopped frame loop without loading again.
    Resume,
}

/// The actionable element shown inside the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateControl {
    pub label: String,
    pub action: GateAction,
}

impl GateControl {
    pub fn new(label: impl Into<String>, action: GateAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Overlay state. Showing replaces the content, hiding keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    content: Option<GateControl>,
    visible: bool,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, control: GateControl) {
        self.content = Some(control);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn content(&self) -> Option<&GateControl> {
        self.content.as_ref()
    }

    /// Action an activation would trigger right now. Hidden controls cannot be activated.
    #[inline]
    pub fn pending_action(&self) -> Option<GateAction> {
        if !self.visible {
            return None;
        }
        self.content.as_ref().map(|c| c.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_replaces_content() {
        let mut overlay = Overlay::new();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.pending_action(), None);

        overlay.show(GateControl::new("PLAY", GateAction::Begin));
        overlay.show(GateControl::new("RESUME", GateAction::Resume));
        assert!(overlay.is_visible());
        assert_eq!(overlay.content().map(|c| c.label.as_str()), Some("RESUME"));
        assert_eq!(overlay.pending_action(), Some(GateAction::Resume));
    }

    #[test]
    fn hide_keeps_content_but_disarms() {
        let mut overlay = Overlay::new();
        overlay.show(GateControl::new("PLAY", GateAction::Begin));
        overlay.hide();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.pending_action(), None);
        assert_eq!(overlay.content().map(|c| c.action), Some(GateAction::Begin));
    }
}
