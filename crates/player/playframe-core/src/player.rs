//! Player: overlay-gated start sequence and the per-frame update loop.

use log::{debug, warn};

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::overlay::{GateAction, GateControl, Overlay};
use crate::playable::{Capability, Playable};
use crate::scheduler::{FrameScheduler, InstantScheduler, ManualScheduler};
use crate::stage::Stage;
use crate::state::LifecycleState;
use crate::timing::{FrameTiming, LoopMetrics};

/// Hosts one playable on one stage, driven by one frame scheduler.
///
/// Construction shows the gating control. Activating it hides the overlay,
/// calls `load` once and starts the loop; every frame then calls `update` with
/// the elapsed seconds until the loop is stopped.
pub struct Player<P, S, F>
where
    S: Stage,
    P: Playable<S::Target>,
    F: FrameScheduler,
{
    playable: P,
    stage: S,
    scheduler: F,
    config: PlayerConfig,
    pixel_ratio: f64,

    state: LifecycleState,
    overlay: Overlay,
    loaded: bool,

    timing: FrameTiming,
    loop_handle: Option<F::Handle>,
    metrics: LoopMetrics,
}

impl<P, S, F> Player<P, S, F>
where
    S: Stage,
    P: Playable<S::Target>,
    F: FrameScheduler,
{
    /// Build a player and show the gating control labelled `config.button_label`.
    pub fn new(playable: P, stage: S, scheduler: F, config: PlayerConfig) -> Result<Self, PlayerError> {
        config.validate()?;
        let pixel_ratio = config.resolved_pixel_ratio();
        let label = config.button_label.clone();

        let mut player = Self {
            playable,
            stage,
            scheduler,
            config,
            pixel_ratio,
            state: LifecycleState::AwaitingStart,
            overlay: Overlay::new(),
            loaded: false,
            timing: FrameTiming::new(),
            loop_handle: None,
            metrics: LoopMetrics::new(),
        };
        player.show_overlay(GateControl::new(label, GateAction::Begin))?;
        debug!("player: created, awaiting start");
        Ok(player)
    }

    /// The user activated the gating control.
    ///
    /// Returns `Ok(false)` when no control is armed (already activated, or hidden).
    pub fn activate(&mut self) -> Result<bool, PlayerError> {
        let Some(action) = self.overlay.pending_action() else {
            debug!("player: activation ignored, no gate armed");
            return Ok(false);
        };

        match (action, self.state) {
            (GateAction::Begin, LifecycleState::AwaitingStart) => self.begin().map(|_| true),
            (GateAction::Resume, LifecycleState::Stopped) => {
                self.hide_overlay()?;
                self.start_update_loop().map(|_| true)
            }
            (action, state) => {
                debug_assert!(false, "gate {action:?} armed in state {state}");
                Ok(false)
            }
        }
    }

    fn begin(&mut self) -> Result<(), PlayerError> {
        let prepared = self
            .hide_overlay()
            .and_then(|_| self.stage.sync_surface_size(self.pixel_ratio));
        if let Err(err) = prepared {
            warn!("player: stage not ready, gate stays armed: {err}");
            self.rearm_gate();
            return Err(err);
        }
        // Leaving AwaitingStart before calling out keeps `load` to one call per player.
        self.state = LifecycleState::Stopped;

        debug!("player: loading playable");
        if let Err(err) = self.playable.load(self.stage.target()) {
            warn!("player: load failed: {err:#}");
            return Err(PlayerError::playable(Capability::Load, &err));
        }
        self.loaded = true;
        self.start_update_loop()
    }

    /// Schedule the first frame and record the loop start time.
    ///
    /// Fails with `InvalidState` if the loop is already running, or if the playable
    /// has not been loaded through the gating control.
    pub fn start_update_loop(&mut self) -> Result<(), PlayerError> {
        if !self.state.can_start() || !self.loaded {
            warn!("player: start rejected in state {}", self.state);
            return Err(PlayerError::invalid_state(
                self.state.name(),
                LifecycleState::Running.name(),
            ));
        }
        if self.overlay.is_visible() {
            self.hide_overlay()?;
        }

        let handle = self.scheduler.request_frame()?;
        self.loop_handle = Some(handle);
        let now = self.scheduler.now();
        self.timing.start(now);
        self.metrics.reset(now);
        self.state = LifecycleState::Running;
        debug!("player: loop started at {now} ms ({handle:?})");
        Ok(())
    }

    /// Cancel the pending frame. Returns whether a running loop was stopped.
    pub fn stop_update_loop(&mut self) -> bool {
        if let Some(handle) = self.loop_handle.take() {
            self.scheduler.cancel_frame(handle);
        }
        if !self.state.can_stop() {
            return false;
        }
        self.state = LifecycleState::Stopped;
        debug!(
            "player: loop stopped after {} frames",
            self.metrics.frames_dispatched
        );
        true
    }

    /// Show a gating control on a stopped player; activating it restarts the loop.
    pub fn show_resume_gate(&mut self, label: Option<&str>) -> Result<(), PlayerError> {
        if self.state != LifecycleState::Stopped || !self.loaded {
            return Err(PlayerError::invalid_state(self.state.name(), "resume_gate"));
        }
        let label = label.unwrap_or(&self.config.resume_label).to_string();
        self.show_overlay(GateControl::new(label, GateAction::Resume))
    }

    /// Frame callback. `timestamp_ms` is the platform frame timestamp.
    ///
    /// Order is fixed: schedule the next frame, compute the delta, call `update`,
    /// then record the timestamp. An `update` error stops the loop and is returned.
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<(), PlayerError> {
        if !self.state.is_running() {
            debug!("player: stale frame at {timestamp_ms} ms ignored");
            return Ok(());
        }

        // A frame that already fired cancels as a no-op.
        if let Some(previous) = self.loop_handle.take() {
            self.scheduler.cancel_frame(previous);
        }
        match self.scheduler.request_frame() {
            Ok(handle) => self.loop_handle = Some(handle),
            Err(err) => {
                self.stop_update_loop();
                return Err(err);
            }
        }

        let delta = self.timing.delta_seconds(timestamp_ms);
        if let Err(err) = self.playable.update(self.stage.target(), delta) {
            warn!("player: update failed, stopping loop: {err:#}");
            self.stop_update_loop();
            return Err(PlayerError::playable(Capability::Update, &err));
        }
        self.timing.record(timestamp_ms);
        self.metrics.record_frame(delta);
        Ok(())
    }

    fn show_overlay(&mut self, control: GateControl) -> Result<(), PlayerError> {
        self.stage.show_overlay(&control)?;
        self.overlay.show(control);
        Ok(())
    }

    /// Put the last gating control back after a failed activation.
    fn rearm_gate(&mut self) {
        let Some(control) = self.overlay.content().cloned() else {
            return;
        };
        if let Err(err) = self.stage.show_overlay(&control) {
            warn!("player: could not redisplay gate: {err}");
        }
        self.overlay.show(control);
    }

    fn hide_overlay(&mut self) -> Result<(), PlayerError> {
        self.overlay.hide();
        self.stage.hide_overlay()
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[inline]
    pub fn metrics(&self) -> &LoopMetrics {
        &self.metrics
    }

    /// Timestamp (ms) the next delta is computed against; `None` before the first start.
    #[inline]
    pub fn last_update(&self) -> Option<f64> {
        self.timing.last_update()
    }

    #[inline]
    pub fn loop_handle(&self) -> Option<F::Handle> {
        self.loop_handle
    }

    #[inline]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn playable(&self) -> &P {
        &self.playable
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

impl<P, S> Player<P, S, ManualScheduler>
where
    S: Stage,
    P: Playable<S::Target>,
{
    /// Fire the pending frame at `timestamp_ms`. Returns `Ok(false)` when no frame
    /// was scheduled.
    pub fn advance_frame(&mut self, timestamp_ms: f64) -> Result<bool, PlayerError> {
        if self.scheduler.fire(timestamp_ms).is_none() {
            return Ok(false);
        }
        self.tick(timestamp_ms).map(|_| true)
    }
}

impl<P, S> Player<P, S, InstantScheduler>
where
    S: Stage,
    P: Playable<S::Target>,
{
    /// Run the pending frame, if any, stamped with the current clock.
    pub fn poll(&mut self) -> Result<bool, PlayerError> {
        let Some((_, now)) = self.scheduler.take_due() else {
            return Ok(false);
        };
        self.tick(now).map(|_| true)
    }
}

impl<P, S, F> Drop for Player<P, S, F>
where
    S: Stage,
    P: Playable<S::Target>,
    F: FrameScheduler,
{
    fn drop(&mut self) {
        if self.stop_update_loop() {
            debug!("player: dropped while running, pending frame cancelled");
        }
    }
}

impl<P, S, F> std::fmt::Debug for Player<P, S, F>
where
    S: Stage,
    P: Playable<S::Target>,
    F: FrameScheduler,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .field("overlay", &self.overlay)
            .field("loaded", &self.loaded)
            .field("timing", &self.timing)
            .field("loop_handle", &self.loop_handle)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
