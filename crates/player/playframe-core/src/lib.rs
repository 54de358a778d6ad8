//! Playframe Core
//!
//! Hosts an external, swappable "playable" behind a gating control and drives it
//! with a per-frame update carrying elapsed seconds. Platform-agnostic: the
//! visual side is a [`Stage`], frame scheduling is a [`FrameScheduler`].
//!
//! ```
//! use playframe_core::{
//!     FnPlayable, HeadlessStage, HeadlessSurface, ManualScheduler, Player, PlayerConfig,
//! };
//!
//! let playable = FnPlayable::<HeadlessSurface>::from_fns(|_| Ok(()), |_, _dt| Ok(()));
//! let mut player = Player::new(
//!     playable,
//!     HeadlessStage::new(320.0, 240.0),
//!     ManualScheduler::starting_at(0.0),
//!     PlayerConfig::default(),
//! )?;
//! assert!(player.overlay().is_visible());
//!
//! player.activate()?;
//! player.advance_frame(16.0)?;
//! assert_eq!(player.metrics().frames_dispatched, 1);
//! # Ok::<(), playframe_core::PlayerError>(())
//! ```

pub mod config;
pub mod error;
pub mod overlay;
pub mod playable;
pub mod player;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod timing;

// Re-export common types for convenience
pub use config::{PlayerConfig, RenderSurface, DEFAULT_PIXEL_RATIO};
pub use error::PlayerError;
pub use overlay::{GateAction, GateControl, Overlay};
pub use playable::{ensure_capabilities, missing_capabilities, Capability, FnPlayable, Playable};
pub use player::Player;
pub use scheduler::{FrameHandle, FrameScheduler, InstantScheduler, ManualScheduler};
pub use stage::{backing_size, HeadlessStage, HeadlessSurface, OverlayEvent, Stage, SurfaceSize};
pub use state::LifecycleState;
pub use timing::{millis_to_seconds, FrameTiming, LoopMetrics};

/// Player result type
pub type Result<T> = core::result::Result<T, PlayerError>;
