//! The capability contract a hosted playable has to satisfy.
//!
//! Statically typed playables implement [`Playable`] directly. Playables that only
//! exist at runtime (script objects, callback pairs) go through
//! [`ensure_capabilities`] so construction fails before anything is built.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Content driven by a player.
///
/// `T` is the rendering/interaction surface handed out by the player's stage.
pub trait Playable<T: ?Sized> {
    /// Called exactly once, after the gating action fires and before the first frame.
    fn load(&mut self, target: &T) -> anyhow::Result<()>;

    /// Called once per scheduled frame with the seconds elapsed since the previous
    /// call (or since the loop started, for the first call).
    fn update(&mut self, target: &T, time_delta_seconds: f64) -> anyhow::Result<()>;
}

impl<T: ?Sized, P: Playable<T> + ?Sized> Playable<T> for Box<P> {
    fn load(&mut self, target: &T) -> anyhow::Result<()> {
        (**self).load(target)
    }

    fn update(&mut self, target: &T, time_delta_seconds: f64) -> anyhow::Result<()> {
        (**self).update(target, time_delta_seconds)
    }
}

impl<T: ?Sized, P: Playable<T> + ?Sized> Playable<T> for &mut P {
    fn load(&mut self, target: &T) -> anyhow::Result<()> {
        (**self).load(target)
    }

    fn update(&mut self, target: &T, time_delta_seconds: f64) -> anyhow::Result<()> {
        (**self).update(target, time_delta_seconds)
    }
}

/// One of the two operations a playable must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Load,
    Update,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Load, Capability::Update];

    /// Property name the operation is looked up under.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Update => "update",
        }
    }
}

/// Operations absent from a dynamically described playable.
pub fn missing_capabilities(has_load: bool, has_update: bool) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|cap| match cap {
            Capability::Load => !has_load,
            Capability::Update => !has_update,
        })
        .collect()
}

/// Fail with [`PlayerError::NotPlayable`] unless both operations are present.
pub fn ensure_capabilities(has_load: bool, has_update: bool) -> Result<(), PlayerError> {
    let missing = missing_capabilities(has_load, has_update);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlayerError::not_playable(&missing))
    }
}

pub type LoadFn<T> = Box<dyn FnMut(&T) -> anyhow::Result<()>>;
pub type UpdateFn<T> = Box<dyn FnMut(&T, f64) -> anyhow::Result<()>>;

/// Playable assembled from a pair of callbacks that may or may not be present.
pub struct FnPlayable<T> {
    load: LoadFn<T>,
    update: UpdateFn<T>,
}

impl<T> FnPlayable<T> {
    /// Checked constructor: both callbacks are required.
    pub fn new(load: Option<LoadFn<T>>, update: Option<UpdateFn<T>>) -> Result<Self, PlayerError> {
        match (load, update) {
            (Some(load), Some(update)) => Ok(Self { load, update }),
            (load, update) => Err(PlayerError::not_playable(&missing_capabilities(
                load.is_some(),
                update.is_some(),
            ))),
        }
    }

    pub fn from_fns(
        load: impl FnMut(&T) -> anyhow::Result<()> + 'static,
        update: impl FnMut(&T, f64) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            load: Box::new(load),
            update: Box::new(update),
        }
    }
}

impl<T> Playable<T> for FnPlayable<T> {
    fn load(&mut self, target: &T) -> anyhow::Result<()> {
        (self.load)(target)
    }

    fn update(&mut self, target: &T, time_delta_seconds: f64) -> anyhow::Result<()> {
        (self.update)(target, time_delta_seconds)
    }
}

impl<T> std::fmt::Debug for FnPlayable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPlayable").finish_non_exhaustive()
    }
}
