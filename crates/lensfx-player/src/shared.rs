use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::player::EffectPlayer;

/// A player shared between threads.
///
/// Every call goes through one lock, so the engine still only ever sees one
/// caller at a time. Holding the lock across [`EffectPlayer::draw`] blocks
/// other threads until the frame is rendered.
#[derive(Clone)]
pub struct SharedEffectPlayer {
    inner: Arc<Mutex<EffectPlayer>>,
}

impl SharedEffectPlayer {
    pub fn new(player: EffectPlayer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(player)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, EffectPlayer> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the player.
    pub fn with<R>(&self, f: impl FnOnce(&mut EffectPlayer) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<EffectPlayer> for SharedEffectPlayer {
    fn from(player: EffectPlayer) -> Self {
        Self::new(player)
    }
}
