use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::TurnTimingConfig;
use crate::repositories::errors::lock_repository_errors::GameLockRepositoryError;
use crate::repositories::lock_repository::{GameLockLease, GameLockRepository};
use crate::services::errors::game_lock_errors::GameLockError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Proof of a held per-game lock. Hand it back to `release` when the
/// critical section is done; the lease TTL bounds the damage if a
/// process dies while holding it.
#[derive(Debug)]
pub struct HeldLock {
    pub game_id: String,
    pub holder: String,
}

/// Named mutual exclusion keyed by game id. Every mutating game
/// operation runs its read-modify-write-persist cycle between
/// `acquire` and `release`; the section never spans two games.
pub struct GameLockService {
    repository: Arc<dyn GameLockRepository + Send + Sync>,
    config: TurnTimingConfig,
}

impl GameLockService {
    pub fn new(
        repository: Arc<dyn GameLockRepository + Send + Sync>,
        config: TurnTimingConfig,
    ) -> Self {
        GameLockService { repository, config }
    }

    /// Blocks up to `config.lock_wait`, polling the lease row, then
    /// fails with `Busy`.
    pub async fn acquire(&self, game_id: &str) -> Result<HeldLock, GameLockError> {
        let holder = Uuid::new_v4().to_string();
        let give_up_at = tokio::time::Instant::now() + self.config.lock_wait;
        loop {
            let lease = GameLockLease {
                game_id: game_id.to_string(),
                holder: holder.clone(),
                expires_at: Utc::now() + self.config.lock_lease,
            };
            match self.repository.try_acquire(&lease).await {
                Ok(()) => {
                    debug!("Acquired game lock for {}", game_id);
                    return Ok(HeldLock {
                        game_id: game_id.to_string(),
                        holder,
                    });
                }
                Err(GameLockRepositoryError::LockHeld) => {
                    if tokio::time::Instant::now() >= give_up_at {
                        return Err(GameLockError::Busy);
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => return Err(GameLockError::Infrastructure(e.to_string())),
            }
        }
    }

    /// Never fails the caller: a release that loses to a lease
    /// takeover or an infrastructure hiccup is logged, and the TTL
    /// reclaims the row either way.
    pub async fn release(&self, lock: HeldLock) {
        if let Err(e) = self.repository.release(&lock.game_id, &lock.holder).await {
            error!("Failed to release game lock for {}: {}", lock.game_id, e);
        } else {
            debug!("Released game lock for {}", lock.game_id);
        }
    }
}
