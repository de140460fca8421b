use chrono::Utc;
use lambda_runtime::Error;
use serde_json::Value;
use shared::repositories::game_repository::GameRepository;
use shared::services::timeout_service::{TickOutcome, TimeoutService};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct TurnTimerProcessor {
    games: Arc<dyn GameRepository + Send + Sync>,
    timeout_service: Arc<TimeoutService>,
}

impl TurnTimerProcessor {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        timeout_service: Arc<TimeoutService>,
    ) -> Self {
        Self {
            games,
            timeout_service,
        }
    }

    /// Sweeps every live game whose deadline has passed and applies the
    /// timeout through the same path the HTTP tick endpoint uses, so a
    /// concurrent move or manual tick safely wins the race.
    pub async fn process_event(&self, _event: Value) -> Result<(), Error> {
        let now = Utc::now();
        let expired = self.games.find_expired(now).await?;
        info!("Found {} game(s) past their turn deadline", expired.len());

        let mut applied = 0;
        for game in expired {
            match self.timeout_service.tick(&game.id).await {
                Ok(TickOutcome::TimedOut(timed_out)) => {
                    applied += 1;
                    info!(
                        "Recorded timeout for game {}: team {} now owes a decision",
                        timed_out.id, timed_out.turn_team
                    );
                }
                Ok(TickOutcome::NotDue) => {
                    debug!("Game {} resolved before the sweep reached it", game.id);
                }
                // One stuck game must not stall the rest of the sweep.
                Err(e) => {
                    error!("Failed to apply timeout for game {}: {}", game.id, e);
                }
            }
        }

        info!("Turn timer sweep complete: {} timeout(s) applied", applied);
        Ok(())
    }
}
