use std::sync::Arc;

use shared::services::fast_mode::FastModeService;
use shared::services::game_lifecycle::GameLifecycleService;
use shared::services::game_query::GameQueryService;
use shared::services::hand_brain::HandBrainService;
use shared::services::move_service::MoveService;
use shared::services::timeout_service::TimeoutService;
use shared::services::werewolf::WerewolfService;

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<GameQueryService>,
    pub move_service: Arc<MoveService>,
    pub timeout_service: Arc<TimeoutService>,
    pub fast_mode_service: Arc<FastModeService>,
    pub hand_brain_service: Arc<HandBrainService>,
    pub werewolf_service: Arc<WerewolfService>,
    pub lifecycle_service: Arc<GameLifecycleService>,
}
