use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod routes;
pub mod state;

use shared::config::TurnTimingConfig;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::lock_repository::DynamoDbGameLockRepository;
use shared::repositories::member_repository::DynamoDbTeamMemberRepository;
use shared::repositories::move_repository::DynamoDbMoveRepository;
use shared::repositories::role_repository::DynamoDbGameRoleRepository;
use shared::repositories::stats_repository::DynamoDbWerewolfStatsRepository;
use shared::repositories::team_repository::DynamoDbTeamRepository;
use shared::repositories::vote_repository::DynamoDbWerewolfVoteRepository;
use shared::services::fast_mode::FastModeService;
use shared::services::game_end::GameEndEvaluator;
use shared::services::game_lifecycle::GameLifecycleService;
use shared::services::game_lock::GameLockService;
use shared::services::game_query::GameQueryService;
use shared::services::hand_brain::HandBrainService;
use shared::services::move_service::MoveService;
use shared::services::random::ThreadRngSource;
use shared::services::rule_engine::ChessRuleEngine;
use shared::services::timeout_service::TimeoutService;
use shared::services::turn_context::TurnContextResolver;
use shared::services::werewolf::WerewolfService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let aws_config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let timing = TurnTimingConfig::default();

    let games = Arc::new(DynamoDbGameRepository::new(client.clone()));
    let teams = Arc::new(DynamoDbTeamRepository::new(client.clone()));
    let members = Arc::new(DynamoDbTeamMemberRepository::new(client.clone()));
    let moves = Arc::new(DynamoDbMoveRepository::new(client.clone()));
    let locks = Arc::new(DynamoDbGameLockRepository::new(client.clone()));
    let roles = Arc::new(DynamoDbGameRoleRepository::new(client.clone()));
    let votes = Arc::new(DynamoDbWerewolfVoteRepository::new(client.clone()));
    let stats = Arc::new(DynamoDbWerewolfStatsRepository::new(client.clone()));

    let lock = Arc::new(GameLockService::new(locks, timing.clone()));
    let turn_context = Arc::new(TurnContextResolver::new(teams.clone(), members.clone()));
    let rule_engine = Arc::new(ChessRuleEngine::new());
    let evaluator = Arc::new(GameEndEvaluator::new(rule_engine.clone()));

    let query_service = Arc::new(GameQueryService::new(games.clone(), moves.clone()));
    let move_service = Arc::new(MoveService::new(
        games.clone(),
        teams.clone(),
        members.clone(),
        moves.clone(),
        turn_context.clone(),
        lock.clone(),
        rule_engine,
        evaluator.clone(),
        timing.clone(),
    ));
    let timeout_service = Arc::new(TimeoutService::new(
        games.clone(),
        teams.clone(),
        members.clone(),
        moves.clone(),
        lock.clone(),
        evaluator,
        timing.clone(),
    ));
    let fast_mode_service = Arc::new(FastModeService::new(
        games.clone(),
        teams.clone(),
        members.clone(),
        lock.clone(),
        timing.clone(),
    ));
    let hand_brain_service = Arc::new(HandBrainService::new(
        games.clone(),
        members.clone(),
        turn_context,
        lock.clone(),
    ));
    let werewolf_service = Arc::new(WerewolfService::new(
        games.clone(),
        teams.clone(),
        members.clone(),
        roles,
        votes,
        stats,
        lock.clone(),
        Arc::new(ThreadRngSource),
    ));
    let lifecycle_service = Arc::new(GameLifecycleService::new(
        games,
        teams,
        members,
        lock,
        werewolf_service.clone(),
        timing,
    ));

    let app_state = state::AppState {
        query_service,
        move_service,
        timeout_service,
        fast_mode_service,
        hand_brain_service,
        werewolf_service,
        lifecycle_service,
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::games::routes())
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
